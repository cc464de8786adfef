// # bunny.net DNS API Client
//
// This crate provides the bunny.net implementation of `ZoneApi` for the
// DNS-01 challenge solver.
//
// ## Behaviour
//
// - ✅ One HTTP request per trait call
// - ✅ HTTP timeout configured (30 seconds by default)
// - ✅ Status >= 400 → `Error::Provider` carrying status and raw body
// - ✅ Connection failure / timeout → `Error::Transport`
// - ✅ Malformed body → `Error::Decode`
// - ✅ Dry-run mode for safe testing
// - ❌ NO retry or backoff logic (owned by the webhook host)
// - ❌ NO caching (zones are fetched fresh for every operation)
//
// ## Security Requirements
//
// - The API key travels in the `AccessKey` header only, never in URLs or
//   bodies, and NEVER appears in logs
//
// ## API Reference
//
// - Search zones: GET `/dnszone?page=1&perPage=1&search=<zone>`
// - Add record: PUT `/dnszone/:zone_id/records`
// - Delete record: DELETE `/dnszone/:zone_id/records/:record_id`

use async_trait::async_trait;
use dns01_core::config::{Credentials, SolverConfig};
use dns01_core::zone::{NewRecord, RecordId, ZoneId, ZoneSearchResult};
use dns01_core::{ChallengeSolver, Error, Result, ZoneApi};
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use std::time::Duration;

/// Name the solver is registered under with the webhook host
pub const SOLVER_NAME: &str = "bunny-net";

/// Header carrying the API key
const ACCESS_KEY_HEADER: &str = "AccessKey";

const APPLICATION_JSON: &str = "application/json";

/// bunny.net DNS API client
///
/// Holds no credentials and no per-request state; the same client serves
/// every concurrent challenge.
///
/// # Dry-Run Mode
///
/// When `dry_run` is true, the client will:
/// - Perform zone searches
/// - Log the record it would create or delete
/// - **NOT** actually modify DNS records
#[derive(Debug, Clone)]
pub struct BunnyClient {
    /// HTTP client for API requests
    client: reqwest::Client,

    /// API base URL, without trailing slash
    base_url: String,

    /// HTTP timeout, kept for error messages
    timeout: Duration,

    /// Dry-run mode: if true, perform searches but skip mutations
    dry_run: bool,
}

impl BunnyClient {
    /// Create a new client
    ///
    /// # Parameters
    ///
    /// - `base_url`: API base URL, e.g. `https://api.bunny.net`
    /// - `timeout`: Bound on each HTTP call
    /// - `dry_run`: If true, perform searches but skip mutations
    pub fn new(base_url: impl Into<String>, timeout: Duration, dry_run: bool) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| Error::config(format!("Failed to build HTTP client: {}", e)))?;

        let base_url = base_url.into().trim_end_matches('/').to_string();

        Ok(Self {
            client,
            base_url,
            timeout,
            dry_run,
        })
    }

    /// Create a client from the solver configuration
    pub fn from_config(config: &SolverConfig) -> Result<Self> {
        Self::new(&config.api_base_url, config.http_timeout(), config.dry_run)
    }

    /// Whether mutations are skipped
    pub fn is_dry_run(&self) -> bool {
        self.dry_run
    }

    fn records_url(&self, zone_id: ZoneId) -> String {
        format!("{}/dnszone/{}/records", self.base_url, zone_id)
    }

    /// Send a request and turn transport failures and error statuses into
    /// typed errors
    async fn send(
        &self,
        request: reqwest::RequestBuilder,
        operation: &str,
    ) -> Result<reqwest::Response> {
        let response = request.send().await.map_err(|e| {
            if e.is_timeout() {
                Error::transport(format!("{} timed out after {:?}", operation, self.timeout))
            } else {
                Error::transport(format!("{} request failed: {}", operation, e))
            }
        })?;

        let status = response.status();
        if status.as_u16() < 400 {
            return Ok(response);
        }

        let body = error_body(response.text().await);

        match status.as_u16() {
            401 | 403 => tracing::warn!(
                "{} rejected: invalid API key or insufficient permissions ({})",
                operation,
                status
            ),
            429 => tracing::warn!("{} rate limited by bunny.net ({})", operation, status),
            500..=599 => tracing::warn!("{} hit a bunny.net server error ({})", operation, status),
            _ => tracing::debug!("{} failed with status {}", operation, status),
        }

        Err(Error::provider(status.as_u16(), body))
    }
}

/// Body text for an error response, or the reason it could not be read
fn error_body<E: std::fmt::Display>(body: std::result::Result<String, E>) -> String {
    body.unwrap_or_else(|e| format!("<unreadable body: {}>", e))
}

#[async_trait]
impl ZoneApi for BunnyClient {
    /// Search zones by domain name
    ///
    /// # API Call
    ///
    /// ```http
    /// GET /dnszone?page=1&perPage=1&search=example.com
    /// AccessKey: <key>
    /// ```
    async fn find_zone(&self, credentials: &Credentials, search: &str) -> Result<ZoneSearchResult> {
        tracing::debug!("Searching bunny.net zones for: {}", search);

        let request = self
            .client
            .get(format!("{}/dnszone", self.base_url))
            .query(&[("page", "1"), ("perPage", "1"), ("search", search)])
            .header(ACCEPT, APPLICATION_JSON)
            .header(ACCESS_KEY_HEADER, credentials.api_key());

        let response = self.send(request, "zone search").await?;

        let body = response
            .text()
            .await
            .map_err(|e| Error::transport(format!("Failed to read zone search response: {}", e)))?;

        let result: ZoneSearchResult = serde_json::from_str(&body)
            .map_err(|e| Error::decode(format!("Invalid zone search response: {}", e)))?;

        tracing::debug!(
            "Zone search for {} matched {} zone(s)",
            search,
            result.total_items
        );
        Ok(result)
    }

    /// Create a record
    ///
    /// # API Call
    ///
    /// ```http
    /// PUT /dnszone/:zone_id/records
    /// AccessKey: <key>
    /// Content-Type: application/json
    ///
    /// {"Type": 3, "Ttl": 10, "Value": "...", "Name": "...", "Disabled": false}
    /// ```
    async fn create_record(
        &self,
        credentials: &Credentials,
        zone_id: ZoneId,
        record: &NewRecord,
    ) -> Result<()> {
        let url = self.records_url(zone_id);

        if self.dry_run {
            tracing::info!(
                "[DRY-RUN] Would send PUT request to {} with payload: {}",
                url,
                serde_json::to_string(record)?
            );
            return Ok(());
        }

        let request = self
            .client
            .put(&url)
            .header(ACCEPT, APPLICATION_JSON)
            .header(CONTENT_TYPE, APPLICATION_JSON)
            .header(ACCESS_KEY_HEADER, credentials.api_key())
            .json(record);

        self.send(request, "record creation").await?;

        tracing::debug!(
            "Created {} record {} in zone {}",
            record.record_type,
            record.name,
            zone_id
        );
        Ok(())
    }

    /// Delete a record
    ///
    /// # API Call
    ///
    /// ```http
    /// DELETE /dnszone/:zone_id/records/:record_id
    /// AccessKey: <key>
    /// ```
    async fn delete_record(
        &self,
        credentials: &Credentials,
        zone_id: ZoneId,
        record_id: RecordId,
    ) -> Result<()> {
        let url = format!("{}/{}", self.records_url(zone_id), record_id);

        if self.dry_run {
            tracing::info!("[DRY-RUN] Would send DELETE request to {}", url);
            return Ok(());
        }

        let request = self
            .client
            .delete(&url)
            .header(ACCEPT, APPLICATION_JSON)
            .header(ACCESS_KEY_HEADER, credentials.api_key());

        self.send(request, "record deletion").await?;

        tracing::debug!("Deleted record {} from zone {}", record_id, zone_id);
        Ok(())
    }

    fn provider_name(&self) -> &'static str {
        SOLVER_NAME
    }
}

/// Build a ready-to-initialize solver from configuration
///
/// Validates the configuration first, so a missing API key fails here
/// rather than on the first challenge.
pub fn solver_from_config(config: &SolverConfig) -> Result<ChallengeSolver> {
    config.validate()?;

    if config.dry_run {
        tracing::warn!("bunny.net client running in DRY-RUN mode - no changes will be made");
    }

    let client = BunnyClient::from_config(config)?;
    Ok(ChallengeSolver::new(Box::new(client), config.credentials()))
}
