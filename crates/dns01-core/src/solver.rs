//! Challenge solver
//!
//! The solver turns a challenge request into provider calls:
//!
//! ```text
//! ChallengeRequest
//!        │
//!        ▼
//! ┌──────────────────┐   find_zone    ┌──────────┐
//! │ ChallengeSolver  │───────────────▶│ ZoneApi  │
//! │                  │ create_record  │          │
//! │  relative_name() │ delete_record  │          │
//! └──────────────────┘───────────────▶└──────────┘
//! ```
//!
//! ## Present
//!
//! 1. Validate the request and credentials
//! 2. Resolve the zone
//! 3. Derive the relative record name
//! 4. Create the TXT record (provider upserts by type + name)
//!
//! ## Clean up
//!
//! 1. Validate the request and credentials
//! 2. Resolve the zone and derive the record name
//! 3. Find the first TXT record matching name and key exactly
//! 4. Delete it, or return success if there is none
//!
//! The solver keeps no state between calls besides the credentials, the API
//! client and the shutdown signal, so it needs no locking. It never retries;
//! the host re-invokes on error.

use async_trait::async_trait;
use tracing::{debug, info};

use crate::challenge::ChallengeRequest;
use crate::config::{Credentials, HostConfig};
use crate::error::{Result, ResultExt};
use crate::hostname::relative_name;
use crate::resolver::resolve_zone;
use crate::shutdown::ShutdownSignal;
use crate::traits::{Solver, ZoneApi};
use crate::zone::{NewRecord, Zone};

/// DNS-01 solver backed by a [`ZoneApi`]
pub struct ChallengeSolver {
    /// Provider API client
    api: Box<dyn ZoneApi>,

    /// Provider credentials
    credentials: Credentials,

    /// Aborts in-flight provider calls when the host shuts down
    shutdown: ShutdownSignal,
}

impl std::fmt::Debug for ChallengeSolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChallengeSolver")
            .field("provider", &self.api.provider_name())
            .field("credentials", &self.credentials)
            .field("shutdown", &self.shutdown.is_triggered())
            .finish()
    }
}

impl ChallengeSolver {
    /// Create a new solver
    ///
    /// Until [`Solver::initialize`] supplies a shutdown signal, provider
    /// calls run until they finish or time out.
    pub fn new(api: Box<dyn ZoneApi>, credentials: Credentials) -> Self {
        Self {
            api,
            credentials,
            shutdown: ShutdownSignal::never(),
        }
    }

    /// Replace the shutdown signal
    pub fn with_shutdown(mut self, shutdown: ShutdownSignal) -> Self {
        self.shutdown = shutdown;
        self
    }

    fn load_credentials(&self) -> Result<&Credentials> {
        self.credentials
            .validate()
            .context("failed to load config")?;
        Ok(&self.credentials)
    }

    async fn fetch_zone(&self, credentials: &Credentials, zone_name: &str) -> Result<Zone> {
        self.shutdown
            .guard(
                "zone lookup",
                resolve_zone(self.api.as_ref(), credentials, zone_name),
            )
            .await
            .context("failed to get zone ID")
    }
}

#[async_trait]
impl Solver for ChallengeSolver {
    fn name(&self) -> &'static str {
        self.api.provider_name()
    }

    async fn present(&self, request: &ChallengeRequest) -> Result<()> {
        request.validate().context("invalid challenge request")?;
        let credentials = self.load_credentials()?;

        let zone = self.fetch_zone(credentials, &request.resolved_zone).await?;

        let hostname = relative_name(&request.fqdn, &request.resolved_zone)
            .context("failed to derive record name")?;

        let record = NewRecord::txt(hostname, request.key.clone());
        debug!(
            "Creating {} record {} in zone {} (id {})",
            record.record_type, record.name, zone.name, zone.id
        );

        self.shutdown
            .guard(
                "record creation",
                self.api.create_record(credentials, zone.id, &record),
            )
            .await
            .context("failed to create TXT record")?;

        info!("Successfully created DNS record for {}", request.fqdn);
        Ok(())
    }

    async fn clean_up(&self, request: &ChallengeRequest) -> Result<()> {
        request.validate().context("invalid challenge request")?;
        let credentials = self.load_credentials()?;

        let zone = self.fetch_zone(credentials, &request.resolved_zone).await?;

        let hostname = relative_name(&request.fqdn, &request.resolved_zone)
            .context("failed to derive record name")?;

        debug!("Looking for: TXT {} {}", hostname, request.key);
        let Some(record) = zone.find_txt_record(&hostname, &request.key) else {
            debug!("No matching record for {}, nothing to delete", request.fqdn);
            return Ok(());
        };

        debug!(
            "Deleting record {} ({}) from zone {} (id {})",
            record.id, record.name, zone.name, zone.id
        );

        self.shutdown
            .guard(
                "record deletion",
                self.api.delete_record(credentials, zone.id, record.id),
            )
            .await
            .context("failed to delete TXT record")?;

        info!("Successfully deleted DNS record for {}", request.fqdn);
        Ok(())
    }

    async fn initialize(&mut self, host: &HostConfig, shutdown: ShutdownSignal) -> Result<()> {
        debug!(
            "Initializing {} solver for group {:?}",
            self.api.provider_name(),
            host.group_name
        );
        self.shutdown = shutdown;
        Ok(())
    }
}
