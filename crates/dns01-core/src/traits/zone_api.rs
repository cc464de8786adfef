// # Zone API Trait
//
// Defines the interface to the DNS provider's REST API.
//
// ## Implementations
//
// - bunny.net: `dns01-provider-bunny` crate
//
// ## Usage
//
// ```rust,ignore
// use dns01_core::{Credentials, ZoneApi};
//
// async fn show(api: &dyn ZoneApi, credentials: &Credentials) -> dns01_core::Result<()> {
//     let result = api.find_zone(credentials, "example.com").await?;
//     for zone in result.items {
//         println!("{} has {} records", zone.name, zone.records.len());
//     }
//     Ok(())
// }
// ```

use async_trait::async_trait;

use crate::config::Credentials;
use crate::zone::{NewRecord, RecordId, ZoneId, ZoneSearchResult};

/// Trait for provider API clients
///
/// Each method is a single authenticated HTTP call with a bounded timeout.
/// Implementations translate failures into the crate's error taxonomy:
///
/// - HTTP status >= 400 → `Error::Provider` with status and raw body
/// - connection failure / timeout → `Error::Transport`
/// - malformed response body → `Error::Decode`
///
/// # Trust Level: Untrusted
///
/// ## Allowed Capabilities
/// - ✅ Perform HTTP/HTTPS API calls to the provider endpoint only
/// - ✅ Parse provider-specific responses
/// - ✅ Return success or failure (the host handles retry)
///
/// ## Forbidden Capabilities
/// - ❌ Retry or back off (owned by the webhook host)
/// - ❌ Cache zones or records between calls
/// - ❌ Spawn tasks or threads
/// - ❌ Log the API key
///
/// Implementations must be thread-safe; the host may run many challenges
/// concurrently against one client.
#[async_trait]
pub trait ZoneApi: Send + Sync {
    /// Search zones by domain name, one item per page
    ///
    /// The search is a substring match on the provider side; the first item
    /// is not guaranteed to be named exactly `search`.
    async fn find_zone(
        &self,
        credentials: &Credentials,
        search: &str,
    ) -> crate::Result<ZoneSearchResult>;

    /// Create (or, provider-side, upsert) a record in `zone_id`
    async fn create_record(
        &self,
        credentials: &Credentials,
        zone_id: ZoneId,
        record: &NewRecord,
    ) -> crate::Result<()>;

    /// Delete record `record_id` from `zone_id`
    async fn delete_record(
        &self,
        credentials: &Credentials,
        zone_id: ZoneId,
        record_id: RecordId,
    ) -> crate::Result<()>;

    /// Stable identifier of the provider (for logging and solver naming)
    fn provider_name(&self) -> &'static str;
}
