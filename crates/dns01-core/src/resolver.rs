//! Zone lookup by name

use crate::config::Credentials;
use crate::error::{Error, Result};
use crate::traits::ZoneApi;
use crate::zone::Zone;
use tracing::debug;

/// Remove exactly one trailing dot, as the provider API rejects FQDN-style
/// zone names
pub fn zone_search_term(zone_name: &str) -> &str {
    zone_name.strip_suffix('.').unwrap_or(zone_name)
}

/// Fetch the zone named `zone_name` together with its records
///
/// Takes the first item of a one-item search page. The challenge's resolved
/// zone is expected to name a zone the account owns exactly, so the fuzzy
/// provider search returns it first.
pub async fn resolve_zone(
    api: &dyn ZoneApi,
    credentials: &Credentials,
    zone_name: &str,
) -> Result<Zone> {
    let search = zone_search_term(zone_name);
    debug!("Looking up zone: {}", search);

    let result = api.find_zone(credentials, search).await?;

    let zone = result
        .items
        .into_iter()
        .next()
        .ok_or_else(|| Error::zone_not_found(search))?;

    if !zone.name.eq_ignore_ascii_case(search) {
        debug!(
            "Zone search for {} returned {}; using it as the owning zone",
            search, zone.name
        );
    }

    debug!(
        "Found zone {} (id {}) with {} record(s)",
        zone.name,
        zone.id,
        zone.records.len()
    );
    Ok(zone)
}
