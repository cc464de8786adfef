//! Relative record names
//!
//! The provider stores record names relative to their zone, so the challenge
//! FQDN `_acme-challenge.example.com.` in zone `example.com.` becomes
//! `_acme-challenge`.

use crate::error::{Error, Result};

/// Strip `zone` from the end of `fqdn`, plus the separating dot
///
/// Both names may carry a trailing dot. The zone must be a label-aligned
/// suffix of the FQDN (compared ASCII case-insensitively); anything else is
/// rejected so that a record is never written at an unintended name. An
/// FQDN equal to the zone yields the apex name `""`.
pub fn relative_name(fqdn: &str, zone: &str) -> Result<String> {
    let fqdn_trimmed = fqdn.strip_suffix('.').unwrap_or(fqdn);
    let zone_trimmed = zone.strip_suffix('.').unwrap_or(zone);

    if zone_trimmed.is_empty() {
        return Err(Error::invalid_input(format!(
            "zone is empty, cannot derive record name for {}",
            fqdn
        )));
    }

    if fqdn_trimmed.len() < zone_trimmed.len() {
        return Err(not_in_zone(fqdn, zone));
    }

    let split = fqdn_trimmed.len() - zone_trimmed.len();
    if !fqdn_trimmed.is_char_boundary(split)
        || !fqdn_trimmed[split..].eq_ignore_ascii_case(zone_trimmed)
    {
        return Err(not_in_zone(fqdn, zone));
    }

    let head = &fqdn_trimmed[..split];
    if head.is_empty() {
        return Ok(String::new());
    }

    // "_acme-challenge.example.com" minus "example.com" must leave a dot behind
    match head.strip_suffix('.') {
        Some(name) if !name.is_empty() => Ok(name.to_string()),
        _ => Err(not_in_zone(fqdn, zone)),
    }
}

fn not_in_zone(fqdn: &str, zone: &str) -> Error {
    Error::invalid_input(format!("{} is not inside zone {}", fqdn, zone))
}
