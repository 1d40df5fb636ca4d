//! IANA timezone validation and resolution.
//!
//! Lookups go through jiff's global zone database, which is bundled into
//! the binary so validation does not depend on the host's zoneinfo.

use jiff::tz::{self, TimeZone};
use tracing::warn;

/// Zone used when nothing else is configured or the configured zone fails
/// to resolve.
pub const DEFAULT_TIMEZONE: &str = "Europe/Paris";

/// Whether `name` is a recognized IANA zone identifier.
///
/// The enumerated database is authoritative. When the database cannot list
/// its zones the check falls back to constructing the zone directly.
pub fn is_valid_timezone(name: &str) -> bool {
    if name.is_empty() {
        return false;
    }

    let mut available = tz::db().available().peekable();
    if available.peek().is_none() {
        return TimeZone::get(name).is_ok();
    }
    available.any(|candidate| candidate.as_str() == name)
}

/// Resolve a zone name, never failing.
///
/// Falls back to [`DEFAULT_TIMEZONE`], and to UTC if even that is missing
/// from the database.
pub fn resolve_timezone(name: &str) -> TimeZone {
    match TimeZone::get(name) {
        Ok(zone) => zone,
        Err(e) => {
            warn!(timezone = name, error = %e, "timezone lookup failed, using default");
            TimeZone::get(DEFAULT_TIMEZONE).unwrap_or(TimeZone::UTC)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recognizes_common_zones() {
        assert!(is_valid_timezone("Europe/Paris"));
        assert!(is_valid_timezone("Asia/Dhaka"));
        assert!(is_valid_timezone("America/New_York"));
    }

    #[test]
    fn rejects_garbage() {
        assert!(!is_valid_timezone("Not/AZone"));
        assert!(!is_valid_timezone(""));
        assert!(!is_valid_timezone("   "));
        assert!(!is_valid_timezone("Europe/"));
    }

    #[test]
    fn resolve_known_zone() {
        let zone = resolve_timezone("Asia/Dhaka");
        assert_eq!(zone.iana_name(), Some("Asia/Dhaka"));
    }

    #[test]
    fn resolve_unknown_zone_falls_back_to_default() {
        let zone = resolve_timezone("Not/AZone");
        assert_eq!(zone.iana_name(), Some(DEFAULT_TIMEZONE));
    }
}
