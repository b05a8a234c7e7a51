//! # Rift Rewind
//!
//! Proxy gateway and stats aggregator for League of Legends season recaps.
//!
//! ## Architecture
//!
//! - **models**: Match records, season summary, AI recap and derived stats
//! - **upstream**: The analysis service seam and its HTTP implementation
//! - **api**: The `/api/analyze` and `/api/search-player` proxy routes
//! - **calculate**: Champion, role, game mode and recent form rollups
//! - **report**: Share text, insight cards and export file names
//! - **client**: Dashboard-side client for a running gateway
//! - **config**: Configuration loading and validation

pub mod api;
pub mod calculate;
pub mod client;
pub mod config;
pub mod models;
pub mod report;
pub mod upstream;

pub use models::*;

use std::time::Duration;

/// Parse a human-friendly duration string (e.g., "30s", "2m", "1h").
pub fn parse_duration(s: &str) -> Option<Duration> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }

    let (num_str, multiplier) = if let Some(n) = s.strip_suffix('h') {
        (n, 3600)
    } else if let Some(n) = s.strip_suffix('m') {
        (n, 60)
    } else if let Some(n) = s.strip_suffix('s') {
        (n, 1)
    } else {
        // Default to seconds
        (s, 1)
    };

    let num: u64 = num_str.parse().ok()?;
    Some(Duration::from_secs(num.checked_mul(multiplier)?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_duration_units() {
        assert_eq!(parse_duration("25s"), Some(Duration::from_secs(25)));
        assert_eq!(parse_duration("2m"), Some(Duration::from_secs(120)));
        assert_eq!(parse_duration("1h"), Some(Duration::from_secs(3600)));
    }

    #[test]
    fn test_parse_duration_bare_number_is_seconds() {
        assert_eq!(parse_duration(" 30 "), Some(Duration::from_secs(30)));
    }

    #[test]
    fn test_parse_duration_invalid() {
        assert_eq!(parse_duration("soon"), None);
        assert_eq!(parse_duration(""), None);
        assert_eq!(parse_duration("-5s"), None);
    }

    #[test]
    fn test_parse_duration_overflow_is_rejected() {
        assert_eq!(parse_duration("9999999999999999h"), None);
        assert_eq!(
            parse_duration("18446744073709551615s"),
            Some(Duration::from_secs(u64::MAX))
        );
    }
}
