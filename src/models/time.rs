//! Date arithmetic and numeric rounding helpers shared by the enrichment
//! pipeline.

use chrono::{DateTime, Utc};

/// Round to 3 decimals, the resolution the dashboard displays for minutes
/// and gigabytes.
pub fn round3(value: f64) -> f64 {
    (value * 1000.0).round() / 1000.0
}

/// Signed difference `a - b` in minutes.
pub fn minutes_between(a: DateTime<Utc>, b: DateTime<Utc>) -> f64 {
    (a - b).num_milliseconds() as f64 / 60_000.0
}

/// Convert a raw byte count to gigabytes (1 GB = 1e9 bytes, as reported by
/// the DHUS metadata annotations).
pub fn bytes_to_gb(bytes: f64) -> f64 {
    bytes / 1_000_000_000.0
}

/// Timestamp format used by the dashboard tooltips and metadata.
pub fn format_timestamp(t: DateTime<Utc>) -> String {
    t.format("%Y-%m-%dT%H:%M:%S").to_string()
}

/// Parse a timestamp as stored in annotation values. Accepts RFC 3339 and
/// the bare ISO form without offset (stored values are UTC).
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(t) = DateTime::parse_from_rfc3339(raw) {
        return Some(t.with_timezone(&Utc));
    }
    chrono::NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|naive| naive.and_utc())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_round3() {
        assert_eq!(round3(1.23456), 1.235);
        assert_eq!(round3(1.5), 1.5);
        assert_eq!(round3(-0.0004), -0.0);
    }

    #[test]
    fn test_minutes_between() {
        let reference = Utc.with_ymd_and_hms(2021, 9, 12, 10, 0, 0).unwrap();
        let publication = Utc.with_ymd_and_hms(2021, 9, 12, 10, 1, 30).unwrap();
        assert_eq!(minutes_between(publication, reference), 1.5);
        // Publication before the reference yields a negative delay.
        assert_eq!(minutes_between(reference, publication), -1.5);
    }

    #[test]
    fn test_bytes_to_gb() {
        assert_eq!(bytes_to_gb(4_100_000_000.0), 4.1);
        assert_eq!(round3(bytes_to_gb(1_234_567_890.0)), 1.235);
    }

    #[test]
    fn test_format_timestamp() {
        let t = Utc.with_ymd_and_hms(2021, 9, 12, 10, 30, 0).unwrap();
        assert_eq!(format_timestamp(t), "2021-09-12T10:30:00");
    }

    #[test]
    fn test_parse_timestamp() {
        let expected = Utc.with_ymd_and_hms(2021, 9, 12, 10, 31, 30).unwrap();
        assert_eq!(parse_timestamp("2021-09-12T10:31:30Z"), Some(expected));
        assert_eq!(parse_timestamp("2021-09-12T10:31:30"), Some(expected));
        assert_eq!(parse_timestamp("not a timestamp"), None);
    }
}
