//! Date and timestamp recognition shared by type inference and Arrow conversion

use chrono::{NaiveDate, NaiveDateTime};

/// Date-only patterns, tried in order
const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%d/%m/%Y", "%m/%d/%Y", "%d.%m.%Y"];

/// Date-time patterns, tried in order
const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
];

/// Parse a text value against the fixed set of supported date patterns.
///
/// Year-month values such as `2024-01` resolve to the first day of the month.
pub fn parse_datetime(value: &str) -> Option<NaiveDateTime> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }

    for fmt in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(value, fmt) {
            return Some(dt);
        }
    }

    for fmt in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(value, fmt) {
            return date.and_hms_opt(0, 0, 0);
        }
    }

    if is_year_month(value) {
        return NaiveDate::parse_from_str(&format!("{value}-01"), "%Y-%m-%d")
            .ok()
            .and_then(|date| date.and_hms_opt(0, 0, 0));
    }

    None
}

/// Whether a text value matches one of the supported date patterns
pub fn looks_like_datetime(value: &str) -> bool {
    parse_datetime(value).is_some()
}

fn is_year_month(value: &str) -> bool {
    let bytes = value.as_bytes();
    bytes.len() == 7
        && bytes[4] == b'-'
        && bytes[..4].iter().all(u8::is_ascii_digit)
        && bytes[5..].iter().all(u8::is_ascii_digit)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_iso_dates() {
        let dt = parse_datetime("2024-03-15").unwrap();
        assert_eq!(dt.format("%Y-%m-%d").to_string(), "2024-03-15");
        assert!(looks_like_datetime("2024-03-15 10:30:00"));
        assert!(looks_like_datetime("2024-03-15T10:30:00.250"));
    }

    #[test]
    fn test_year_month() {
        let dt = parse_datetime("2024-02").unwrap();
        assert_eq!(dt.format("%Y-%m-%d").to_string(), "2024-02-01");
        assert!(!looks_like_datetime("2024-13"));
    }

    #[test]
    fn test_day_first_and_dotted() {
        assert!(looks_like_datetime("31/12/2023"));
        assert!(looks_like_datetime("12/31/2023"));
        assert!(looks_like_datetime("31.12.2023"));
    }

    #[test]
    fn test_rejects_non_dates() {
        assert!(!looks_like_datetime(""));
        assert!(!looks_like_datetime("2024"));
        assert!(!looks_like_datetime("hello"));
        assert!(!looks_like_datetime("12:30"));
    }
}
