//! Date/time utilities for hotentry-rss.
//!
//! RSS 2.0 wants RFC 822 dates (`Mon, 15 Jan 2024 10:30:00 +0900`), while
//! the upstream site hands out a mix of W3CDTF (`dc:date`) and plain
//! `YYYY-MM-DD HH:MM:SS` strings.

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, Utc};
use chrono_tz::Tz;

/// Naive layouts accepted for source dates; interpreted as UTC.
const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y/%m/%d %H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
    "%Y/%m/%d %H:%M",
];

/// Format a datetime as RFC 822 (the RSS 2.0 date format).
pub fn format_rfc822<Tz2: chrono::TimeZone>(dt: &DateTime<Tz2>) -> String
where
    Tz2::Offset: std::fmt::Display,
{
    dt.to_rfc2822()
}

/// Parse a date string as supplied by the upstream source.
///
/// Keeps the source's UTC offset when one is present. Returns `None` for
/// anything that cannot be understood.
pub fn parse_source_date(s: &str) -> Option<DateTime<FixedOffset>> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt);
    }

    if let Ok(dt) = DateTime::parse_from_rfc2822(s) {
        return Some(dt);
    }

    for format in NAIVE_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, format) {
            return Some(naive.and_utc().fixed_offset());
        }
    }

    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc().fixed_offset())
}

/// RFC 822 form of a source date, or of `now` when the date is absent or
/// unparseable.
pub fn rfc822_or(date: Option<&str>, now: &DateTime<Utc>) -> String {
    match date.and_then(parse_source_date) {
        Some(dt) => format_rfc822(&dt),
        None => format_rfc822(now),
    }
}

/// Format a DateTime<Utc> in the given timezone.
///
/// Falls back to UTC when the timezone name is unknown.
pub fn format_utc_datetime(dt: &DateTime<Utc>, timezone: &str, format: &str) -> String {
    let tz: Tz = match timezone.parse() {
        Ok(tz) => tz,
        Err(_) => return dt.format(format).to_string(),
    };
    dt.with_timezone(&tz).format(format).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn fixed_now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 15, 10, 30, 0).unwrap()
    }

    #[test]
    fn test_format_rfc822_utc() {
        assert_eq!(format_rfc822(&fixed_now()), "Mon, 15 Jan 2024 10:30:00 +0000");
    }

    #[test]
    fn test_parse_w3cdtf_keeps_offset() {
        let dt = parse_source_date("2024-01-15T19:30:00+09:00").unwrap();
        assert_eq!(format_rfc822(&dt), "Mon, 15 Jan 2024 19:30:00 +0900");
    }

    #[test]
    fn test_parse_rfc2822() {
        let dt = parse_source_date("Tue, 16 Jan 2024 08:00:00 +0000").unwrap();
        assert_eq!(dt.with_timezone(&Utc), Utc.with_ymd_and_hms(2024, 1, 16, 8, 0, 0).unwrap());
    }

    #[test]
    fn test_parse_naive_formats_as_utc() {
        let expected = Utc.with_ymd_and_hms(2024, 1, 15, 10, 30, 0).unwrap();
        for s in [
            "2024-01-15 10:30:00",
            "2024/01/15 10:30:00",
            "2024-01-15T10:30:00",
            "2024-01-15 10:30",
        ] {
            let dt = parse_source_date(s).unwrap_or_else(|| panic!("failed to parse {s}"));
            assert_eq!(dt.with_timezone(&Utc), expected, "{s}");
        }
    }

    #[test]
    fn test_parse_date_only() {
        let dt = parse_source_date("2024-01-15").unwrap();
        assert_eq!(format_rfc822(&dt), "Mon, 15 Jan 2024 00:00:00 +0000");
    }

    #[test]
    fn test_parse_garbage() {
        assert!(parse_source_date("not a date").is_none());
        assert!(parse_source_date("").is_none());
        assert!(parse_source_date("   ").is_none());
    }

    #[test]
    fn test_rfc822_or_falls_back_to_now() {
        let now = fixed_now();
        assert_eq!(rfc822_or(None, &now), "Mon, 15 Jan 2024 10:30:00 +0000");
        assert_eq!(
            rfc822_or(Some("yesterday-ish"), &now),
            "Mon, 15 Jan 2024 10:30:00 +0000"
        );
        assert_eq!(
            rfc822_or(Some("2023-12-31T23:59:59Z"), &now),
            "Sun, 31 Dec 2023 23:59:59 +0000"
        );
    }

    #[test]
    fn test_format_utc_datetime() {
        let result = format_utc_datetime(&fixed_now(), "Asia/Tokyo", "%Y-%m-%d %H:%M:%S");
        assert_eq!(result, "2024-01-15 19:30:00");
    }

    #[test]
    fn test_format_utc_datetime_invalid_timezone() {
        let result = format_utc_datetime(&fixed_now(), "Invalid/Zone", "%Y-%m-%d %H:%M:%S");
        assert_eq!(result, "2024-01-15 10:30:00");
    }
}
