use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime, NaiveTime};

// ── Timestamp parsing ─────────────────────────────────────────────────────────

/// Accepted naive timestamp layouts, tried in order.
const FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
];

/// Parse a meter timestamp string into a naive datetime.
///
/// Meter exports carry campus-local wall-clock values with no zone, so
/// the result is a [`NaiveDateTime`]. Accepts ISO 8601 layouts with a
/// `T` or space separator, with or without seconds and fractional
/// seconds, an RFC 3339 form (the offset is discarded, keeping the
/// local clock value), and a bare date (interpreted as midnight).
///
/// Returns `None` for empty strings or unrecognised layouts.
pub fn parse_timestamp(s: &str) -> Option<NaiveDateTime> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }

    for fmt in FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt);
        }
    }

    if let Ok(dt) = chrono::DateTime::parse_from_rfc3339(s) {
        return Some(dt.naive_local());
    }

    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Some(date.and_time(NaiveTime::MIN));
    }

    None
}

/// Render a timestamp the way the output artifacts expect it.
pub fn format_timestamp(ts: NaiveDateTime) -> String {
    ts.format("%Y-%m-%d %H:%M:%S").to_string()
}

// ── Calendar binning ──────────────────────────────────────────────────────────

/// The calendar day a reading belongs to (daily bins are anchored at
/// midnight).
pub fn day_of(ts: NaiveDateTime) -> NaiveDate {
    ts.date()
}

/// The Sunday that closes the week containing `date`.
///
/// Weeks run Monday through Sunday and are labelled by their final day,
/// so a Sunday maps to itself and a Monday maps to the Sunday six days
/// later.
pub fn week_ending_sunday(date: NaiveDate) -> NaiveDate {
    let days_ahead = (7 - date.weekday().num_days_from_sunday()) % 7;
    date + Duration::days(i64::from(days_ahead))
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    // ── parse_timestamp ───────────────────────────────────────────────────────

    #[test]
    fn test_parse_iso_with_seconds() {
        let dt = parse_timestamp("2024-01-15T10:30:00").unwrap();
        assert_eq!(format_timestamp(dt), "2024-01-15 10:30:00");
    }

    #[test]
    fn test_parse_iso_without_seconds() {
        let dt = parse_timestamp("2024-01-01T00:00").unwrap();
        assert_eq!(format_timestamp(dt), "2024-01-01 00:00:00");
    }

    #[test]
    fn test_parse_space_separator() {
        let dt = parse_timestamp("2024-01-15 10:30:00").unwrap();
        assert_eq!(dt.date(), date("2024-01-15"));
    }

    #[test]
    fn test_parse_fractional_seconds() {
        let dt = parse_timestamp("2024-01-15T10:30:00.250").unwrap();
        assert_eq!(dt.date(), date("2024-01-15"));
    }

    #[test]
    fn test_parse_rfc3339_discards_offset() {
        let dt = parse_timestamp("2024-01-15T10:30:00+02:00").unwrap();
        // Local clock value is kept as-is.
        assert_eq!(format_timestamp(dt), "2024-01-15 10:30:00");
    }

    #[test]
    fn test_parse_bare_date_is_midnight() {
        let dt = parse_timestamp("2024-01-15").unwrap();
        assert_eq!(format_timestamp(dt), "2024-01-15 00:00:00");
    }

    #[test]
    fn test_parse_trims_whitespace() {
        assert!(parse_timestamp("  2024-01-15T10:30:00  ").is_some());
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(parse_timestamp("not-a-timestamp").is_none());
        assert!(parse_timestamp("").is_none());
        assert!(parse_timestamp("15/01/2024").is_none());
    }

    // ── week_ending_sunday ────────────────────────────────────────────────────

    #[test]
    fn test_week_ending_sunday_on_sunday() {
        // 2024-01-07 is a Sunday.
        assert_eq!(week_ending_sunday(date("2024-01-07")), date("2024-01-07"));
    }

    #[test]
    fn test_week_ending_sunday_on_monday() {
        // 2024-01-01 is a Monday; its week closes on 2024-01-07.
        assert_eq!(week_ending_sunday(date("2024-01-01")), date("2024-01-07"));
    }

    #[test]
    fn test_week_ending_sunday_on_saturday() {
        // 2024-01-06 is a Saturday.
        assert_eq!(week_ending_sunday(date("2024-01-06")), date("2024-01-07"));
    }

    #[test]
    fn test_week_ending_sunday_crosses_month() {
        // 2024-01-31 is a Wednesday; its week closes on 2024-02-04.
        assert_eq!(week_ending_sunday(date("2024-01-31")), date("2024-02-04"));
    }

    // ── day_of ────────────────────────────────────────────────────────────────

    #[test]
    fn test_day_of_truncates_time() {
        let dt = parse_timestamp("2024-01-15T23:59:59").unwrap();
        assert_eq!(day_of(dt), date("2024-01-15"));
    }
}
