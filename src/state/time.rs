//! Duration and timestamp formatting.

use chrono::{DateTime, Utc};

/// Sentinel rendered when a duration or timestamp cannot be computed.
pub const UNAVAILABLE: &str = "N/A";

/// Format the elapsed time between two optional timestamps.
///
/// Returns [`UNAVAILABLE`] when either endpoint is missing or the end
/// precedes the start. Components are derived by integer division of the
/// elapsed milliseconds, so everything truncates; no rounding.
pub fn format_duration(start: Option<DateTime<Utc>>, end: Option<DateTime<Utc>>) -> String {
    let (Some(start), Some(end)) = (start, end) else {
        return UNAVAILABLE.to_string();
    };

    let elapsed_ms = end.timestamp_millis() - start.timestamp_millis();
    if elapsed_ms < 0 {
        return UNAVAILABLE.to_string();
    }

    let seconds = elapsed_ms / 1000;
    let minutes = seconds / 60;
    let hours = minutes / 60;

    if hours > 0 {
        format!("{hours}h {}m", minutes % 60)
    } else if minutes > 0 {
        format!("{minutes}m {}s", seconds % 60)
    } else {
        format!("{seconds}s")
    }
}

/// Compact display form of a timestamp, e.g. `Dec 7 14:30`.
pub fn format_timestamp(timestamp: Option<DateTime<Utc>>) -> String {
    match timestamp {
        Some(at) => at.format("%b %-d %H:%M").to_string(),
        None => UNAVAILABLE.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn at(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(secs, 0).unwrap()
    }

    #[rstest]
    #[case(0, "0s")]
    #[case(45_000, "45s")]
    #[case(59_999, "59s")]
    #[case(60_000, "1m 0s")]
    #[case(154_000, "2m 34s")]
    #[case(3_599_000, "59m 59s")]
    #[case(3_600_000, "1h 0m")]
    #[case(4_980_000, "1h 23m")]
    fn formats_elapsed_milliseconds(#[case] elapsed_ms: i64, #[case] expected: &str) {
        let start = at(1_000_000);
        let end = start + Duration::milliseconds(elapsed_ms);
        assert_eq!(format_duration(Some(start), Some(end)), expected);
    }

    #[test]
    fn missing_endpoints_are_unavailable() {
        let t = at(1_000_000);
        assert_eq!(format_duration(None, Some(t)), UNAVAILABLE);
        assert_eq!(format_duration(Some(t), None), UNAVAILABLE);
        assert_eq!(format_duration(None, None), UNAVAILABLE);
    }

    #[test]
    fn end_before_start_is_unavailable() {
        let start = at(1_000_000);
        let end = start - Duration::seconds(1);
        assert_eq!(format_duration(Some(start), Some(end)), UNAVAILABLE);
    }

    #[test]
    fn timestamp_renders_compactly() {
        let at = Utc.with_ymd_and_hms(2025, 12, 7, 14, 30, 0).unwrap();
        assert_eq!(format_timestamp(Some(at)), "Dec 7 14:30");
        assert_eq!(format_timestamp(None), UNAVAILABLE);
    }
}
