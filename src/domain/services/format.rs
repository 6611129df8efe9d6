use chrono::DateTime;

/// Renders an age in seconds using the two coarsest non-zero units,
/// e.g. 90000 -> "1d 1h", 3700 -> "1h 1m", 65 -> "1m".
/// Non-positive input renders as the empty string.
pub fn format_duration(seconds: i64) -> String {
    if seconds <= 0 {
        return String::new();
    }

    let days = seconds / 86_400;
    let hours = (seconds % 86_400) / 3_600;
    let minutes = (seconds % 3_600) / 60;

    let mut parts = Vec::new();
    if days > 0 {
        parts.push(format!("{}d", days));
    }
    if hours > 0 {
        parts.push(format!("{}h", hours));
    }
    if minutes > 0 {
        parts.push(format!("{}m", minutes));
    }

    if parts.is_empty() {
        return "0m".to_string();
    }
    parts.truncate(2);
    parts.join(" ")
}

/// Formats a second- or millisecond-epoch value as `YYYY-MM-DD HH:MM:SS`
/// UTC. Values above ten billion are taken to be milliseconds. Unusable
/// input yields the empty string, never an error.
pub fn format_instant(ts: i64) -> String {
    if ts <= 0 {
        return String::new();
    }

    let secs = if ts > 10_000_000_000 { ts / 1000 } else { ts };

    match DateTime::from_timestamp(secs, 0) {
        Some(dt) => dt.format("%Y-%m-%d %H:%M:%S").to_string(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::services::dates::to_instant_ms;

    #[test]
    fn duration_keeps_two_coarsest_units() {
        assert_eq!(format_duration(65), "1m");
        assert_eq!(format_duration(3700), "1h 1m");
        assert_eq!(format_duration(90000), "1d 1h");
        // 1d 0h 1m: the zero hour is skipped, not rendered.
        assert_eq!(format_duration(86460), "1d 1m");
    }

    #[test]
    fn duration_edge_cases() {
        assert_eq!(format_duration(0), "");
        assert_eq!(format_duration(-1), "");
        assert_eq!(format_duration(59), "0m");
    }

    #[test]
    fn instant_disambiguates_seconds_and_milliseconds() {
        assert_eq!(format_instant(1735689600), "2025-01-01 00:00:00");
        assert_eq!(format_instant(1735689600000), "2025-01-01 00:00:00");
    }

    #[test]
    fn instant_never_errors() {
        assert_eq!(format_instant(0), "");
        assert_eq!(format_instant(-5), "");
        assert_eq!(format_instant(i64::MAX), "");
    }

    #[test]
    fn instant_round_trips_with_date_parsing() {
        let ms = to_instant_ms("2025-06-01 10:00:00", false).unwrap();
        assert_eq!(format_instant(ms), "2025-06-01 10:00:00");
    }
}
