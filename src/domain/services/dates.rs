use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use tracing::warn;

use crate::error::AppError;

const DATETIME_FORMATS: [&str; 3] = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M"];

/// Converts a date or datetime string to UTC epoch milliseconds.
///
/// Time-bearing forms use the given time verbatim; the bare date form is
/// the only one honoring `end_of_day` (clamping to 23:59:59).
pub fn to_instant_ms(text: &str, end_of_day: bool) -> Result<i64, AppError> {
    for fmt in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(text, fmt) {
            return Ok(dt.and_utc().timestamp_millis());
        }
    }

    let date = NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .map_err(|_| AppError::InvalidDateFormat(text.to_string()))?;

    let time = if end_of_day {
        NaiveTime::from_hms_opt(23, 59, 59).unwrap_or(NaiveTime::MIN)
    } else {
        NaiveTime::MIN
    };

    Ok(date.and_time(time).and_utc().timestamp_millis())
}

/// Stricter parse used for request validation: no bare-minute form.
fn parse_bound(text: &str) -> Result<NaiveDateTime, AppError> {
    for fmt in ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(text, fmt) {
            return Ok(dt);
        }
    }
    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .map(|d| d.and_time(NaiveTime::MIN))
        .map_err(|_| AppError::InvalidDateFormat(text.to_string()))
}

/// Validates a user-supplied date range before any request record exists.
/// An oversized span is only warned about, never rejected.
pub fn validate_range(start: &str, end: Option<&str>, max_days: i64) -> Result<(), AppError> {
    let start_dt = parse_bound(start)?;

    if let Some(end) = end {
        let end_dt = parse_bound(end)?;
        if end_dt < start_dt {
            return Err(AppError::RangeOrder(format!("{} to {}", start, end)));
        }
        let span_days = (end_dt - start_dt).num_days();
        if span_days > max_days {
            warn!(days = span_days, "Large date range requested");
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_all_supported_formats() {
        assert_eq!(to_instant_ms("2025-01-01 00:00:00", false).unwrap(), 1735689600000);
        assert_eq!(to_instant_ms("2025-01-01T00:00:00", false).unwrap(), 1735689600000);
        assert_eq!(to_instant_ms("2025-01-01 00:00", false).unwrap(), 1735689600000);
        assert_eq!(to_instant_ms("2025-01-01", false).unwrap(), 1735689600000);
    }

    #[test]
    fn end_of_day_only_applies_to_bare_dates() {
        // 2025-01-01T23:59:59Z
        assert_eq!(to_instant_ms("2025-01-01", true).unwrap(), 1735775999000);
        // A time-bearing form keeps its time even with end_of_day set.
        assert_eq!(to_instant_ms("2025-01-01 10:00:00", true).unwrap(), 1735725600000);
    }

    #[test]
    fn rejects_garbage() {
        assert!(matches!(
            to_instant_ms("random date", false),
            Err(AppError::InvalidDateFormat(s)) if s == "random date"
        ));
        assert!(to_instant_ms("01/02/2025", false).is_err());
        assert!(to_instant_ms("", false).is_err());
    }

    #[test]
    fn validate_range_accepts_ordered_dates() {
        assert!(validate_range("2025-01-01", Some("2025-01-31"), 365).is_ok());
        assert!(validate_range("2025-01-01", None, 365).is_ok());
        assert!(validate_range("2025-01-01 08:00:00", Some("2025-01-01 09:00:00"), 365).is_ok());
    }

    #[test]
    fn validate_range_rejects_reversed_dates() {
        assert!(matches!(
            validate_range("2025-02-01", Some("2025-01-01"), 365),
            Err(AppError::RangeOrder(_))
        ));
    }

    #[test]
    fn validate_range_rejects_bare_minute_form() {
        // Accepted by to_instant_ms but not by the stricter validation set.
        assert!(to_instant_ms("2025-01-01 08:00", false).is_ok());
        assert!(matches!(
            validate_range("2025-01-01 08:00", None, 365),
            Err(AppError::InvalidDateFormat(_))
        ));
    }

    #[test]
    fn oversized_range_is_not_an_error() {
        assert!(validate_range("2020-01-01", Some("2025-01-01"), 365).is_ok());
    }
}
