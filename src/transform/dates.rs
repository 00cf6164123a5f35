//! Date column parsing
//!
//! Source files carry dates as text in a handful of shapes. Values are parsed
//! into naive local timestamps; date-only values land at midnight. A blank
//! cell is a missing date, not a parse failure.

use crate::error::EtlError;
use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, NaiveTime, TimeDelta};

// Slash dates with the year last are month-first.
const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%Y%m%d",
    "%m/%d/%Y",
    "%b %d, %Y",
    "%B %d, %Y",
    "%d %b %Y",
];

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
];

/// Parse a date or timestamp, returning `None` if no known format matches
///
/// Timestamps carrying an offset are converted to local wall-clock time.
pub fn parse_timestamp(value: &str) -> Option<NaiveDateTime> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }

    if let Some(date) = DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(value, fmt).ok())
    {
        return Some(date.and_time(NaiveTime::MIN));
    }

    if let Some(ts) = DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(value, fmt).ok())
    {
        return Some(ts);
    }

    DateTime::parse_from_rfc3339(value)
        .ok()
        .map(|ts| ts.with_timezone(&Local).naive_local())
}

/// Parse a value from a named date column
///
/// A blank value is `Ok(None)`. `row` is the 1-based data row, used only for
/// the error.
pub fn parse_column(
    dataset: &'static str,
    column: &'static str,
    row: usize,
    value: &str,
) -> Result<Option<NaiveDateTime>, EtlError> {
    if value.trim().is_empty() {
        return Ok(None);
    }
    parse_timestamp(value)
        .map(Some)
        .ok_or_else(|| EtlError::DateParse {
            dataset,
            column,
            row,
            value: value.to_string(),
        })
}

/// Whole days in `delta`, rounded toward negative infinity
pub fn whole_days(delta: TimeDelta) -> i64 {
    let days = delta.num_days();
    if delta < TimeDelta::days(days) {
        days - 1
    } else {
        days
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ts(s: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S").unwrap()
    }

    #[test]
    fn test_date_only_formats() {
        let midnight = ts("2024-01-05 00:00:00");
        assert_eq!(parse_timestamp("2024-01-05"), Some(midnight));
        assert_eq!(parse_timestamp("2024/01/05"), Some(midnight));
        assert_eq!(parse_timestamp("20240105"), Some(midnight));
        assert_eq!(parse_timestamp(" 2024-01-05 "), Some(midnight));
    }

    #[test]
    fn test_month_first_and_textual_dates() {
        let midnight = ts("2024-02-01 00:00:00");
        assert_eq!(parse_timestamp("02/01/2024"), Some(midnight));
        assert_eq!(parse_timestamp("2/1/2024"), Some(midnight));
        assert_eq!(parse_timestamp("Feb 1, 2024"), Some(midnight));
        assert_eq!(parse_timestamp("February 1, 2024"), Some(midnight));
        assert_eq!(parse_timestamp("1 Feb 2024"), Some(midnight));
        assert_eq!(
            parse_timestamp("02/01/2024 09:30"),
            Some(ts("2024-02-01 09:30:00"))
        );
        assert_eq!(
            parse_timestamp("02/01/2024 09:30:15"),
            Some(ts("2024-02-01 09:30:15"))
        );
    }

    #[test]
    fn test_datetime_formats() {
        assert_eq!(
            parse_timestamp("2024-01-05 13:45:10"),
            Some(ts("2024-01-05 13:45:10"))
        );
        assert_eq!(
            parse_timestamp("2024-01-05T13:45:10.250"),
            Some(ts("2024-01-05 13:45:10") + TimeDelta::milliseconds(250))
        );
        assert_eq!(
            parse_timestamp("2024-01-05 13:45"),
            Some(ts("2024-01-05 13:45:00"))
        );
    }

    #[test]
    fn test_offset_timestamp_parses() {
        assert!(parse_timestamp("2024-01-05T13:45:10+02:00").is_some());
        assert!(parse_timestamp("2024-01-05T13:45:10Z").is_some());
    }

    #[test]
    fn test_rejects_garbage() {
        assert_eq!(parse_timestamp(""), None);
        assert_eq!(parse_timestamp("yesterday"), None);
        assert_eq!(parse_timestamp("2024-13-01"), None);
        assert_eq!(parse_timestamp("2024-02-30"), None);
    }

    #[test]
    fn test_parse_column_blank_is_missing() {
        assert_eq!(parse_column("customers", "signup_date", 1, "").unwrap(), None);
        assert_eq!(
            parse_column("customers", "signup_date", 1, "   ").unwrap(),
            None
        );
        assert_eq!(
            parse_column("customers", "signup_date", 1, "2024-01-05").unwrap(),
            Some(ts("2024-01-05 00:00:00"))
        );
    }

    #[test]
    fn test_parse_column_error() {
        let err = parse_column("transactions", "txn_date", 4, "soon").unwrap_err();
        match err {
            EtlError::DateParse { row, value, .. } => {
                assert_eq!(row, 4);
                assert_eq!(value, "soon");
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_whole_days_floors() {
        assert_eq!(whole_days(TimeDelta::days(31)), 31);
        assert_eq!(whole_days(TimeDelta::hours(36)), 1);
        assert_eq!(whole_days(TimeDelta::hours(-12)), -1);
        assert_eq!(whole_days(TimeDelta::days(-2)), -2);
        assert_eq!(whole_days(TimeDelta::zero()), 0);
    }
}
