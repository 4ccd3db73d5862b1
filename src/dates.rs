use std::time::{SystemTime, UNIX_EPOCH};

use time::{macros::format_description, Date, Duration, OffsetDateTime};

use crate::error::{Result, RssGraphError};

const SNAPSHOT_DATE_FORMAT: &[time::format_description::FormatItem<'static>] =
    format_description!("[year]-[month]-[day]");

const SECONDS_PER_DAY: i64 = 86_400;

pub fn now_ts() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs() as i64
}

/// Renders a date the way snapshot rows store it (`YYYY-MM-DD`).
pub fn format_date(date: Date) -> Result<String> {
    date.format(SNAPSHOT_DATE_FORMAT)
        .map_err(|e| RssGraphError::Runtime(e.to_string()))
}

pub fn parse_date(value: &str) -> Result<Date> {
    Date::parse(value.trim(), SNAPSHOT_DATE_FORMAT)
        .map_err(|e| RssGraphError::Config(format!("invalid date {value:?}: {e}")))
}

pub fn today() -> Result<String> {
    format_date(OffsetDateTime::now_utc().date())
}

/// The date `days` before `from`.
pub fn days_before(from: Date, days: u32) -> Result<String> {
    let date = from
        .checked_sub(Duration::days(i64::from(days)))
        .ok_or_else(|| RssGraphError::Runtime(format!("date out of range: {days} days")))?;
    format_date(date)
}

pub fn cutoff_ts(now: i64, days: u32) -> i64 {
    now - i64::from(days) * SECONDS_PER_DAY
}

/// Whole days elapsed between two unix timestamps.
pub fn days_since(ts: i64, now: i64) -> i64 {
    (now - ts).max(0) / SECONDS_PER_DAY
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::date;

    #[test]
    fn formats_and_parses_snapshot_dates() {
        assert_eq!(format_date(date!(2024 - 03 - 07)).unwrap(), "2024-03-07");
        assert_eq!(parse_date("2024-03-07").unwrap(), date!(2024 - 03 - 07));
        assert!(parse_date("03/07/2024").is_err());
    }

    #[test]
    fn retention_cutoff_crosses_month_boundaries() {
        assert_eq!(days_before(date!(2024 - 03 - 01), 1).unwrap(), "2024-02-29");
        assert_eq!(days_before(date!(2024 - 03 - 31), 90).unwrap(), "2024-01-01");
    }

    #[test]
    fn day_arithmetic_on_timestamps() {
        assert_eq!(cutoff_ts(10 * SECONDS_PER_DAY, 3), 7 * SECONDS_PER_DAY);
        assert_eq!(days_since(0, 2 * SECONDS_PER_DAY + 5), 2);
        assert_eq!(days_since(100, 0), 0);
    }
}
