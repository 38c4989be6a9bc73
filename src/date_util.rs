use chrono::{DateTime, Datelike, Days, NaiveDate, Utc};

use crate::error::{Error, Result};

/// Get the last day of a given month.
pub fn last_day_of_month(year: i32, month: u32) -> Option<NaiveDate> {
    let first_of_next = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)
    };
    first_of_next.and_then(|d| d.pred_opt())
}

/// Get the first day of the month containing `d`.
pub fn first_of_month(d: NaiveDate) -> NaiveDate {
    d.with_day(1).unwrap_or(d)
}

/// Monday of the ISO week containing `d`.
pub fn start_of_week(d: NaiveDate) -> NaiveDate {
    let offset = d.weekday().num_days_from_monday() as u64;
    d.checked_sub_days(Days::new(offset)).unwrap_or(d)
}

/// Step back `n` days, saturating at the earliest representable date.
pub fn days_before(d: NaiveDate, n: u64) -> NaiveDate {
    d.checked_sub_days(Days::new(n)).unwrap_or(NaiveDate::MIN)
}

/// Parse an RFC 3339 timestamp into UTC.
pub fn parse_instant(s: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s.trim())
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| Error::InvalidTimestamp(format!("{s}: {e}")))
}

/// Parse a calendar date in `YYYY-MM-DD` form.
pub fn parse_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
        .map_err(|e| Error::InvalidTimestamp(format!("{s}: {e}")))
}

/// Round half-up to the nearest integer.
///
/// `f64::round` rounds half away from zero; this rounds half toward
/// positive infinity, so `-2.5` becomes `-2`.
pub fn round_half_up(x: f64) -> f64 {
    (x + 0.5).floor()
}

/// Round half-up to two decimal places.
pub fn round2(x: f64) -> f64 {
    round_half_up(x * 100.0) / 100.0
}
