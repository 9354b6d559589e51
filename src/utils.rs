use crate::prelude::*;

/// Round a monetary amount to 2 decimal places, half away from zero.
pub fn round2(value: f64) -> f64 {
  (value * 100.0).round() / 100.0
}

/// Half-open `[start, end)` bounds of a calendar month.
pub fn month_bounds(year: i32, month: u32) -> Option<(DateTime, DateTime)> {
  let start = NaiveDate::from_ymd_opt(year, month, 1)?.and_hms_opt(0, 0, 0)?;
  let next = if month == 12 {
    NaiveDate::from_ymd_opt(year + 1, 1, 1)?
  } else {
    NaiveDate::from_ymd_opt(year, month + 1, 1)?
  };
  Some((start, next.and_hms_opt(0, 0, 0)?))
}
