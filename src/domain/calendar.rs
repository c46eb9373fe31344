//! Calendar-month arithmetic and trading-day resolution.

use chrono::{Datelike, Months, NaiveDate};

use crate::domain::time_series::TimeSeries;

pub fn month_start(year: i32, month: u32) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(year, month, 1)
}

pub fn month_end(year: i32, month: u32) -> Option<NaiveDate> {
    month_start(year, month)?
        .checked_add_months(Months::new(1))?
        .pred_opt()
}

/// Earliest observation date of `series` within the given month that does
/// not exceed `ceiling`.
///
/// Returns `None` when the month has no observation on or before the
/// ceiling, which callers treat as a skipped month.
pub fn first_trading_day(
    series: &TimeSeries,
    year: i32,
    month: u32,
    ceiling: NaiveDate,
) -> Option<NaiveDate> {
    let start = month_start(year, month)?;
    let candidate = series.first_on_or_after(start)?.date;

    let same_month = candidate.year() == year && candidate.month() == month;
    if same_month && candidate <= ceiling {
        Some(candidate)
    } else {
        None
    }
}

/// Iterator over the first day of each calendar month from `start`'s month
/// while the month start stays on or before `end`.
#[derive(Debug, Clone)]
pub struct MonthStarts {
    next: Option<NaiveDate>,
    end: NaiveDate,
}

impl MonthStarts {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self {
            next: month_start(start.year(), start.month()),
            end,
        }
    }
}

impl Iterator for MonthStarts {
    type Item = NaiveDate;

    fn next(&mut self) -> Option<NaiveDate> {
        let current = self.next.filter(|d| *d <= self.end)?;
        self.next = current.checked_add_months(Months::new(1));
        Some(current)
    }
}
