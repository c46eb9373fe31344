//! Series source port trait.

use crate::domain::error::DcaError;
use crate::domain::time_series::TimeSeries;
use chrono::NaiveDate;

/// A source of one date-keyed series (asset prices or a price index).
pub trait SeriesPort {
    /// Load the full series. Implementations return observations sorted by
    /// date and reject duplicates.
    fn fetch_series(&self) -> Result<TimeSeries, DcaError>;

    /// `(first date, last date, observation count)`, or `None` when empty.
    fn get_data_range(&self) -> Result<Option<(NaiveDate, NaiveDate, usize)>, DcaError> {
        let series = self.fetch_series()?;
        Ok(match (series.first(), series.last()) {
            (Some(first), Some(last)) => Some((first.date, last.date, series.len())),
            _ => None,
        })
    }
}
