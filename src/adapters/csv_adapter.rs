//! CSV file series adapter.
//!
//! Reads a header-led CSV whose first column is a date. The value column is
//! picked by header name, or defaults to the second column.

use crate::domain::error::DcaError;
use crate::domain::time_series::{Observation, TimeSeries};
use crate::ports::series_port::SeriesPort;
use chrono::NaiveDate;
use std::fs;
use std::path::PathBuf;

pub struct CsvAdapter {
    path: PathBuf,
    series_name: String,
    column: Option<String>,
}

impl CsvAdapter {
    pub fn new(path: PathBuf, series_name: impl Into<String>) -> Self {
        Self {
            path,
            series_name: series_name.into(),
            column: None,
        }
    }

    pub fn with_column(mut self, column: Option<String>) -> Self {
        self.column = column.filter(|c| !c.trim().is_empty());
        self
    }

    fn value_index(&self, headers: &csv::StringRecord) -> Result<usize, DcaError> {
        match &self.column {
            Some(name) => headers
                .iter()
                .position(|h| h.trim().eq_ignore_ascii_case(name.trim()))
                .ok_or_else(|| DcaError::Data {
                    reason: format!("{}: no column named '{}'", self.path.display(), name),
                }),
            None if headers.len() >= 2 => Ok(1),
            None => Err(DcaError::Data {
                reason: format!("{}: expected a date and a value column", self.path.display()),
            }),
        }
    }
}

/// Accepts `YYYY-MM-DD`, optionally followed by a time component.
fn parse_date(value: &str) -> Result<NaiveDate, DcaError> {
    let trimmed = value.trim();
    let date_part = trimmed.get(..10).unwrap_or(trimmed);
    NaiveDate::parse_from_str(date_part, "%Y-%m-%d").map_err(|e| DcaError::Data {
        reason: format!("invalid date format '{}': {}", trimmed, e),
    })
}

impl SeriesPort for CsvAdapter {
    fn fetch_series(&self) -> Result<TimeSeries, DcaError> {
        let content = fs::read_to_string(&self.path).map_err(|e| DcaError::Data {
            reason: format!("failed to read {}: {}", self.path.display(), e),
        })?;

        let mut rdr = csv::ReaderBuilder::new()
            .flexible(true)
            .from_reader(content.as_bytes());

        let headers = rdr
            .headers()
            .map_err(|e| DcaError::Data {
                reason: format!("CSV header error: {}", e),
            })?
            .clone();
        let value_idx = self.value_index(&headers)?;

        let mut observations = Vec::new();

        for result in rdr.records() {
            let record = result.map_err(|e| DcaError::Data {
                reason: format!("CSV parse error: {}", e),
            })?;

            let date_str = record.get(0).ok_or_else(|| DcaError::Data {
                reason: "missing date column".into(),
            })?;
            let date = parse_date(date_str)?;

            let raw = record.get(value_idx).map(str::trim).unwrap_or_default();
            if raw.is_empty() {
                continue;
            }
            let value: f64 = raw.parse().map_err(|e| DcaError::Data {
                reason: format!("invalid value '{}' on {}: {}", raw, date, e),
            })?;

            observations.push(Observation { date, value });
        }

        observations.sort_by_key(|o| o.date);
        log::debug!(
            "loaded {} {} observations from {}",
            observations.len(),
            self.series_name,
            self.path.display()
        );
        TimeSeries::new(self.series_name.clone(), observations)
    }
}
