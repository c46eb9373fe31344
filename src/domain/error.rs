//! Domain error types.

use chrono::NaiveDate;

use crate::domain::start_years::StartYearsError;

/// Top-level error type for dcacohort.
///
/// Only conditions that abort a whole run live here. A skipped month, an
/// unresolvable index value or a cohort with no purchases are ordinary
/// outcomes and never surface as errors.
#[derive(Debug, thiserror::Error)]
pub enum DcaError {
    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("missing config key [{section}] {key}")]
    ConfigMissing { section: String, key: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    #[error(transparent)]
    StartYears(#[from] StartYearsError),

    #[error("data source error: {reason}")]
    Data { reason: String },

    #[error("{series} series has no observations")]
    EmptySeries { series: String },

    #[error("{series} series starts at {first_date}, after the end date {end_date}")]
    InsufficientSeries {
        series: String,
        end_date: NaiveDate,
        first_date: NaiveDate,
    },

    #[error("{series} series is not strictly increasing at {date}")]
    UnorderedSeries { series: String, date: NaiveDate },

    #[error("{series} series has invalid observation {value} at {date}")]
    InvalidObservation {
        series: String,
        date: NaiveDate,
        value: f64,
    },

    #[error("inflation adjustment is enabled but no price index series was supplied")]
    MissingIndexSeries,

    #[error("report error: {reason}")]
    Report { reason: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<&DcaError> for std::process::ExitCode {
    fn from(err: &DcaError) -> Self {
        let code: u8 = match err {
            DcaError::Io(_) | DcaError::Report { .. } => 1,
            DcaError::ConfigParse { .. }
            | DcaError::ConfigMissing { .. }
            | DcaError::ConfigInvalid { .. }
            | DcaError::StartYears(_)
            | DcaError::MissingIndexSeries => 2,
            DcaError::Data { .. } => 3,
            DcaError::EmptySeries { .. }
            | DcaError::InsufficientSeries { .. }
            | DcaError::UnorderedSeries { .. }
            | DcaError::InvalidObservation { .. } => 5,
        };
        std::process::ExitCode::from(code)
    }
}
