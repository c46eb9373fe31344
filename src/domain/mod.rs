//! Core simulation types and logic. Nothing here performs I/O.

pub mod time_series;
pub mod calendar;
pub mod inflation;
pub mod cohort;
pub mod aggregate;
pub mod metrics;
pub mod start_years;
pub mod config_validation;
pub mod error;
