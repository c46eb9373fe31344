//! Conversion of nominal amounts into real (target-date) dollars.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;

use crate::domain::time_series::TimeSeries;

/// What a cohort does when an amount cannot be adjusted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InflationPolicy {
    /// Carry the unadjusted nominal amount for that single value.
    #[default]
    FailOpen,
    /// Report the cohort's real metrics as unavailable.
    FailClosed,
}

impl FromStr for InflationPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "fail_open" | "open" => Ok(Self::FailOpen),
            "fail_closed" | "closed" => Ok(Self::FailClosed),
            other => Err(format!(
                "unknown inflation policy '{other}' (expected fail_open or fail_closed)"
            )),
        }
    }
}

impl fmt::Display for InflationPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::FailOpen => write!(f, "fail_open"),
            Self::FailClosed => write!(f, "fail_closed"),
        }
    }
}

/// Re-expresses nominal amounts in the purchasing power of a fixed target
/// date using a price-index series.
///
/// The target index value is resolved once, at construction. Index lookups
/// forward-fill past the last observation since index releases lag prices.
#[derive(Debug, Clone, Copy)]
pub struct InflationAdjuster<'a> {
    index: &'a TimeSeries,
    target_date: NaiveDate,
    target_index: Option<f64>,
}

impl<'a> InflationAdjuster<'a> {
    pub fn new(index: &'a TimeSeries, target_date: NaiveDate) -> Self {
        let target_index = index.as_of_filled(target_date).filter(|v| *v != 0.0);
        if target_index.is_none() {
            log::warn!(
                "no {} value on or before {target_date}; amounts will not be adjusted",
                index.name()
            );
        }
        Self {
            index,
            target_date,
            target_index,
        }
    }

    pub fn target_date(&self) -> NaiveDate {
        self.target_date
    }

    pub fn target_index(&self) -> Option<f64> {
        self.target_index
    }

    /// `nominal * target / index(date)`, or `None` when either index value
    /// cannot be resolved.
    pub fn try_to_real(&self, nominal: f64, date: NaiveDate) -> Option<f64> {
        let target = self.target_index?;
        let at_date = self.index.as_of_filled(date)?;
        Some(nominal * (target / at_date))
    }

    /// Fail-open conversion: falls back to the nominal amount.
    pub fn to_real(&self, nominal: f64, date: NaiveDate) -> f64 {
        match self.try_to_real(nominal, date) {
            Some(real) => real,
            None => {
                log::warn!(
                    "{} missing for {date} or target invalid; using nominal value",
                    self.index.name()
                );
                nominal
            }
        }
    }
}
