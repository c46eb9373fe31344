//! Date-keyed observation series with exact and as-of lookup.
//!
//! A [`TimeSeries`] is immutable once built. Dates are strictly increasing
//! and may have arbitrary gaps (weekends, holidays, monthly index cadence).
//! Lookups never interpolate; the only extrapolation offered is an opt-in
//! forward fill past the last observation.

use chrono::{Datelike, NaiveDate};

use crate::domain::calendar::month_end;
use crate::domain::error::DcaError;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Observation {
    pub date: NaiveDate,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TimeSeries {
    name: String,
    observations: Vec<Observation>,
}

impl TimeSeries {
    /// Build a series from observations already in date order.
    ///
    /// Rejects duplicate or descending dates and values that are not finite
    /// and positive. An empty series is allowed here; the aggregator decides
    /// whether emptiness is fatal for a run.
    pub fn new(name: impl Into<String>, observations: Vec<Observation>) -> Result<Self, DcaError> {
        let name = name.into();

        for obs in &observations {
            if !obs.value.is_finite() || obs.value <= 0.0 {
                return Err(DcaError::InvalidObservation {
                    series: name,
                    date: obs.date,
                    value: obs.value,
                });
            }
        }

        if let Some(w) = observations.windows(2).find(|w| w[1].date <= w[0].date) {
            return Err(DcaError::UnorderedSeries {
                series: name,
                date: w[1].date,
            });
        }

        Ok(Self { name, observations })
    }

    pub fn from_pairs<I>(name: impl Into<String>, pairs: I) -> Result<Self, DcaError>
    where
        I: IntoIterator<Item = (NaiveDate, f64)>,
    {
        let observations = pairs
            .into_iter()
            .map(|(date, value)| Observation { date, value })
            .collect();
        Self::new(name, observations)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn len(&self) -> usize {
        self.observations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }

    pub fn observations(&self) -> &[Observation] {
        &self.observations
    }

    pub fn first(&self) -> Option<&Observation> {
        self.observations.first()
    }

    pub fn last(&self) -> Option<&Observation> {
        self.observations.last()
    }

    /// Value at exactly `date`, if that date is an observation point.
    pub fn get(&self, date: NaiveDate) -> Option<f64> {
        self.observations
            .binary_search_by_key(&date, |o| o.date)
            .ok()
            .map(|i| self.observations[i].value)
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.get(date).is_some()
    }

    /// Most recent value on or before `date`.
    ///
    /// `None` before the first observation and after the last one; use
    /// [`TimeSeries::as_of_filled`] to forward-fill past the end.
    pub fn as_of(&self, date: NaiveDate) -> Option<f64> {
        let last = self.observations.last()?;
        if date > last.date {
            return None;
        }
        self.as_of_filled(date)
    }

    /// Like [`TimeSeries::as_of`], but a date after the last observation
    /// resolves to the last value.
    pub fn as_of_filled(&self, date: NaiveDate) -> Option<f64> {
        let idx = self.observations.partition_point(|o| o.date <= date);
        if idx == 0 {
            None
        } else {
            Some(self.observations[idx - 1].value)
        }
    }

    /// First observation dated on or after `date`.
    pub fn first_on_or_after(&self, date: NaiveDate) -> Option<&Observation> {
        let idx = self.observations.partition_point(|o| o.date < date);
        self.observations.get(idx)
    }

    /// Collapse to the last observation of each calendar month, keyed at
    /// the month's final calendar day.
    pub fn resample_month_end(&self) -> TimeSeries {
        let mut resampled: Vec<Observation> = Vec::new();

        for obs in &self.observations {
            let key = month_end(obs.date.year(), obs.date.month()).unwrap_or(obs.date);
            match resampled.last_mut() {
                Some(prev) if prev.date == key => prev.value = obs.value,
                _ => resampled.push(Observation {
                    date: key,
                    value: obs.value,
                }),
            }
        }

        TimeSeries {
            name: self.name.clone(),
            observations: resampled,
        }
    }
}
