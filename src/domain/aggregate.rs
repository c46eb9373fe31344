//! Multi-cohort runs over a shared pair of series.
//!
//! Every configured start year is simulated independently against the same
//! immutable price and index series. Results keep the configured start-year
//! order whether cohorts run sequentially or on the rayon pool.

use chrono::NaiveDate;
use rayon::prelude::*;

use crate::domain::cohort::{simulate_cohort, SimulationConfig, SimulationResult};
use crate::domain::error::DcaError;
use crate::domain::inflation::InflationAdjuster;
use crate::domain::metrics::CohortSummary;
use crate::domain::time_series::TimeSeries;

#[derive(Debug, Clone, PartialEq)]
pub struct CohortRun {
    pub results: Vec<SimulationResult>,
    pub summary: CohortSummary,
}

impl CohortRun {
    pub fn result_for(&self, start_year: i32) -> Option<&SimulationResult> {
        self.results.iter().find(|r| r.start_year == start_year)
    }
}

/// A series is usable when it has data on or before the end date.
pub fn validate_series(series: &TimeSeries, end_date: NaiveDate) -> Result<(), DcaError> {
    let first = series.first().ok_or_else(|| DcaError::EmptySeries {
        series: series.name().to_string(),
    })?;
    if first.date > end_date {
        return Err(DcaError::InsufficientSeries {
            series: series.name().to_string(),
            end_date,
            first_date: first.date,
        });
    }
    Ok(())
}

/// Simulate every configured cohort and summarise their CAGRs.
///
/// The index series is only consulted, and only required, when inflation
/// adjustment is enabled. Its target value is resolved once for the run.
pub fn run_cohorts(
    prices: &TimeSeries,
    index: Option<&TimeSeries>,
    config: &SimulationConfig,
) -> Result<CohortRun, DcaError> {
    validate_series(prices, config.end_date)?;

    let adjuster = if config.adjust_for_inflation {
        let index = index.ok_or(DcaError::MissingIndexSeries)?;
        validate_series(index, config.end_date)?;
        Some(InflationAdjuster::new(index, config.end_date))
    } else {
        None
    };

    log::info!(
        "running {} cohorts to {} ({}, inflation {})",
        config.start_years.len(),
        config.end_date,
        if config.parallel { "parallel" } else { "sequential" },
        if config.adjust_for_inflation { "on" } else { "off" },
    );

    let simulate = |&year: &i32| simulate_cohort(prices, adjuster.as_ref(), year, config);
    let results: Vec<SimulationResult> = if config.parallel {
        config.start_years.par_iter().map(simulate).collect()
    } else {
        config.start_years.iter().map(simulate).collect()
    };

    let summary = CohortSummary::compute(&results);
    log::info!("completed {} cohorts", results.len());

    Ok(CohortRun { results, summary })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::inflation::InflationPolicy;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn monthly_prices() -> TimeSeries {
        let pairs = (0..36).map(|i| {
            let date = d(2018 + i / 12, (i % 12) as u32 + 1, 3);
            (date, 100.0 + i as f64 * 2.0)
        });
        TimeSeries::from_pairs("price", pairs).unwrap()
    }

    fn config(years: Vec<i32>) -> SimulationConfig {
        SimulationConfig {
            start_years: years,
            end_date: d(2020, 12, 31),
            monthly_contribution: 500.0,
            adjust_for_inflation: false,
            inflation_policy: InflationPolicy::FailOpen,
            parallel: false,
        }
    }

    #[test]
    fn results_follow_configured_order() {
        let prices = monthly_prices();
        let run = run_cohorts(&prices, None, &config(vec![2020, 2018, 2019])).unwrap();
        let years: Vec<i32> = run.results.iter().map(|r| r.start_year).collect();
        assert_eq!(years, vec![2020, 2018, 2019]);
        assert_eq!(run.result_for(2018).unwrap().months_invested, 36);
        assert_eq!(run.result_for(2020).unwrap().months_invested, 12);
    }

    #[test]
    fn parallel_matches_sequential() {
        let prices = monthly_prices();
        let mut cfg = config(vec![2018, 2019, 2020, 2021]);
        let sequential = run_cohorts(&prices, None, &cfg).unwrap();
        cfg.parallel = true;
        let parallel = run_cohorts(&prices, None, &cfg).unwrap();
        assert_eq!(sequential, parallel);
    }

    #[test]
    fn degenerate_cohort_does_not_abort_run() {
        let prices = monthly_prices();
        let run = run_cohorts(&prices, None, &config(vec![2019, 2030])).unwrap();
        assert_eq!(run.results.len(), 2);
        assert!(run.result_for(2030).unwrap().is_degenerate());
    }

    #[test]
    fn empty_price_series_is_fatal() {
        let prices = TimeSeries::new("price", Vec::new()).unwrap();
        let err = run_cohorts(&prices, None, &config(vec![2020])).unwrap_err();
        assert!(matches!(err, DcaError::EmptySeries { .. }));
    }

    #[test]
    fn end_date_before_series_is_fatal() {
        let prices = monthly_prices();
        let mut cfg = config(vec![2017]);
        cfg.end_date = d(2017, 12, 31);
        let err = run_cohorts(&prices, None, &cfg).unwrap_err();
        assert!(matches!(err, DcaError::InsufficientSeries { .. }));
    }

    #[test]
    fn inflation_requires_index_series() {
        let prices = monthly_prices();
        let mut cfg = config(vec![2020]);
        cfg.adjust_for_inflation = true;
        let err = run_cohorts(&prices, None, &cfg).unwrap_err();
        assert!(matches!(err, DcaError::MissingIndexSeries));
    }

    #[test]
    fn inflation_disabled_ignores_index() {
        let prices = monthly_prices();
        let empty_index = TimeSeries::new("cpi", Vec::new()).unwrap();
        let run = run_cohorts(&prices, Some(&empty_index), &config(vec![2019])).unwrap();
        assert!(run.results.iter().all(|r| r.real_cagr.is_none()));
        assert!(run.summary.real.is_none());
    }
}
