//! Single-cohort dollar-cost-averaging simulation.
//!
//! A cohort starts contributing in January of its start year and buys once
//! per calendar month, on the month's first trading day, until the shared
//! end date. Months without a trading day are skipped outright; their
//! contribution is lost rather than carried forward.

use chrono::{Datelike, NaiveDate};

use crate::domain::calendar::{first_trading_day, month_start, MonthStarts};
use crate::domain::inflation::{InflationAdjuster, InflationPolicy};
use crate::domain::time_series::TimeSeries;

/// Run-wide simulation parameters, resolved once before any cohort runs.
#[derive(Debug, Clone, PartialEq)]
pub struct SimulationConfig {
    pub start_years: Vec<i32>,
    pub end_date: NaiveDate,
    pub monthly_contribution: f64,
    pub adjust_for_inflation: bool,
    pub inflation_policy: InflationPolicy,
    pub parallel: bool,
}

/// One monthly purchase.
#[derive(Debug, Clone, PartialEq)]
pub struct InvestmentEvent {
    pub date: NaiveDate,
    pub unit_price: f64,
    pub shares_purchased: f64,
    pub cumulative_shares: f64,
    pub cumulative_nominal_invested: f64,
    /// `cumulative_shares * unit_price` at the purchase date.
    pub market_value: f64,
    /// `market_value - cumulative_nominal_invested`.
    pub profit: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SimulationResult {
    pub start_year: i32,
    pub months_invested: usize,
    pub total_nominal_invested: f64,
    pub total_real_invested: Option<f64>,
    pub final_nominal_value: f64,
    pub final_real_value: Option<f64>,
    pub nominal_cagr: f64,
    pub real_cagr: Option<f64>,
    pub history: Vec<InvestmentEvent>,
}

impl SimulationResult {
    /// Zeroed result for a cohort that never bought anything. Real fields
    /// are zero rather than absent when adjustment is enabled.
    fn degenerate(start_year: i32, adjust_for_inflation: bool) -> Self {
        let real_zero = adjust_for_inflation.then_some(0.0);
        SimulationResult {
            start_year,
            months_invested: 0,
            total_nominal_invested: 0.0,
            total_real_invested: real_zero,
            final_nominal_value: 0.0,
            final_real_value: real_zero,
            nominal_cagr: 0.0,
            real_cagr: real_zero,
            history: Vec::new(),
        }
    }

    pub fn is_degenerate(&self) -> bool {
        self.months_invested == 0
    }

    pub fn final_shares(&self) -> f64 {
        self.history.last().map_or(0.0, |e| e.cumulative_shares)
    }
}

/// Annualised growth from `invested` to `final_value` over `months`.
///
/// Zero when nothing was invested or no time elapsed.
pub fn compound_annual_growth(final_value: f64, invested: f64, months: usize) -> f64 {
    let years = months as f64 / 12.0;
    if invested > 0.0 && years > 0.0 {
        (final_value / invested).powf(1.0 / years) - 1.0
    } else {
        0.0
    }
}

/// Price used to value holdings at `end_date`: exact, then as-of, then the
/// last observation of the series.
pub fn valuation_price(prices: &TimeSeries, end_date: NaiveDate) -> Option<f64> {
    prices
        .get(end_date)
        .or_else(|| prices.as_of(end_date))
        .or_else(|| prices.last().map(|o| o.value))
}

fn real_amount(
    adjuster: Option<&InflationAdjuster<'_>>,
    policy: InflationPolicy,
    nominal: f64,
    date: NaiveDate,
) -> Option<f64> {
    match (adjuster, policy) {
        (Some(adj), InflationPolicy::FailOpen) => Some(adj.to_real(nominal, date)),
        (Some(adj), InflationPolicy::FailClosed) => adj.try_to_real(nominal, date),
        (None, InflationPolicy::FailOpen) => Some(nominal),
        (None, InflationPolicy::FailClosed) => None,
    }
}

/// Simulate one cohort against the shared, read-only series.
///
/// Pure with respect to its inputs: running it twice yields identical
/// results, and cohorts may run concurrently.
pub fn simulate_cohort(
    prices: &TimeSeries,
    adjuster: Option<&InflationAdjuster<'_>>,
    start_year: i32,
    config: &SimulationConfig,
) -> SimulationResult {
    let adjust = config.adjust_for_inflation;
    let contribution = config.monthly_contribution;
    let end_date = config.end_date;

    let Some(start) = month_start(start_year, 1) else {
        return SimulationResult::degenerate(start_year, adjust);
    };

    let mut shares = 0.0_f64;
    let mut nominal_invested = 0.0_f64;
    let mut real_invested = 0.0_f64;
    let mut real_reliable = true;
    let mut history: Vec<InvestmentEvent> = Vec::new();

    for month in MonthStarts::new(start, end_date) {
        let Some(trade_date) = first_trading_day(prices, month.year(), month.month(), end_date)
        else {
            log::warn!(
                "cohort {start_year}: no trading day in {}, skipping contribution",
                month.format("%Y-%m")
            );
            continue;
        };

        let Some(price) = prices.get(trade_date).or_else(|| prices.as_of(trade_date)) else {
            continue;
        };

        let purchased = contribution / price;
        shares += purchased;
        nominal_invested += contribution;

        if adjust {
            match real_amount(adjuster, config.inflation_policy, contribution, trade_date) {
                Some(real) => real_invested += real,
                None => real_reliable = false,
            }
        }

        let market_value = shares * price;
        log::debug!(
            "cohort {start_year}: bought {purchased:.6} @ {price:.2} on {trade_date}, value {market_value:.2}"
        );
        history.push(InvestmentEvent {
            date: trade_date,
            unit_price: price,
            shares_purchased: purchased,
            cumulative_shares: shares,
            cumulative_nominal_invested: nominal_invested,
            market_value,
            profit: market_value - nominal_invested,
        });
    }

    if history.is_empty() {
        log::info!("cohort {start_year}: no investments made before {end_date}");
        return SimulationResult::degenerate(start_year, adjust);
    }

    let months_invested = history.len();
    let final_price = valuation_price(prices, end_date).unwrap_or(0.0);
    let final_nominal_value = shares * final_price;
    let nominal_cagr = compound_annual_growth(final_nominal_value, nominal_invested, months_invested);

    let (total_real_invested, final_real_value, real_cagr) = if adjust {
        let final_real = real_amount(adjuster, config.inflation_policy, final_nominal_value, end_date);
        match final_real.filter(|_| real_reliable) {
            Some(final_real) => (
                Some(real_invested),
                Some(final_real),
                Some(compound_annual_growth(final_real, real_invested, months_invested)),
            ),
            None => {
                log::warn!("cohort {start_year}: real metrics unavailable under fail-closed policy");
                (None, None, None)
            }
        }
    } else {
        (None, None, None)
    };

    log::info!(
        "cohort {start_year}: {months_invested} months, invested {nominal_invested:.2}, final {final_nominal_value:.2}, CAGR {:.2}%",
        nominal_cagr * 100.0
    );

    SimulationResult {
        start_year,
        months_invested,
        total_nominal_invested: nominal_invested,
        total_real_invested,
        final_nominal_value,
        final_real_value,
        nominal_cagr,
        real_cagr,
        history,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn prices() -> TimeSeries {
        TimeSeries::from_pairs(
            "price",
            vec![
                (d(2020, 1, 2), 100.0),
                (d(2020, 2, 3), 110.0),
                (d(2020, 3, 2), 90.0),
            ],
        )
        .unwrap()
    }

    fn config(end_date: NaiveDate, adjust: bool) -> SimulationConfig {
        SimulationConfig {
            start_years: vec![2020],
            end_date,
            monthly_contribution: 500.0,
            adjust_for_inflation: adjust,
            inflation_policy: InflationPolicy::FailOpen,
            parallel: false,
        }
    }

    #[test]
    fn three_month_scenario() {
        let ts = prices();
        let result = simulate_cohort(&ts, None, 2020, &config(d(2020, 3, 2), false));

        assert_eq!(result.months_invested, 3);
        assert_eq!(result.history.len(), 3);
        let expected_shares = 5.0 + 500.0 / 110.0 + 500.0 / 90.0;
        assert!((result.final_shares() - expected_shares).abs() < 1e-9);
        assert!((result.total_nominal_invested - 1500.0).abs() < f64::EPSILON);
        assert!((result.final_nominal_value - expected_shares * 90.0).abs() < 1e-9);
        assert!(result.nominal_cagr < 0.0);
        assert_eq!(result.final_real_value, None);
        assert_eq!(result.real_cagr, None);
    }

    #[test]
    fn end_date_before_second_trading_day() {
        let ts = prices();
        let result = simulate_cohort(&ts, None, 2020, &config(d(2020, 1, 15), false));

        assert_eq!(result.months_invested, 1);
        assert!((result.final_nominal_value - 500.0).abs() < 1e-9);
        assert!(result.nominal_cagr.abs() < 1e-12);
    }

    #[test]
    fn events_track_value_and_profit() {
        let ts = prices();
        let result = simulate_cohort(&ts, None, 2020, &config(d(2020, 3, 2), false));

        let second = &result.history[1];
        assert_eq!(second.date, d(2020, 2, 3));
        assert!((second.unit_price - 110.0).abs() < f64::EPSILON);
        assert!((second.cumulative_nominal_invested - 1000.0).abs() < f64::EPSILON);
        assert!((second.market_value - second.cumulative_shares * 110.0).abs() < 1e-9);
        assert!((second.profit - (second.market_value - 1000.0)).abs() < 1e-9);
    }

    #[test]
    fn skipped_month_loses_contribution() {
        let ts = TimeSeries::from_pairs(
            "price",
            vec![(d(2020, 1, 2), 100.0), (d(2020, 3, 2), 100.0)],
        )
        .unwrap();
        let result = simulate_cohort(&ts, None, 2020, &config(d(2020, 3, 31), false));

        assert_eq!(result.months_invested, 2);
        assert!((result.total_nominal_invested - 1000.0).abs() < f64::EPSILON);
        assert_eq!(result.history[1].date, d(2020, 3, 2));
    }

    #[test]
    fn cohort_after_end_date_is_degenerate() {
        let ts = prices();
        let result = simulate_cohort(&ts, None, 2021, &config(d(2020, 3, 2), false));

        assert!(result.is_degenerate());
        assert!(result.history.is_empty());
        assert_eq!(result.total_nominal_invested, 0.0);
        assert_eq!(result.final_nominal_value, 0.0);
        assert_eq!(result.nominal_cagr, 0.0);
        assert_eq!(result.real_cagr, None);
    }

    #[test]
    fn degenerate_cohort_with_inflation_has_zero_real_fields() {
        let ts = prices();
        let result = simulate_cohort(&ts, None, 2021, &config(d(2020, 3, 2), true));
        assert_eq!(result.final_real_value, Some(0.0));
        assert_eq!(result.real_cagr, Some(0.0));
    }

    #[test]
    fn valuation_falls_back_to_last_observation() {
        let ts = prices();
        assert_eq!(valuation_price(&ts, d(2020, 2, 3)), Some(110.0));
        assert_eq!(valuation_price(&ts, d(2020, 2, 20)), Some(110.0));
        assert_eq!(valuation_price(&ts, d(2021, 1, 1)), Some(90.0));
    }

    #[test]
    fn real_values_use_index_ratio() {
        let ts = prices();
        let cpi = TimeSeries::from_pairs(
            "cpi",
            vec![(d(2019, 12, 31), 100.0), (d(2020, 2, 29), 125.0)],
        )
        .unwrap();
        let end = d(2020, 3, 2);
        let adjuster = InflationAdjuster::new(&cpi, end);
        let result = simulate_cohort(&ts, Some(&adjuster), 2020, &config(end, true));

        // Jan and Feb purchases resolve to index 100, Mar to 125
        let expected_real_invested = 500.0 * 1.25 * 2.0 + 500.0;
        assert!((result.total_real_invested.unwrap() - expected_real_invested).abs() < 1e-9);
        // valued at the target date, so real equals nominal
        assert!((result.final_real_value.unwrap() - result.final_nominal_value).abs() < 1e-9);
        assert!(result.real_cagr.unwrap() < result.nominal_cagr);
    }

    #[test]
    fn fail_closed_drops_real_metrics_when_index_missing() {
        let ts = prices();
        let cpi = TimeSeries::from_pairs("cpi", vec![(d(2020, 2, 1), 100.0)]).unwrap();
        let end = d(2020, 3, 2);
        let adjuster = InflationAdjuster::new(&cpi, end);

        let mut cfg = config(end, true);
        let open = simulate_cohort(&ts, Some(&adjuster), 2020, &cfg);
        assert!(open.real_cagr.is_some());

        cfg.inflation_policy = InflationPolicy::FailClosed;
        let closed = simulate_cohort(&ts, Some(&adjuster), 2020, &cfg);
        assert_eq!(closed.final_real_value, None);
        assert_eq!(closed.real_cagr, None);
        assert_eq!(closed.months_invested, 3);
        assert_eq!(closed.nominal_cagr, open.nominal_cagr);
    }

    #[test]
    fn cagr_degenerate_inputs_are_zero() {
        assert_eq!(compound_annual_growth(100.0, 0.0, 12), 0.0);
        assert_eq!(compound_annual_growth(100.0, 50.0, 0), 0.0);
        assert!((compound_annual_growth(121.0, 100.0, 24) - 0.1).abs() < 1e-12);
    }
}
