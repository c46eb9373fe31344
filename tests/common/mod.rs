#![allow(dead_code)]

use chrono::{Datelike, NaiveDate, Weekday};
use dcacohort::domain::cohort::SimulationConfig;
use dcacohort::domain::error::DcaError;
use dcacohort::domain::inflation::InflationPolicy;
use dcacohort::domain::time_series::TimeSeries;
use dcacohort::ports::series_port::SeriesPort;

/// In-memory series source; optionally fails with a data error.
pub struct MockSeriesPort {
    pub series: TimeSeries,
    pub error: Option<String>,
}

impl MockSeriesPort {
    pub fn new(series: TimeSeries) -> Self {
        Self {
            series,
            error: None,
        }
    }

    pub fn failing(name: &str, reason: &str) -> Self {
        Self {
            series: TimeSeries::new(name, Vec::new()).unwrap(),
            error: Some(reason.to_string()),
        }
    }
}

impl SeriesPort for MockSeriesPort {
    fn fetch_series(&self) -> Result<TimeSeries, DcaError> {
        match &self.error {
            Some(reason) => Err(DcaError::Data {
                reason: reason.clone(),
            }),
            None => Ok(self.series.clone()),
        }
    }
}

pub fn date(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

pub fn series(name: &str, points: &[(&str, f64)]) -> TimeSeries {
    TimeSeries::from_pairs(name, points.iter().map(|(d, v)| (date(d), *v))).unwrap()
}

/// Weekday prices from `start` to `end` inclusive, following `price_at`.
pub fn weekday_prices<F>(start: NaiveDate, end: NaiveDate, price_at: F) -> TimeSeries
where
    F: Fn(usize) -> f64,
{
    let mut pairs = Vec::new();
    let mut day = start;
    let mut i = 0;
    while day <= end {
        if !matches!(day.weekday(), Weekday::Sat | Weekday::Sun) {
            pairs.push((day, price_at(i)));
            i += 1;
        }
        day = day.succ_opt().unwrap();
    }
    TimeSeries::from_pairs("prices", pairs).unwrap()
}

/// One index observation on the first day of every month.
pub fn monthly_index<F>(start_year: i32, end_year: i32, value_at: F) -> TimeSeries
where
    F: Fn(usize) -> f64,
{
    let mut pairs = Vec::new();
    let mut i = 0;
    for year in start_year..=end_year {
        for month in 1..=12 {
            pairs.push((NaiveDate::from_ymd_opt(year, month, 1).unwrap(), value_at(i)));
            i += 1;
        }
    }
    TimeSeries::from_pairs("price_index", pairs).unwrap()
}

pub fn make_config(start_years: Vec<i32>, end_date: &str, adjust: bool) -> SimulationConfig {
    SimulationConfig {
        start_years,
        end_date: date(end_date),
        monthly_contribution: 500.0,
        adjust_for_inflation: adjust,
        inflation_policy: InflationPolicy::FailOpen,
        parallel: false,
    }
}

pub fn write_file(dir: &std::path::Path, name: &str, content: &str) -> std::path::PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, content).unwrap();
    path
}
