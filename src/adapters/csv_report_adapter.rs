//! Per-cohort results as CSV, implementing ReportPort.

use std::fs;
use std::path::Path;

use serde::Serialize;

use crate::domain::aggregate::CohortRun;
use crate::domain::cohort::{SimulationConfig, SimulationResult};
use crate::domain::error::DcaError;
use crate::ports::report_port::ReportPort;

/// One row per cohort; absent real values serialise as empty cells.
#[derive(Debug, Serialize)]
struct ResultRow {
    #[serde(rename = "Start Year")]
    start_year: i32,
    #[serde(rename = "Total Months Invested")]
    months_invested: usize,
    #[serde(rename = "Total Amount Invested (Nominal)")]
    total_nominal_invested: f64,
    #[serde(rename = "Total Amount Invested (Real)")]
    total_real_invested: Option<f64>,
    #[serde(rename = "Final Portfolio Value (Nominal)")]
    final_nominal_value: f64,
    #[serde(rename = "Final Portfolio Value (Real)")]
    final_real_value: Option<f64>,
    #[serde(rename = "Nominal CAGR")]
    nominal_cagr: f64,
    #[serde(rename = "Real CAGR")]
    real_cagr: Option<f64>,
}

impl From<&SimulationResult> for ResultRow {
    fn from(r: &SimulationResult) -> Self {
        ResultRow {
            start_year: r.start_year,
            months_invested: r.months_invested,
            total_nominal_invested: r.total_nominal_invested,
            total_real_invested: r.total_real_invested,
            final_nominal_value: r.final_nominal_value,
            final_real_value: r.final_real_value,
            nominal_cagr: r.nominal_cagr,
            real_cagr: r.real_cagr,
        }
    }
}

pub struct CsvReportAdapter;

impl CsvReportAdapter {
    pub fn new() -> Self {
        Self
    }
}

impl Default for CsvReportAdapter {
    fn default() -> Self {
        Self::new()
    }
}

impl ReportPort for CsvReportAdapter {
    fn write(
        &self,
        run: &CohortRun,
        _config: &SimulationConfig,
        output_path: &Path,
    ) -> Result<(), DcaError> {
        if let Some(parent) = output_path.parent() {
            fs::create_dir_all(parent)?;
        }

        let report_err = |e: csv::Error| DcaError::Report {
            reason: format!("failed to write {}: {}", output_path.display(), e),
        };

        let mut writer = csv::Writer::from_path(output_path).map_err(report_err)?;
        for result in &run.results {
            writer.serialize(ResultRow::from(result)).map_err(report_err)?;
        }
        writer.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::inflation::InflationPolicy;
    use crate::domain::metrics::CohortSummary;
    use chrono::NaiveDate;

    fn result(start_year: i32, real_cagr: Option<f64>) -> SimulationResult {
        SimulationResult {
            start_year,
            months_invested: 12,
            total_nominal_invested: 6000.0,
            total_real_invested: real_cagr.map(|_| 6100.0),
            final_nominal_value: 6600.0,
            final_real_value: real_cagr.map(|_| 6600.0),
            nominal_cagr: 0.1,
            real_cagr,
            history: Vec::new(),
        }
    }

    fn config() -> SimulationConfig {
        SimulationConfig {
            start_years: vec![2020, 2021],
            end_date: NaiveDate::from_ymd_opt(2021, 12, 31).unwrap(),
            monthly_contribution: 500.0,
            adjust_for_inflation: true,
            inflation_policy: InflationPolicy::FailClosed,
            parallel: false,
        }
    }

    #[test]
    fn writes_header_and_one_row_per_cohort() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("simulation_results.csv");
        let results = vec![result(2020, Some(0.08)), result(2021, None)];
        let run = CohortRun {
            summary: CohortSummary::compute(&results),
            results,
        };

        CsvReportAdapter::new().write(&run, &config(), &path).unwrap();

        let mut rdr = csv::Reader::from_path(&path).unwrap();
        let headers = rdr.headers().unwrap().clone();
        assert_eq!(headers.get(0), Some("Start Year"));
        assert_eq!(headers.get(7), Some("Real CAGR"));

        let rows: Vec<csv::StringRecord> = rdr.records().map(|r| r.unwrap()).collect();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].get(0), Some("2020"));
        assert_eq!(rows[0].get(7), Some("0.08"));
        assert_eq!(rows[1].get(0), Some("2021"));
        assert_eq!(rows[1].get(7), Some(""));
    }
}
