//! Per-cohort purchase histories as JSON, implementing ReportPort.
//!
//! Output is an object keyed by start year; each value lists the cohort's
//! purchases in date order.

use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::BufWriter;
use std::path::Path;

use chrono::NaiveDate;
use serde::Serialize;

use crate::domain::aggregate::CohortRun;
use crate::domain::cohort::{InvestmentEvent, SimulationConfig};
use crate::domain::error::DcaError;
use crate::ports::report_port::ReportPort;

#[derive(Debug, Serialize)]
struct HistoryPoint {
    date: NaiveDate,
    market_value: f64,
    cumulative_invested: f64,
    profit: f64,
}

impl From<&InvestmentEvent> for HistoryPoint {
    fn from(e: &InvestmentEvent) -> Self {
        HistoryPoint {
            date: e.date,
            market_value: e.market_value,
            cumulative_invested: e.cumulative_nominal_invested,
            profit: e.profit,
        }
    }
}

pub struct JsonHistoryAdapter;

impl JsonHistoryAdapter {
    pub fn new() -> Self {
        Self
    }
}

impl Default for JsonHistoryAdapter {
    fn default() -> Self {
        Self::new()
    }
}

impl ReportPort for JsonHistoryAdapter {
    fn write(
        &self,
        run: &CohortRun,
        _config: &SimulationConfig,
        output_path: &Path,
    ) -> Result<(), DcaError> {
        let histories: BTreeMap<i32, Vec<HistoryPoint>> = run
            .results
            .iter()
            .map(|r| (r.start_year, r.history.iter().map(HistoryPoint::from).collect()))
            .collect();

        if let Some(parent) = output_path.parent() {
            fs::create_dir_all(parent)?;
        }
        let writer = BufWriter::new(File::create(output_path)?);
        serde_json::to_writer_pretty(writer, &histories).map_err(|e| DcaError::Report {
            reason: format!("failed to write {}: {}", output_path.display(), e),
        })?;
        Ok(())
    }
}
