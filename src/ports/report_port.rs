//! Report generation port trait.

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use crate::domain::aggregate::CohortRun;
use crate::domain::cohort::SimulationConfig;
use crate::domain::error::DcaError;

/// Output formats the CLI knows how to write.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReportFormat {
    Csv,
    Json,
    Html,
    Text,
}

impl ReportFormat {
    pub const ALL: [ReportFormat; 4] = [Self::Csv, Self::Json, Self::Html, Self::Text];

    /// File name written inside the output directory.
    pub fn file_name(&self) -> &'static str {
        match self {
            Self::Csv => "simulation_results.csv",
            Self::Json => "portfolio_history.json",
            Self::Html => "summary.html",
            Self::Text => "summary.txt",
        }
    }
}

impl FromStr for ReportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "csv" => Ok(Self::Csv),
            "json" => Ok(Self::Json),
            "html" => Ok(Self::Html),
            "txt" | "text" => Ok(Self::Text),
            other => Err(format!("unknown output format '{other}'")),
        }
    }
}

impl fmt::Display for ReportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Csv => "csv",
            Self::Json => "json",
            Self::Html => "html",
            Self::Text => "txt",
        };
        write!(f, "{name}")
    }
}

/// Port for writing the results of a multi-cohort run.
pub trait ReportPort {
    fn write(
        &self,
        run: &CohortRun,
        config: &SimulationConfig,
        output_path: &Path,
    ) -> Result<(), DcaError>;
}
