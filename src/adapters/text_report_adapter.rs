//! Plain-text summary report implementing ReportPort.
//!
//! Three sections: the per-cohort summary table, CAGR statistics and the
//! best/worst entry years. The same text is printed by the CLI.

use std::fs;
use std::path::Path;

use crate::adapters::format::{money, money_or_na, percent, percent_or_na};
use crate::domain::aggregate::CohortRun;
use crate::domain::cohort::SimulationConfig;
use crate::domain::error::DcaError;
use crate::domain::metrics::CagrStats;
use crate::ports::report_port::ReportPort;

pub fn format_summary_table(run: &CohortRun, config: &SimulationConfig) -> String {
    let real = config.adjust_for_inflation;
    let mut out = String::from("--- Summary Table ---\n");

    out.push_str(&format!(
        "{:>10} {:>8} {:>18} {:>22}",
        "Start Year", "Months", "Invested (Nominal)", "Final Value (Nominal)"
    ));
    if real {
        out.push_str(&format!(" {:>20}", "Final Value (Real)"));
    }
    out.push_str(&format!(" {:>13}", "Nominal CAGR"));
    if real {
        out.push_str(&format!(" {:>10}", "Real CAGR"));
    }
    out.push('\n');

    for r in &run.results {
        out.push_str(&format!(
            "{:>10} {:>8} {:>18} {:>22}",
            r.start_year,
            r.months_invested,
            money(r.total_nominal_invested),
            money(r.final_nominal_value)
        ));
        if real {
            out.push_str(&format!(" {:>20}", money_or_na(r.final_real_value)));
        }
        out.push_str(&format!(" {:>13}", percent(r.nominal_cagr)));
        if real {
            out.push_str(&format!(" {:>10}", percent_or_na(r.real_cagr)));
        }
        out.push('\n');
    }

    out
}

fn format_stats_lines(label: &str, stats: &CagrStats) -> String {
    format!(
        "Mean {label} CAGR: {}\nStandard Deviation of {label} CAGRs: {}\n",
        percent(stats.mean),
        percent(stats.std_dev)
    )
}

pub fn format_statistical_summary(run: &CohortRun, config: &SimulationConfig) -> String {
    let mut out = String::from("--- Statistical Summary ---\n");

    match &run.summary.nominal {
        Some(stats) => out.push_str(&format_stats_lines("Nominal", stats)),
        None => out.push_str("No cohorts were simulated.\n"),
    }

    if config.adjust_for_inflation {
        match &run.summary.real {
            Some(stats) => out.push_str(&format_stats_lines("Real", stats)),
            None => out.push_str("Real CAGR statistics not available due to missing data.\n"),
        }
    }

    out
}

fn format_extremes(label: &str, stats: &CagrStats) -> String {
    format!(
        "Best Performing Entry Year ({label} CAGR): {} ({})\nWorst Performing Entry Year ({label} CAGR): {} ({})\n",
        stats.best.start_year,
        percent(stats.best.cagr),
        stats.worst.start_year,
        percent(stats.worst.cagr)
    )
}

pub fn format_highlights(run: &CohortRun, config: &SimulationConfig) -> String {
    let mut out = String::from("--- Performance Highlights ---\n");

    if let Some(stats) = &run.summary.nominal {
        out.push_str(&format_extremes("Nominal", stats));
    }

    if config.adjust_for_inflation {
        match &run.summary.real {
            Some(stats) => out.push_str(&format_extremes("Real", stats)),
            None => out.push_str(
                "Real CAGR performance highlights not available due to missing data.\n",
            ),
        }
    }

    out
}

pub fn render(run: &CohortRun, config: &SimulationConfig) -> String {
    format!(
        "{}\n{}\n{}",
        format_summary_table(run, config),
        format_statistical_summary(run, config),
        format_highlights(run, config)
    )
}

pub struct TextReportAdapter;

impl TextReportAdapter {
    pub fn new() -> Self {
        Self
    }
}

impl Default for TextReportAdapter {
    fn default() -> Self {
        Self::new()
    }
}

impl ReportPort for TextReportAdapter {
    fn write(
        &self,
        run: &CohortRun,
        config: &SimulationConfig,
        output_path: &Path,
    ) -> Result<(), DcaError> {
        if let Some(parent) = output_path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(output_path, render(run, config))?;
        Ok(())
    }
}
