//! HTML report adapter implementing ReportPort.
//!
//! Renders the cohort summary table, CAGR statistics and best/worst entry
//! years through an Askama template. Values are pre-formatted so the
//! template only lays them out.

use std::fs;
use std::path::Path;

use askama::Template;
use chrono::NaiveDate;

use crate::adapters::format::{money, money_or_na, percent, percent_or_na};
use crate::domain::aggregate::CohortRun;
use crate::domain::cohort::SimulationConfig;
use crate::domain::error::DcaError;
use crate::domain::metrics::CagrStats;
use crate::ports::report_port::ReportPort;

struct CohortRow {
    start_year: i32,
    months: usize,
    invested: String,
    final_nominal: String,
    final_real: String,
    nominal_cagr: String,
    real_cagr: String,
}

struct Line {
    label: String,
    value: String,
}

#[derive(Template)]
#[template(
    ext = "html",
    source = r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>DCA Cohort Report</title>
<style>
body { font-family: sans-serif; margin: 2em; color: #1f2937; }
table { border-collapse: collapse; margin-bottom: 1.5em; }
th, td { border: 1px solid #d1d5db; padding: 4px 10px; text-align: right; }
th { background: #f3f4f6; }
.na { color: #9ca3af; }
</style>
</head>
<body>
<h1>DCA Cohort Report</h1>
<p>Monthly contribution {{ contribution }}, valued at {{ end_date }}.</p>

<h2>Summary Table</h2>
<table>
<tr><th>Start Year</th><th>Total Months Invested</th><th>Total Amount Invested (Nominal)</th><th>Final Portfolio Value (Nominal)</th>{% if show_real %}<th>Final Portfolio Value (Real)</th>{% endif %}<th>Nominal CAGR</th>{% if show_real %}<th>Real CAGR</th>{% endif %}</tr>
{% for row in rows %}<tr><td>{{ row.start_year }}</td><td>{{ row.months }}</td><td>{{ row.invested }}</td><td>{{ row.final_nominal }}</td>{% if show_real %}<td>{{ row.final_real }}</td>{% endif %}<td>{{ row.nominal_cagr }}</td>{% if show_real %}<td>{{ row.real_cagr }}</td>{% endif %}</tr>
{% endfor %}</table>

<h2>Statistical Summary</h2>
<ul>
{% for line in statistics %}<li>{{ line.label }}: {{ line.value }}</li>
{% endfor %}</ul>

<h2>Performance Highlights</h2>
<ul>
{% for line in highlights %}<li>{{ line.label }}: {{ line.value }}</li>
{% endfor %}</ul>
</body>
</html>
"#
)]
struct ReportTemplate {
    contribution: String,
    end_date: NaiveDate,
    show_real: bool,
    rows: Vec<CohortRow>,
    statistics: Vec<Line>,
    highlights: Vec<Line>,
}

fn stats_lines(label: &str, stats: Option<&CagrStats>) -> Vec<Line> {
    match stats {
        Some(s) => vec![
            Line {
                label: format!("Mean {label} CAGR"),
                value: percent(s.mean),
            },
            Line {
                label: format!("Standard Deviation of {label} CAGRs"),
                value: percent(s.std_dev),
            },
        ],
        None => vec![Line {
            label: format!("{label} CAGR statistics"),
            value: "N/A".to_string(),
        }],
    }
}

fn highlight_lines(label: &str, stats: Option<&CagrStats>) -> Vec<Line> {
    match stats {
        Some(s) => vec![
            Line {
                label: format!("Best Performing Entry Year ({label} CAGR)"),
                value: format!("{} ({})", s.best.start_year, percent(s.best.cagr)),
            },
            Line {
                label: format!("Worst Performing Entry Year ({label} CAGR)"),
                value: format!("{} ({})", s.worst.start_year, percent(s.worst.cagr)),
            },
        ],
        None => vec![Line {
            label: format!("{label} CAGR highlights"),
            value: "N/A".to_string(),
        }],
    }
}

fn build_template(run: &CohortRun, config: &SimulationConfig) -> ReportTemplate {
    let show_real = config.adjust_for_inflation;

    let rows = run
        .results
        .iter()
        .map(|r| CohortRow {
            start_year: r.start_year,
            months: r.months_invested,
            invested: money(r.total_nominal_invested),
            final_nominal: money(r.final_nominal_value),
            final_real: money_or_na(r.final_real_value),
            nominal_cagr: percent(r.nominal_cagr),
            real_cagr: percent_or_na(r.real_cagr),
        })
        .collect();

    let mut statistics = stats_lines("Nominal", run.summary.nominal.as_ref());
    let mut highlights = highlight_lines("Nominal", run.summary.nominal.as_ref());
    if show_real {
        statistics.extend(stats_lines("Real", run.summary.real.as_ref()));
        highlights.extend(highlight_lines("Real", run.summary.real.as_ref()));
    }

    ReportTemplate {
        contribution: money(config.monthly_contribution),
        end_date: config.end_date,
        show_real,
        rows,
        statistics,
        highlights,
    }
}

pub struct HtmlReportAdapter;

impl HtmlReportAdapter {
    pub fn new() -> Self {
        Self
    }
}

impl Default for HtmlReportAdapter {
    fn default() -> Self {
        Self::new()
    }
}

impl ReportPort for HtmlReportAdapter {
    fn write(
        &self,
        run: &CohortRun,
        config: &SimulationConfig,
        output_path: &Path,
    ) -> Result<(), DcaError> {
        let html = build_template(run, config)
            .render()
            .map_err(|e| DcaError::Report {
                reason: format!("failed to render HTML report: {e}"),
            })?;

        if let Some(parent) = output_path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(output_path, html)?;

        Ok(())
    }
}
