//! CLI definition and dispatch.

use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use crate::adapters::csv_adapter::CsvAdapter;
use crate::adapters::csv_report_adapter::CsvReportAdapter;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::adapters::html_report_adapter::HtmlReportAdapter;
use crate::adapters::json_history_adapter::JsonHistoryAdapter;
use crate::adapters::text_report_adapter::{self, TextReportAdapter};
use crate::domain::aggregate::{run_cohorts, CohortRun};
use crate::domain::cohort::SimulationConfig;
use crate::domain::config_validation::{
    parse_date, parse_formats, parse_inflation_policy, validate_data_config,
    validate_output_config, validate_simulation_config, DEFAULT_MONTHLY_CONTRIBUTION,
};
use crate::domain::error::DcaError;
use crate::domain::start_years::parse_start_years;
use crate::domain::time_series::TimeSeries;
use crate::ports::config_port::ConfigPort;
use crate::ports::report_port::{ReportFormat, ReportPort};
use crate::ports::series_port::SeriesPort;

#[derive(Parser, Debug)]
#[command(name = "dcacohort", about = "Dollar-cost-averaging cohort simulator")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Simulate every configured cohort and write reports
    Simulate {
        #[arg(short, long)]
        config: PathBuf,
        /// Price CSV, overriding [data] prices
        #[arg(long)]
        prices: Option<PathBuf>,
        /// Price index CSV, overriding [data] price_index
        #[arg(long)]
        index: Option<PathBuf>,
        #[arg(short, long)]
        output_dir: Option<PathBuf>,
        #[arg(long)]
        no_inflation: bool,
        #[arg(long)]
        parallel: bool,
        #[arg(long)]
        dry_run: bool,
    },
    /// Validate a configuration file
    Validate {
        #[arg(short, long)]
        config: PathBuf,
    },
    /// Show date range of the input series
    Info {
        #[arg(long)]
        prices: PathBuf,
        #[arg(long)]
        index: Option<PathBuf>,
    },
}

/// Command-line values that take precedence over the config file.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub prices: Option<PathBuf>,
    pub index: Option<PathBuf>,
    pub output_dir: Option<PathBuf>,
    pub no_inflation: bool,
    pub parallel: bool,
}

/// Where the input series come from, after overrides are applied.
#[derive(Debug, Clone, PartialEq)]
pub struct DataSources {
    pub prices: PathBuf,
    pub price_column: Option<String>,
    pub index: Option<PathBuf>,
    pub index_column: Option<String>,
    pub resample_index_monthly: bool,
}

pub fn run(cli: Cli) -> ExitCode {
    match cli.command {
        Command::Simulate {
            config,
            prices,
            index,
            output_dir,
            no_inflation,
            parallel,
            dry_run,
        } => {
            let overrides = Overrides {
                prices,
                index,
                output_dir,
                no_inflation,
                parallel,
            };
            if dry_run {
                run_dry_run(&config, &overrides)
            } else {
                run_simulate(&config, &overrides)
            }
        }
        Command::Validate { config } => run_validate(&config),
        Command::Info { prices, index } => run_info(&prices, index.as_ref()),
    }
}

pub fn load_config(path: &Path) -> Result<FileConfigAdapter, ExitCode> {
    FileConfigAdapter::from_file(path).map_err(|err| {
        eprintln!("error: {err}");
        ExitCode::from(&err)
    })
}

/// Convert a config into the immutable run parameters.
pub fn build_simulation_config(adapter: &dyn ConfigPort) -> Result<SimulationConfig, DcaError> {
    validate_simulation_config(adapter)?;

    let years = adapter
        .get_string("simulation", "start_years")
        .ok_or_else(|| DcaError::ConfigMissing {
            section: "simulation".into(),
            key: "start_years".into(),
        })?;
    let end_date = parse_date(
        adapter.get_string("simulation", "end_date").as_deref(),
        "simulation",
        "end_date",
    )?;

    Ok(SimulationConfig {
        start_years: parse_start_years(&years)?,
        end_date,
        monthly_contribution: adapter.get_double(
            "simulation",
            "monthly_contribution",
            DEFAULT_MONTHLY_CONTRIBUTION,
        ),
        adjust_for_inflation: adapter.get_bool("simulation", "adjust_for_inflation", true),
        inflation_policy: parse_inflation_policy(adapter)?,
        parallel: adapter.get_bool("simulation", "parallel", false),
    })
}

pub fn apply_overrides(mut config: SimulationConfig, overrides: &Overrides) -> SimulationConfig {
    if overrides.no_inflation {
        config.adjust_for_inflation = false;
    }
    if overrides.parallel {
        config.parallel = true;
    }
    config
}

pub fn resolve_data_sources(
    adapter: &dyn ConfigPort,
    overrides: &Overrides,
    adjust_for_inflation: bool,
) -> Result<DataSources, DcaError> {
    let config_path = |key: &str| {
        adapter
            .get_string("data", key)
            .filter(|s| !s.trim().is_empty())
            .map(PathBuf::from)
    };

    let prices = overrides
        .prices
        .clone()
        .or_else(|| config_path("prices"))
        .ok_or_else(|| DcaError::ConfigMissing {
            section: "data".into(),
            key: "prices".into(),
        })?;

    let index = if adjust_for_inflation {
        let index = overrides
            .index
            .clone()
            .or_else(|| config_path("price_index"))
            .ok_or_else(|| DcaError::ConfigMissing {
                section: "data".into(),
                key: "price_index".into(),
            })?;
        Some(index)
    } else {
        None
    };

    Ok(DataSources {
        prices,
        price_column: adapter.get_string("data", "price_column"),
        index,
        index_column: adapter.get_string("data", "index_column"),
        resample_index_monthly: adapter.get_bool("data", "resample_index_monthly", true),
    })
}

pub fn resolve_formats(adapter: &dyn ConfigPort) -> Result<Vec<ReportFormat>, DcaError> {
    match adapter.get_string("output", "formats") {
        Some(value) => parse_formats(&value),
        None => Ok(ReportFormat::ALL.to_vec()),
    }
}

pub fn resolve_output_dir(adapter: &dyn ConfigPort, overrides: &Overrides) -> PathBuf {
    overrides
        .output_dir
        .clone()
        .unwrap_or_else(|| PathBuf::from(adapter.get_string_or("output", "directory", "output")))
}

/// Fetch a series, optionally collapsing it to one value per month.
pub fn load_series(source: &dyn SeriesPort, resample_monthly: bool) -> Result<TimeSeries, DcaError> {
    let series = source.fetch_series()?;
    if resample_monthly {
        let resampled = series.resample_month_end();
        log::debug!(
            "{}: resampled {} observations to {} month ends",
            series.name(),
            series.len(),
            resampled.len()
        );
        Ok(resampled)
    } else {
        Ok(series)
    }
}

fn report_writer(format: ReportFormat) -> Box<dyn ReportPort> {
    match format {
        ReportFormat::Csv => Box::new(CsvReportAdapter::new()),
        ReportFormat::Json => Box::new(JsonHistoryAdapter::new()),
        ReportFormat::Html => Box::new(HtmlReportAdapter::new()),
        ReportFormat::Text => Box::new(TextReportAdapter::new()),
    }
}

/// Write every requested report into `output_dir`, returning the paths.
pub fn write_reports(
    run: &CohortRun,
    config: &SimulationConfig,
    formats: &[ReportFormat],
    output_dir: &Path,
) -> Result<Vec<PathBuf>, DcaError> {
    let mut written = Vec::with_capacity(formats.len());
    for &format in formats {
        let path = output_dir.join(format.file_name());
        report_writer(format).write(run, config, &path)?;
        written.push(path);
    }
    Ok(written)
}

fn run_simulate(config_path: &Path, overrides: &Overrides) -> ExitCode {
    // Stage 1: Load config
    eprintln!("Loading config from {}", config_path.display());
    let adapter = match load_config(config_path) {
        Ok(a) => a,
        Err(code) => return code,
    };

    // Stage 2: Validate and build the run parameters
    let sim_config = match build_simulation_config(&adapter) {
        Ok(c) => apply_overrides(c, overrides),
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };
    let sources = match resolve_data_sources(&adapter, overrides, sim_config.adjust_for_inflation) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };
    let formats = match resolve_formats(&adapter) {
        Ok(f) => f,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };
    let output_dir = resolve_output_dir(&adapter, overrides);

    // Stage 3: Build series sources and run
    let prices = CsvAdapter::new(sources.prices.clone(), "prices")
        .with_column(sources.price_column.clone());
    let index = sources.index.as_ref().map(|path| {
        CsvAdapter::new(path.clone(), "price_index").with_column(sources.index_column.clone())
    });

    run_simulation_pipeline(
        &prices,
        index.as_ref().map(|i| i as &dyn SeriesPort),
        sources.resample_index_monthly,
        &sim_config,
        &formats,
        &output_dir,
    )
}

/// Load series, simulate every cohort, print the summary and write reports.
pub fn run_simulation_pipeline(
    prices: &dyn SeriesPort,
    index: Option<&dyn SeriesPort>,
    resample_index_monthly: bool,
    config: &SimulationConfig,
    formats: &[ReportFormat],
    output_dir: &Path,
) -> ExitCode {
    let price_series = match load_series(prices, false) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };
    eprintln!("Loaded {} price observations", price_series.len());

    let index_series = if config.adjust_for_inflation {
        match index.map(|source| load_series(source, resample_index_monthly)) {
            Some(Ok(s)) => {
                eprintln!("Loaded {} price index observations", s.len());
                Some(s)
            }
            Some(Err(e)) => {
                eprintln!("error: {e}");
                return (&e).into();
            }
            None => {
                let err = DcaError::MissingIndexSeries;
                eprintln!("error: {err}");
                return (&err).into();
            }
        }
    } else {
        None
    };

    eprintln!(
        "Simulating {} cohorts through {}...",
        config.start_years.len(),
        config.end_date
    );
    let run = match run_cohorts(&price_series, index_series.as_ref(), config) {
        Ok(r) => r,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    println!("{}", text_report_adapter::render(&run, config));

    match write_reports(&run, config, formats, output_dir) {
        Ok(paths) => {
            for path in paths {
                eprintln!("Report written to: {}", path.display());
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error: failed to write report: {e}");
            (&e).into()
        }
    }
}

pub fn run_dry_run(config_path: &Path, overrides: &Overrides) -> ExitCode {
    eprintln!("Loading config from {}", config_path.display());
    let adapter = match load_config(config_path) {
        Ok(a) => a,
        Err(code) => return code,
    };

    let sim_config = match build_simulation_config(&adapter) {
        Ok(c) => apply_overrides(c, overrides),
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };
    let sources = match resolve_data_sources(&adapter, overrides, sim_config.adjust_for_inflation) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };
    let formats = match resolve_formats(&adapter) {
        Ok(f) => f,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };
    eprintln!("Config validated successfully");

    let years: Vec<String> = sim_config.start_years.iter().map(i32::to_string).collect();
    eprintln!("\nSimulation:");
    eprintln!("  start years:  {}", years.join(", "));
    eprintln!("  end date:     {}", sim_config.end_date);
    eprintln!("  contribution: {:.2}", sim_config.monthly_contribution);
    eprintln!(
        "  inflation:    {}",
        if sim_config.adjust_for_inflation {
            format!("on ({})", sim_config.inflation_policy)
        } else {
            "off".to_string()
        }
    );
    eprintln!("  parallel:     {}", sim_config.parallel);

    eprintln!("\nData:");
    eprintln!("  prices: {}", sources.prices.display());
    if let Some(index) = &sources.index {
        eprintln!("  index:  {}", index.display());
    }

    let format_names: Vec<String> = formats.iter().map(ReportFormat::to_string).collect();
    eprintln!("\nOutput:");
    eprintln!("  directory: {}", resolve_output_dir(&adapter, overrides).display());
    eprintln!("  formats:   {}", format_names.join(", "));

    eprintln!("\nDry run complete: configuration is valid");
    ExitCode::SUCCESS
}

fn run_validate(config_path: &Path) -> ExitCode {
    eprintln!("Validating config: {}", config_path.display());
    let adapter = match load_config(config_path) {
        Ok(a) => a,
        Err(code) => return code,
    };

    let checks = [
        validate_simulation_config(&adapter),
        validate_data_config(&adapter),
        validate_output_config(&adapter),
    ];
    for check in checks {
        if let Err(e) = check {
            eprintln!("error: {e}");
            return (&e).into();
        }
    }

    eprintln!("Configuration is valid");
    ExitCode::SUCCESS
}

fn run_info(prices: &Path, index: Option<&PathBuf>) -> ExitCode {
    let mut sources = vec![(prices.to_path_buf(), "prices")];
    if let Some(path) = index {
        sources.push((path.clone(), "price_index"));
    }

    for (path, name) in sources {
        let adapter = CsvAdapter::new(path.clone(), name);
        match adapter.get_data_range() {
            Ok(Some((first, last, count))) => {
                println!("{}: {} observations, {} to {}", path.display(), count, first, last);
            }
            Ok(None) => {
                eprintln!("{}: no data found", path.display());
            }
            Err(e) => {
                eprintln!("error: {e}");
                return (&e).into();
            }
        }
    }
    ExitCode::SUCCESS
}
