//! Configuration validation.
//!
//! Validates all config fields before a simulation runs.

use crate::domain::error::DcaError;
use crate::domain::inflation::InflationPolicy;
use crate::domain::start_years::parse_start_years;
use crate::ports::config_port::ConfigPort;
use crate::ports::report_port::ReportFormat;
use chrono::NaiveDate;

pub const DEFAULT_MONTHLY_CONTRIBUTION: f64 = 500.0;

pub fn validate_simulation_config(config: &dyn ConfigPort) -> Result<(), DcaError> {
    validate_start_years(config)?;
    validate_end_date(config)?;
    validate_contribution(config)?;
    validate_inflation_policy(config)?;
    Ok(())
}

/// Data sources are checked separately since the CLI may override them.
pub fn validate_data_config(config: &dyn ConfigPort) -> Result<(), DcaError> {
    require_non_empty(config, "data", "prices")?;
    if config.get_bool("simulation", "adjust_for_inflation", true) {
        require_non_empty(config, "data", "price_index")?;
    }
    Ok(())
}

pub fn validate_output_config(config: &dyn ConfigPort) -> Result<(), DcaError> {
    if let Some(formats) = config.get_string("output", "formats") {
        parse_formats(&formats)?;
    }
    Ok(())
}

fn validate_start_years(config: &dyn ConfigPort) -> Result<(), DcaError> {
    let value = require_non_empty(config, "simulation", "start_years")?;
    parse_start_years(&value)?;
    Ok(())
}

fn validate_end_date(config: &dyn ConfigPort) -> Result<(), DcaError> {
    let value = config.get_string("simulation", "end_date");
    parse_date(value.as_deref(), "simulation", "end_date")?;
    Ok(())
}

fn validate_contribution(config: &dyn ConfigPort) -> Result<(), DcaError> {
    let value = config.get_double(
        "simulation",
        "monthly_contribution",
        DEFAULT_MONTHLY_CONTRIBUTION,
    );
    if !value.is_finite() || value <= 0.0 {
        return Err(DcaError::ConfigInvalid {
            section: "simulation".to_string(),
            key: "monthly_contribution".to_string(),
            reason: "monthly_contribution must be positive".to_string(),
        });
    }
    Ok(())
}

fn validate_inflation_policy(config: &dyn ConfigPort) -> Result<(), DcaError> {
    parse_inflation_policy(config)?;
    Ok(())
}

pub fn parse_inflation_policy(config: &dyn ConfigPort) -> Result<InflationPolicy, DcaError> {
    match config.get_string("simulation", "inflation_policy") {
        None => Ok(InflationPolicy::default()),
        Some(s) => s
            .parse::<InflationPolicy>()
            .map_err(|reason| DcaError::ConfigInvalid {
                section: "simulation".to_string(),
                key: "inflation_policy".to_string(),
                reason,
            }),
    }
}

pub fn parse_formats(value: &str) -> Result<Vec<ReportFormat>, DcaError> {
    let mut formats = Vec::new();
    for token in value.split(',').map(str::trim).filter(|t| !t.is_empty()) {
        let format = token
            .parse::<ReportFormat>()
            .map_err(|reason| DcaError::ConfigInvalid {
                section: "output".to_string(),
                key: "formats".to_string(),
                reason,
            })?;
        if !formats.contains(&format) {
            formats.push(format);
        }
    }
    if formats.is_empty() {
        return Err(DcaError::ConfigInvalid {
            section: "output".to_string(),
            key: "formats".to_string(),
            reason: "at least one output format is required".to_string(),
        });
    }
    Ok(formats)
}

pub fn parse_date(value: Option<&str>, section: &str, field: &str) -> Result<NaiveDate, DcaError> {
    match value {
        None => Err(DcaError::ConfigMissing {
            section: section.to_string(),
            key: field.to_string(),
        }),
        Some(s) => NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").map_err(|_| {
            DcaError::ConfigInvalid {
                section: section.to_string(),
                key: field.to_string(),
                reason: format!("invalid {} format, expected YYYY-MM-DD", field),
            }
        }),
    }
}

fn require_non_empty(config: &dyn ConfigPort, section: &str, key: &str) -> Result<String, DcaError> {
    match config.get_string(section, key) {
        Some(s) if !s.trim().is_empty() => Ok(s),
        _ => Err(DcaError::ConfigMissing {
            section: section.to_string(),
            key: key.to_string(),
        }),
    }
}
