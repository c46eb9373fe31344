//! Start-year list parsing.
//!
//! Accepts comma-separated tokens, each either a single year (`2005`) or an
//! inclusive range (`1998-2025`). Order is preserved as written.

use std::collections::HashSet;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum StartYearsError {
    #[error("empty token in start year list")]
    EmptyToken,

    #[error("invalid start year: {0}")]
    InvalidYear(String),

    #[error("descending start year range: {0}")]
    DescendingRange(String),

    #[error("duplicate start year: {0}")]
    DuplicateYear(i32),
}

fn parse_year(token: &str) -> Result<i32, StartYearsError> {
    token
        .trim()
        .parse::<i32>()
        .ok()
        .filter(|y| (1..=9999).contains(y))
        .ok_or_else(|| StartYearsError::InvalidYear(token.trim().to_string()))
}

pub fn parse_start_years(input: &str) -> Result<Vec<i32>, StartYearsError> {
    let mut years = Vec::new();
    let mut seen = HashSet::new();

    for token in input.split(',') {
        let trimmed = token.trim();
        if trimmed.is_empty() {
            return Err(StartYearsError::EmptyToken);
        }

        let span = match trimmed.split_once('-') {
            Some((from, to)) => {
                let (from, to) = (parse_year(from)?, parse_year(to)?);
                if from > to {
                    return Err(StartYearsError::DescendingRange(trimmed.to_string()));
                }
                from..=to
            }
            None => {
                let year = parse_year(trimmed)?;
                year..=year
            }
        };

        for year in span {
            if !seen.insert(year) {
                return Err(StartYearsError::DuplicateYear(year));
            }
            years.push(year);
        }
    }

    Ok(years)
}
