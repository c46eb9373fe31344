//! Cross-cohort CAGR statistics.

use super::cohort::SimulationResult;

/// A start year paired with the CAGR it achieved.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CohortExtreme {
    pub start_year: i32,
    pub cagr: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CagrStats {
    pub count: usize,
    pub mean: f64,
    /// Sample standard deviation (n - 1 denominator).
    pub std_dev: f64,
    pub best: CohortExtreme,
    pub worst: CohortExtreme,
}

impl CagrStats {
    /// Statistics over `(start_year, cagr)` pairs in iteration order.
    ///
    /// Ties for best or worst go to the first start year seen.
    pub fn compute<I>(values: I) -> Option<Self>
    where
        I: IntoIterator<Item = (i32, f64)>,
    {
        let values: Vec<(i32, f64)> = values.into_iter().collect();
        let (&(first_year, first_cagr), rest) = values.split_first()?;

        let mut best = CohortExtreme {
            start_year: first_year,
            cagr: first_cagr,
        };
        let mut worst = best;

        for &(start_year, cagr) in rest {
            if cagr > best.cagr {
                best = CohortExtreme { start_year, cagr };
            }
            if cagr < worst.cagr {
                worst = CohortExtreme { start_year, cagr };
            }
        }

        let n = values.len() as f64;
        let mean = values.iter().map(|(_, c)| c).sum::<f64>() / n;
        let std_dev = if values.len() > 1 {
            let variance = values.iter().map(|(_, c)| (c - mean).powi(2)).sum::<f64>() / (n - 1.0);
            variance.sqrt()
        } else {
            0.0
        };

        Some(CagrStats {
            count: values.len(),
            mean,
            std_dev,
            best,
            worst,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CohortSummary {
    pub nominal: Option<CagrStats>,
    /// Only cohorts with a real CAGR contribute.
    pub real: Option<CagrStats>,
}

impl CohortSummary {
    pub fn compute(results: &[SimulationResult]) -> Self {
        let nominal = CagrStats::compute(results.iter().map(|r| (r.start_year, r.nominal_cagr)));
        let real = CagrStats::compute(
            results
                .iter()
                .filter_map(|r| r.real_cagr.map(|c| (r.start_year, c))),
        );
        CohortSummary { nominal, real }
    }
}
