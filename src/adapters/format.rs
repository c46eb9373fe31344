//! Number formatting shared by the report writers.

/// `$1,234.56`, with a leading minus for negative amounts.
pub fn money(value: f64) -> String {
    let sign = if value < 0.0 { "-" } else { "" };
    let fixed = format!("{:.2}", value.abs());
    let (whole, cents) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, ch) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    format!("{sign}${grouped}.{cents}")
}

/// Rate as a percentage with two decimals: `0.1234` -> `12.34%`.
pub fn percent(rate: f64) -> String {
    format!("{:.2}%", rate * 100.0)
}

pub fn money_or_na(value: Option<f64>) -> String {
    value.map_or_else(|| "N/A".to_string(), money)
}

pub fn percent_or_na(rate: Option<f64>) -> String {
    rate.map_or_else(|| "N/A".to_string(), percent)
}
