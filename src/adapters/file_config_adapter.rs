//! INI file configuration adapter.

use crate::domain::error::DcaError;
use crate::ports::config_port::ConfigPort;
use configparser::ini::Ini;
use std::path::Path;

pub struct FileConfigAdapter {
    config: Ini,
}

impl FileConfigAdapter {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, DcaError> {
        let path = path.as_ref();
        let mut config = Ini::new();
        config.load(path).map_err(|reason| DcaError::ConfigParse {
            file: path.display().to_string(),
            reason,
        })?;
        Ok(Self { config })
    }

    pub fn from_string(content: &str) -> Result<Self, DcaError> {
        let mut config = Ini::new();
        config
            .read(content.to_string())
            .map_err(|reason| DcaError::ConfigParse {
                file: "<string>".to_string(),
                reason,
            })?;
        Ok(Self { config })
    }

    /// Drops a trailing `; comment` or `# comment` preceded by whitespace.
    fn strip_inline_comment(value: &str) -> &str {
        let cut = [" ;", "\t;", " #", "\t#"]
            .iter()
            .filter_map(|marker| value.find(marker))
            .min()
            .unwrap_or(value.len());
        value[..cut].trim()
    }

    fn parse_bool(value: &str) -> Option<bool> {
        match value.to_lowercase().as_str() {
            "true" | "yes" | "on" | "1" => Some(true),
            "false" | "no" | "off" | "0" => Some(false),
            _ => None,
        }
    }
}

impl ConfigPort for FileConfigAdapter {
    fn get_string(&self, section: &str, key: &str) -> Option<String> {
        self.config
            .get(section, key)
            .map(|v| Self::strip_inline_comment(&v).to_string())
    }

    fn get_int(&self, section: &str, key: &str, default: i64) -> i64 {
        self.get_string(section, key)
            .and_then(|v| v.parse().ok())
            .unwrap_or(default)
    }

    fn get_double(&self, section: &str, key: &str, default: f64) -> f64 {
        self.get_string(section, key)
            .and_then(|v| v.parse().ok())
            .unwrap_or(default)
    }

    fn get_bool(&self, section: &str, key: &str, default: bool) -> bool {
        self.get_string(section, key)
            .as_deref()
            .and_then(Self::parse_bool)
            .unwrap_or(default)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn create_temp_config(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{}", content).unwrap();
        file
    }

    #[test]
    fn from_string_parses_config() {
        let content = r#"
[simulation]
start_years = 1998-2025
end_date = 2025-05-31

[data]
prices = data/sp500_data.csv
"#;
        let adapter = FileConfigAdapter::from_string(content).unwrap();
        assert_eq!(
            adapter.get_string("simulation", "start_years"),
            Some("1998-2025".to_string())
        );
        assert_eq!(
            adapter.get_string("data", "prices"),
            Some("data/sp500_data.csv".to_string())
        );
    }

    #[test]
    fn get_string_returns_none_for_missing_key() {
        let adapter =
            FileConfigAdapter::from_string("[simulation]\nend_date = 2025-05-31\n").unwrap();
        assert_eq!(adapter.get_string("simulation", "missing"), None);
        assert_eq!(adapter.get_string("missing_section", "key"), None);
    }

    #[test]
    fn get_string_strips_inline_comments() {
        let adapter = FileConfigAdapter::from_string(
            "[simulation]\nmonthly_contribution = 250   ; dollars\ninflation_policy = fail_closed # strict\n",
        )
        .unwrap();
        assert_eq!(
            adapter.get_string("simulation", "monthly_contribution"),
            Some("250".to_string())
        );
        assert_eq!(adapter.get_double("simulation", "monthly_contribution", 0.0), 250.0);
        assert_eq!(
            adapter.get_string("simulation", "inflation_policy"),
            Some("fail_closed".to_string())
        );
    }

    #[test]
    fn get_string_or_uses_default_for_blank() {
        let adapter = FileConfigAdapter::from_string("[output]\ndirectory =\n").unwrap();
        assert_eq!(adapter.get_string_or("output", "directory", "output"), "output");
        assert_eq!(adapter.get_string_or("output", "missing", "x"), "x");
    }

    #[test]
    fn get_int_returns_value_or_default() {
        let adapter =
            FileConfigAdapter::from_string("[simulation]\nworkers = 4\nbad = abc\n").unwrap();
        assert_eq!(adapter.get_int("simulation", "workers", 0), 4);
        assert_eq!(adapter.get_int("simulation", "bad", 42), 42);
        assert_eq!(adapter.get_int("simulation", "missing", 7), 7);
    }

    #[test]
    fn get_double_returns_value_or_default() {
        let adapter = FileConfigAdapter::from_string(
            "[simulation]\nmonthly_contribution = 500.5\nbad = not_a_number\n",
        )
        .unwrap();
        assert_eq!(
            adapter.get_double("simulation", "monthly_contribution", 0.0),
            500.5
        );
        assert_eq!(adapter.get_double("simulation", "bad", 99.9), 99.9);
        assert_eq!(adapter.get_double("simulation", "missing", 1.5), 1.5);
    }

    #[test]
    fn get_bool_recognises_true_and_false_spellings() {
        let adapter = FileConfigAdapter::from_string(
            "[simulation]\na = true\nb = yes\nc = on\nd = false\ne = no\nf = 0\n",
        )
        .unwrap();
        assert!(adapter.get_bool("simulation", "a", false));
        assert!(adapter.get_bool("simulation", "b", false));
        assert!(adapter.get_bool("simulation", "c", false));
        assert!(!adapter.get_bool("simulation", "d", true));
        assert!(!adapter.get_bool("simulation", "e", true));
        assert!(!adapter.get_bool("simulation", "f", true));
    }

    #[test]
    fn get_bool_returns_default_for_missing_or_garbage() {
        let adapter = FileConfigAdapter::from_string("[simulation]\nx = maybe\n").unwrap();
        assert!(adapter.get_bool("simulation", "missing", true));
        assert!(!adapter.get_bool("simulation", "missing", false));
        assert!(adapter.get_bool("simulation", "x", true));
    }

    #[test]
    fn from_file_reads_config() {
        let file = create_temp_config("[output]\ndirectory = /tmp/dca\n");
        let adapter = FileConfigAdapter::from_file(file.path()).unwrap();
        assert_eq!(
            adapter.get_string("output", "directory"),
            Some("/tmp/dca".to_string())
        );
    }

    #[test]
    fn from_file_returns_config_parse_error_for_missing_file() {
        let result = FileConfigAdapter::from_file("/nonexistent/path/config.ini");
        assert!(matches!(result, Err(DcaError::ConfigParse { .. })));
    }
}
