use crate::config::ParserConfig;
use crate::utils::error::{ImportError, Result};
use crate::utils::validation::{validate_path, Validate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::LazyLock;

static ENV_VAR: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\$\{([^}]+)\}").unwrap());

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TomlConfig {
    #[serde(default)]
    pub parser: ParserConfig,
    pub report: Option<ReportConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportConfig {
    /// Where rejected rows are written as CSV.
    pub error_report_path: String,
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(ImportError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content);

        toml::from_str(&processed_content).map_err(|e| ImportError::ConfigError {
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${REPORT_DIR})
    fn substitute_env_vars(content: &str) -> String {
        ENV_VAR
            .replace_all(content, |caps: &regex::Captures| {
                let var_name = &caps[1];
                std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
            })
            .to_string()
    }

    pub fn error_report_path(&self) -> Option<&str> {
        self.report
            .as_ref()
            .map(|report| report.error_report_path.as_str())
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        self.parser.validate()?;
        if let Some(path) = self.error_report_path() {
            validate_path("report.error_report_path", path)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_full_toml_config() {
        let toml_content = r#"
[parser]
delimiter = ";"
min_date = "2014-01-01"
as_of = "2025-06-30"
max_description_length = 120

[report]
error_report_path = "./out/errors.csv"
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();

        assert_eq!(config.parser.delimiter, ';');
        assert_eq!(
            config.parser.min_date,
            NaiveDate::from_ymd_opt(2014, 1, 1).unwrap()
        );
        assert_eq!(config.parser.max_description_length, 120);
        assert_eq!(config.parser.max_fraction_digits, 2);
        assert_eq!(config.error_report_path(), Some("./out/errors.csv"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = TomlConfig::from_toml_str("").unwrap();
        assert_eq!(config.parser, ParserConfig::default());
        assert!(config.error_report_path().is_none());
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("TXN_IMPORT_TEST_REPORT_DIR", "/tmp/reports");

        let toml_content = r#"
[report]
error_report_path = "${TXN_IMPORT_TEST_REPORT_DIR}/errors.csv"
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();
        assert_eq!(config.error_report_path(), Some("/tmp/reports/errors.csv"));

        std::env::remove_var("TXN_IMPORT_TEST_REPORT_DIR");
    }

    #[test]
    fn test_invalid_toml_is_config_error() {
        let result = TomlConfig::from_toml_str("[parser\ndelimiter = ");
        assert!(matches!(result, Err(ImportError::ConfigError { .. })));
    }

    #[test]
    fn test_config_validation() {
        let config = TomlConfig::from_toml_str("[parser]\nmax_fraction_digits = 0\n").unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(b"[parser]\ndelimiter = \"|\"\n").unwrap();

        let config = TomlConfig::from_file(temp_file.path()).unwrap();
        assert_eq!(config.parser.delimiter, '|');
    }
}
