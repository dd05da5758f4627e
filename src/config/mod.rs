#[cfg(feature = "cli")]
pub mod cli;
pub mod toml_config;

#[cfg(feature = "cli")]
pub use cli::CliConfig;
pub use toml_config::TomlConfig;

use crate::utils::error::{ImportError, Result};
use crate::utils::validation::{validate_positive_number, Validate};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Knobs of the row pipeline. Every field has a default, so an empty
/// `[parser]` table is a valid configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParserConfig {
    pub delimiter: char,
    /// Earliest accepted transaction date.
    pub min_date: NaiveDate,
    /// Day that counts as "today" for the future-date check. The local
    /// calendar day at parse time when unset.
    pub as_of: Option<NaiveDate>,
    pub max_integer_digits: usize,
    pub max_fraction_digits: usize,
    pub max_description_length: usize,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            delimiter: ',',
            min_date: NaiveDate::from_ymd_opt(2000, 1, 1).unwrap_or(NaiveDate::MIN),
            as_of: None,
            max_integer_digits: 10,
            max_fraction_digits: 2,
            max_description_length: 253,
        }
    }
}

impl ParserConfig {
    pub fn with_delimiter(mut self, delimiter: char) -> Self {
        self.delimiter = delimiter;
        self
    }

    pub fn with_as_of(mut self, as_of: NaiveDate) -> Self {
        self.as_of = Some(as_of);
        self
    }

    /// The delimiter as the single byte the csv reader expects.
    pub fn delimiter_byte(&self) -> Result<u8> {
        if !self.delimiter.is_ascii() || matches!(self.delimiter, '"' | '\r' | '\n') {
            return Err(ImportError::InvalidConfigValueError {
                field: "parser.delimiter".to_string(),
                value: self.delimiter.escape_default().to_string(),
                reason: "Delimiter must be a single ASCII character other than a quote or newline"
                    .to_string(),
            });
        }
        Ok(self.delimiter as u8)
    }

    pub fn reference_date(&self) -> NaiveDate {
        self.as_of
            .unwrap_or_else(|| chrono::Local::now().date_naive())
    }
}

impl Validate for ParserConfig {
    fn validate(&self) -> Result<()> {
        self.delimiter_byte()?;
        validate_positive_number("parser.max_integer_digits", self.max_integer_digits, 1)?;
        validate_positive_number("parser.max_fraction_digits", self.max_fraction_digits, 1)?;
        validate_positive_number(
            "parser.max_description_length",
            self.max_description_length,
            1,
        )?;

        if let Some(as_of) = self.as_of {
            if as_of < self.min_date {
                return Err(ImportError::InvalidConfigValueError {
                    field: "parser.as_of".to_string(),
                    value: as_of.to_string(),
                    reason: format!("Must not be before parser.min_date ({})", self.min_date),
                });
            }
        }

        Ok(())
    }
}
