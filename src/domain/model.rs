use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

pub const DATE: &str = "date";
pub const AMOUNT: &str = "amount";
pub const DESCRIPTION: &str = "description";
pub const CURRENCY: &str = "currency";

/// Column names every input file must carry, in reporting order.
pub const EXPECTED_HEADERS: [&str; 4] = [DATE, AMOUNT, DESCRIPTION, CURRENCY];

/// One input line as read, before any cleaning. `None` means the column was
/// missing from the record (ragged row), not that the cell was empty.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawRow {
    pub date: Option<String>,
    pub amount: Option<String>,
    pub description: Option<String>,
    pub currency: Option<String>,
}

impl RawRow {
    pub fn new(date: &str, amount: &str, description: &str, currency: &str) -> Self {
        Self {
            date: Some(date.to_string()),
            amount: Some(amount.to_string()),
            description: Some(description.to_string()),
            currency: Some(currency.to_string()),
        }
    }

    fn fields(&self) -> [(&'static str, Option<&str>); 4] {
        [
            (DATE, self.date.as_deref()),
            (AMOUNT, self.amount.as_deref()),
            (DESCRIPTION, self.description.as_deref()),
            (CURRENCY, self.currency.as_deref()),
        ]
    }

    pub fn missing_fields(&self) -> Vec<&'static str> {
        self.fields()
            .into_iter()
            .filter(|(_, value)| value.is_none())
            .map(|(name, _)| name)
            .collect()
    }

    /// Blank rows are skipped without consuming a line number. A single
    /// surviving column is treated as blank too, which covers the stray
    /// trailing-delimiter line many spreadsheet exports produce. Cells holding
    /// only whitespace count as empty, matching what the cleaner trims.
    pub fn is_blank(&self) -> bool {
        let fields = self.fields();
        let absent = fields.iter().filter(|(_, value)| value.is_none()).count();

        absent == fields.len()
            || absent == fields.len() - 1
            || fields
                .iter()
                .all(|(_, value)| matches!(value, Some(text) if text.trim().is_empty()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CleanedRow {
    pub date: Option<NaiveDate>,
    pub date_string: String,
    pub amount: Option<Decimal>,
    pub amount_string: String,
    pub description: String,
    pub currency: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    pub date: NaiveDate,
    pub date_string: String,
    pub amount: Decimal,
    pub description: String,
    pub currency: String,
    pub is_deleted: bool,
}

impl Transaction {
    /// Rows sharing this key within one file are duplicates of each other.
    pub fn duplication_key(&self) -> String {
        format!("{} {}", self.date_string, self.description)
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum LineError {
    #[error("{message}")]
    InvalidLine { message: String },

    #[error("{}", .messages.join(", "))]
    MultipleErrors { messages: Vec<String> },

    #[error("Repeated elements found on lines {}: {duplication_key}", join_lines(.lines))]
    RepeatedElementsFound {
        duplication_key: String,
        lines: Vec<usize>,
    },

    #[error("{message}")]
    UnknownError { message: String },
}

impl LineError {
    pub fn error_type(&self) -> &'static str {
        match self {
            LineError::InvalidLine { .. } => "InvalidLine",
            LineError::MultipleErrors { .. } => "MultipleErrors",
            LineError::RepeatedElementsFound { .. } => "RepeatedElementsFound",
            LineError::UnknownError { .. } => "UnknownError",
        }
    }
}

fn join_lines(lines: &[usize]) -> String {
    lines
        .iter()
        .map(|line| line.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

/// A field-level error attached to the line it was found on.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[error("line {line}: {error}")]
pub struct ParsingError {
    pub line: usize,
    pub error: LineError,
}

impl ParsingError {
    pub fn invalid_line(line: usize, message: impl Into<String>) -> Self {
        Self {
            line,
            error: LineError::InvalidLine {
                message: message.into(),
            },
        }
    }

    pub fn message(&self) -> String {
        self.error.to_string()
    }
}

/// The one error that made a line leave the accepted set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "channel", content = "error")]
pub enum Rejection {
    Parsing(LineError),
    Duplicate(LineError),
}

impl Rejection {
    pub fn error(&self) -> &LineError {
        match self {
            Rejection::Parsing(error) | Rejection::Duplicate(error) => error,
        }
    }
}

/// What an error sink receives for every rejected line. Field values are the
/// original text from the file, missing columns become empty strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorRow {
    pub line: usize,
    pub rejection: Rejection,
    pub date: String,
    pub amount: String,
    pub description: String,
    pub currency: String,
}

impl ErrorRow {
    pub fn new(line: usize, rejection: Rejection, raw: &RawRow) -> Self {
        let text = |value: &Option<String>| value.clone().unwrap_or_default();
        Self {
            line,
            rejection,
            date: text(&raw.date),
            amount: text(&raw.amount),
            description: text(&raw.description),
            currency: text(&raw.currency),
        }
    }

    pub fn error_type(&self) -> &'static str {
        self.rejection.error().error_type()
    }

    pub fn message(&self) -> String {
        self.rejection.error().to_string()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ParsedFileResult {
    pub rows: BTreeMap<usize, Transaction>,
    pub parsing_errors: Vec<ParsingError>,
    pub validation_errors: BTreeMap<usize, LineError>,
}

impl ParsedFileResult {
    pub fn summary(&self) -> ImportSummary {
        let accepted = self.rows.len();
        let rejected = self.parsing_errors.len();
        let duplicates = self.validation_errors.len();
        ImportSummary {
            total_lines: accepted + rejected + duplicates,
            accepted,
            rejected,
            duplicates,
        }
    }

    pub fn has_errors(&self) -> bool {
        !self.parsing_errors.is_empty() || !self.validation_errors.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ImportSummary {
    pub total_lines: usize,
    pub accepted: usize,
    pub rejected: usize,
    pub duplicates: usize,
}
