pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;
pub use config::{ParserConfig, TomlConfig};

pub use adapters::{CsvErrorSink, InMemoryErrorSink, NoopErrorSink};
pub use crate::core::parser::TransactionCsvParser;
pub use domain::model::{
    ErrorRow, ImportSummary, LineError, ParsedFileResult, ParsingError, RawRow, Rejection,
    Transaction,
};
pub use domain::ports::ErrorSink;
pub use utils::error::{ImportError, Result, SinkError};
