pub mod builder;
pub mod cleaner;
pub mod duplicates;
pub mod headers;
pub mod parser;
pub mod validator;

pub use crate::domain::model::{ErrorRow, LineError, ParsedFileResult, Transaction};
pub use crate::domain::ports::ErrorSink;
pub use crate::utils::error::Result;
