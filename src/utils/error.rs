use thiserror::Error;

#[derive(Error, Debug)]
pub enum ImportError {
    #[error("File not found: {path}")]
    FileNotFound { path: String },

    #[error("Invalid format: {message}")]
    InvalidFormat { message: String },

    #[error("Unknown error: {message}")]
    UnknownError { message: String },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid value for {field}: {value} ({reason})")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    Medium,
    High,
    Critical,
}

impl ImportError {
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            ImportError::FileNotFound { .. } | ImportError::InvalidFormat { .. } => {
                ErrorSeverity::High
            }
            ImportError::ConfigError { .. } | ImportError::InvalidConfigValueError { .. } => {
                ErrorSeverity::Medium
            }
            ImportError::SerializationError(_) => ErrorSeverity::High,
            ImportError::IoError(_) | ImportError::UnknownError { .. } => ErrorSeverity::Critical,
        }
    }

    pub fn exit_code(&self) -> i32 {
        match self.severity() {
            ErrorSeverity::Medium => 2,
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 3,
        }
    }

    /// Short message meant for a terminal user rather than a log line.
    pub fn user_friendly_message(&self) -> String {
        match self {
            ImportError::FileNotFound { path } => format!("Cannot find input file '{}'", path),
            ImportError::InvalidFormat { message } => {
                format!("The file is not a valid transaction CSV: {}", message)
            }
            ImportError::IoError(e) => format!("Reading or writing a file failed: {}", e),
            ImportError::InvalidConfigValueError { field, reason, .. } => {
                format!("Setting '{}' is invalid: {}", field, reason)
            }
            other => other.to_string(),
        }
    }
}

/// Failure reported by an [`ErrorSink`](crate::domain::ports::ErrorSink).
#[derive(Error, Debug)]
pub enum SinkError {
    #[error("Failed to write error rows: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Unexpected(String),
}

impl From<csv::Error> for SinkError {
    fn from(err: csv::Error) -> Self {
        if err.is_io_error() {
            match err.into_kind() {
                csv::ErrorKind::Io(io) => SinkError::Io(io),
                other => SinkError::Unexpected(format!("{:?}", other)),
            }
        } else {
            SinkError::Unexpected(err.to_string())
        }
    }
}

impl From<SinkError> for ImportError {
    fn from(err: SinkError) -> Self {
        match err {
            SinkError::Io(io) => ImportError::IoError(io),
            SinkError::Unexpected(message) => ImportError::UnknownError { message },
        }
    }
}

pub type Result<T> = std::result::Result<T, ImportError>;
