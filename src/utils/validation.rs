use crate::utils::error::{ImportError, Result};
use std::path::Path;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

pub fn validate_path(field_name: &str, path: &str) -> Result<()> {
    if path.is_empty() {
        return Err(ImportError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path cannot be empty".to_string(),
        });
    }

    if path.contains('\0') {
        return Err(ImportError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path contains null bytes".to_string(),
        });
    }

    Ok(())
}

/// Extension check is case-insensitive, so `DATA.CSV` passes for `csv`.
pub fn validate_file_extension(path: &Path, allowed_extensions: &[&str]) -> Result<()> {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase());

    match extension {
        Some(ext) if allowed_extensions.contains(&ext.as_str()) => Ok(()),
        Some(ext) => Err(ImportError::InvalidFormat {
            message: format!(
                "Unsupported file extension: {}. Allowed extensions: {}",
                ext,
                allowed_extensions.join(", ")
            ),
        }),
        None => Err(ImportError::InvalidFormat {
            message: format!("File has no extension: {}", path.display()),
        }),
    }
}

pub fn validate_positive_number(field_name: &str, value: usize, min_value: usize) -> Result<()> {
    if value < min_value {
        return Err(ImportError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: format!("Value must be at least {}", min_value),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_path() {
        assert!(validate_path("report.error_report_path", "./errors.csv").is_ok());
        assert!(validate_path("report.error_report_path", "").is_err());
        assert!(validate_path("report.error_report_path", "bad\0path").is_err());
    }

    #[test]
    fn test_validate_positive_number() {
        assert!(validate_positive_number("parser.max_fraction_digits", 2, 1).is_ok());
        assert!(validate_positive_number("parser.max_fraction_digits", 0, 1).is_err());
    }

    #[test]
    fn test_validate_file_extension() {
        assert!(validate_file_extension(Path::new("upload.csv"), &["csv"]).is_ok());
        assert!(validate_file_extension(Path::new("UPLOAD.CSV"), &["csv"]).is_ok());
        assert!(matches!(
            validate_file_extension(Path::new("upload.txt"), &["csv"]),
            Err(ImportError::InvalidFormat { .. })
        ));
        assert!(matches!(
            validate_file_extension(Path::new("upload"), &["csv"]),
            Err(ImportError::InvalidFormat { .. })
        ));
    }
}
