use crate::domain::model::ErrorRow;
use crate::domain::ports::ErrorSink;
use crate::utils::error::SinkError;
use async_trait::async_trait;
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Default sink: accepts every batch and keeps nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopErrorSink;

#[async_trait]
impl ErrorSink for NoopErrorSink {
    async fn write_rows(&self, _rows: &[ErrorRow]) -> Result<(), SinkError> {
        Ok(())
    }
}

/// Keeps every written row in memory. Clones share the same buffer, so a
/// caller can hand one clone to the parser and inspect the other.
#[derive(Debug, Clone, Default)]
pub struct InMemoryErrorSink {
    rows: Arc<Mutex<Vec<ErrorRow>>>,
    batches: Arc<Mutex<usize>>,
}

impl InMemoryErrorSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn rows(&self) -> Vec<ErrorRow> {
        self.rows.lock().await.clone()
    }

    /// Number of `write_rows` calls received so far.
    pub async fn batches(&self) -> usize {
        *self.batches.lock().await
    }
}

#[async_trait]
impl ErrorSink for InMemoryErrorSink {
    async fn write_rows(&self, rows: &[ErrorRow]) -> Result<(), SinkError> {
        *self.batches.lock().await += 1;
        self.rows.lock().await.extend_from_slice(rows);
        Ok(())
    }
}

#[derive(Debug, Serialize)]
struct ErrorReportRecord<'a> {
    line: usize,
    error_type: &'a str,
    message: String,
    date: &'a str,
    amount: &'a str,
    description: &'a str,
    currency: &'a str,
}

impl<'a> From<&'a ErrorRow> for ErrorReportRecord<'a> {
    fn from(row: &'a ErrorRow) -> Self {
        Self {
            line: row.line,
            error_type: row.error_type(),
            message: row.message(),
            date: &row.date,
            amount: &row.amount,
            description: &row.description,
            currency: &row.currency,
        }
    }
}

/// Writes rejected rows as a CSV report. An empty batch leaves the file
/// system untouched.
#[derive(Debug, Clone)]
pub struct CsvErrorSink {
    path: PathBuf,
}

impl CsvErrorSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &PathBuf {
        &self.path
    }

    fn render(rows: &[ErrorRow]) -> Result<Vec<u8>, SinkError> {
        let mut writer = csv::Writer::from_writer(Vec::new());
        for row in rows {
            writer.serialize(ErrorReportRecord::from(row))?;
        }
        writer
            .into_inner()
            .map_err(|e| SinkError::Unexpected(format!("Failed to flush error report: {}", e)))
    }
}

#[async_trait]
impl ErrorSink for CsvErrorSink {
    async fn write_rows(&self, rows: &[ErrorRow]) -> Result<(), SinkError> {
        if rows.is_empty() {
            return Ok(());
        }

        let data = Self::render(rows)?;

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }

        tracing::debug!(
            "Writing {} error rows ({} bytes) to {}",
            rows.len(),
            data.len(),
            self.path.display()
        );
        tokio::fs::write(&self.path, data).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::{LineError, RawRow, Rejection};
    use tempfile::TempDir;

    fn error_rows() -> Vec<ErrorRow> {
        vec![
            ErrorRow::new(
                1,
                Rejection::Parsing(LineError::MultipleErrors {
                    messages: vec![
                        "Invalid date format(DD-MM-YYYY): x".to_string(),
                        "Invalid amount format: y".to_string(),
                    ],
                }),
                &RawRow::new("x", "y", "Rent, March", "cad"),
            ),
            ErrorRow::new(
                2,
                Rejection::Duplicate(LineError::RepeatedElementsFound {
                    duplication_key: "08-01-2025 pay".to_string(),
                    lines: vec![2, 3],
                }),
                &RawRow::new("08-01-2025", "1", "pay", "cad"),
            ),
        ]
    }

    #[tokio::test]
    async fn test_in_memory_sink_accumulates() {
        let sink = InMemoryErrorSink::new();
        let handle = sink.clone();

        sink.write_rows(&error_rows()).await.unwrap();
        sink.write_rows(&[]).await.unwrap();

        assert_eq!(handle.rows().await.len(), 2);
        assert_eq!(handle.batches().await, 2);
    }

    #[tokio::test]
    async fn test_csv_sink_writes_report() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("reports").join("errors.csv");
        let sink = CsvErrorSink::new(&path);

        sink.write_rows(&error_rows()).await.unwrap();

        let mut reader = csv::Reader::from_path(&path).unwrap();
        let headers = reader.headers().unwrap().clone();
        assert_eq!(
            headers.iter().collect::<Vec<_>>(),
            vec!["line", "error_type", "message", "date", "amount", "description", "currency"]
        );

        let records: Vec<csv::StringRecord> = reader.records().map(|r| r.unwrap()).collect();
        assert_eq!(records.len(), 2);
        assert_eq!(&records[0][1], "MultipleErrors");
        assert_eq!(
            &records[0][2],
            "Invalid date format(DD-MM-YYYY): x, Invalid amount format: y"
        );
        assert_eq!(&records[0][5], "Rent, March");
        assert_eq!(&records[1][1], "RepeatedElementsFound");
        assert_eq!(&records[1][2], "Repeated elements found on lines 2, 3: 08-01-2025 pay");
    }

    #[tokio::test]
    async fn test_csv_sink_ignores_empty_batch() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("errors.csv");

        CsvErrorSink::new(&path).write_rows(&[]).await.unwrap();

        assert!(!path.exists());
    }

    #[tokio::test]
    async fn test_csv_sink_reports_io_failure() {
        let temp_dir = TempDir::new().unwrap();
        let blocker = temp_dir.path().join("not-a-dir");
        std::fs::write(&blocker, b"file").unwrap();

        let sink = CsvErrorSink::new(blocker.join("errors.csv"));
        let err = sink.write_rows(&error_rows()).await.unwrap_err();

        assert!(matches!(err, SinkError::Io(_)));
    }
}
