use crate::adapters::sink::NoopErrorSink;
use crate::config::ParserConfig;
use crate::core::builder::RowBuilder;
use crate::core::duplicates::{DuplicateTracker, Observation};
use crate::core::headers::ColumnMap;
use crate::core::validator::RowValidator;
use crate::domain::model::{
    ErrorRow, LineError, ParsedFileResult, ParsingError, RawRow, Rejection, Transaction,
};
use crate::domain::ports::ErrorSink;
use crate::utils::error::{ImportError, Result};
use crate::utils::validation::validate_file_extension;
use std::collections::{BTreeMap, BTreeSet};
use std::io::Read;
use std::path::Path;

/// Turns a transaction CSV into accepted rows plus a per-line account of every
/// rejection, and hands the rejected rows to the configured [`ErrorSink`].
///
/// A parser holds no per-file state; each call starts a fresh session, so one
/// instance can be reused for any number of files.
pub struct TransactionCsvParser<K: ErrorSink = NoopErrorSink> {
    config: ParserConfig,
    sink: K,
}

impl TransactionCsvParser<NoopErrorSink> {
    pub fn new(config: ParserConfig) -> Self {
        Self::with_sink(config, NoopErrorSink)
    }
}

impl<K: ErrorSink> TransactionCsvParser<K> {
    pub fn with_sink(config: ParserConfig, sink: K) -> Self {
        Self { config, sink }
    }

    /// The path must exist and carry a `.csv` extension (any case); both are
    /// checked before the file is opened.
    pub async fn parse_file<P: AsRef<Path>>(&self, path: P) -> Result<ParsedFileResult> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(ImportError::FileNotFound {
                path: path.display().to_string(),
            });
        }
        validate_file_extension(path, &["csv"])?;

        tracing::debug!("Reading transactions from {}", path.display());
        let path = path.to_path_buf();
        let config = self.config.clone();
        let reconciled = tokio::task::spawn_blocking(move || -> Result<Reconciled> {
            let file = std::fs::File::open(&path)?;
            stream(&config, file)
        })
        .await
        .map_err(|err| ImportError::UnknownError {
            message: format!("Reader task failed: {}", err),
        })??;
        self.finish(reconciled).await
    }

    pub async fn parse_str(&self, input: &str) -> Result<ParsedFileResult> {
        self.parse_reader(input.as_bytes()).await
    }

    /// Reads `input` on the calling task. For files prefer
    /// [`parse_file`](Self::parse_file), which streams on the blocking pool.
    pub async fn parse_reader<R: Read>(&self, input: R) -> Result<ParsedFileResult> {
        let reconciled = stream(&self.config, input)?;
        self.finish(reconciled).await
    }

    async fn finish(&self, reconciled: Reconciled) -> Result<ParsedFileResult> {
        let summary = reconciled.result.summary();

        tracing::debug!("Writing {} error rows", reconciled.error_rows.len());
        if let Err(err) = self.sink.write_rows(&reconciled.error_rows).await {
            tracing::warn!("Error sink failed, aborting parse: {}", err);
            return Err(err.into());
        }

        tracing::info!(
            "Parsed {} lines: {} accepted, {} rejected, {} duplicates",
            summary.total_lines,
            summary.accepted,
            summary.rejected,
            summary.duplicates
        );
        Ok(reconciled.result)
    }
}

fn stream<R: Read>(config: &ParserConfig, input: R) -> Result<Reconciled> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .delimiter(config.delimiter_byte()?)
        .from_reader(input);
    let mut records = reader.records();

    let header = records
        .next()
        .transpose()
        .map_err(stream_error)?
        .unwrap_or_default();
    let columns = ColumnMap::from_header(&header)?;
    tracing::debug!("Header accepted, streaming rows");

    let builder = RowBuilder::new(RowValidator::new(config));
    let mut session = ParseSession::new(&builder);
    for record in records {
        let record = record.map_err(stream_error)?;
        session.push(columns.extract(&record));
    }

    tracing::debug!("End of input after {} lines, reconciling", session.line);
    Ok(session.reconcile())
}

fn stream_error(err: csv::Error) -> ImportError {
    ImportError::UnknownError {
        message: format!("Failed to read input: {}", err),
    }
}

struct Reconciled {
    result: ParsedFileResult,
    error_rows: Vec<ErrorRow>,
}

/// State of one parse. Rows are staged by line number while streaming and only
/// filtered once the whole file has been seen, because the first line of a
/// duplicate group is indistinguishable from a good row until a repeat shows up.
struct ParseSession<'a> {
    builder: &'a RowBuilder,
    line: usize,
    raw_rows: BTreeMap<usize, RawRow>,
    rows: BTreeMap<usize, Transaction>,
    parsing_errors: Vec<ParsingError>,
    pending_removal: BTreeSet<usize>,
    tracker: DuplicateTracker,
}

impl<'a> ParseSession<'a> {
    fn new(builder: &'a RowBuilder) -> Self {
        Self {
            builder,
            line: 0,
            raw_rows: BTreeMap::new(),
            rows: BTreeMap::new(),
            parsing_errors: Vec::new(),
            pending_removal: BTreeSet::new(),
            tracker: DuplicateTracker::new(),
        }
    }

    fn push(&mut self, raw: RawRow) {
        if raw.is_blank() {
            return;
        }
        self.line += 1;
        let line = self.line;

        let missing = raw.missing_fields();
        if !missing.is_empty() {
            self.reject(
                ParsingError::invalid_line(
                    line,
                    format!("Missing fields in the row: {}", missing.join(", ")),
                ),
                raw,
            );
            return;
        }

        let (transaction, error) = self.builder.build(&raw, line);
        if let Some(error) = error {
            self.reject(error, raw);
            return;
        }

        self.raw_rows.insert(line, raw);
        match self.tracker.observe(transaction.duplication_key(), line) {
            Observation::Unseen => {
                self.rows.insert(line, transaction);
            }
            Observation::SeenAt(first_line) => {
                tracing::debug!("Line {} repeats line {}", line, first_line);
                self.pending_removal.insert(line);
            }
        }
    }

    fn reject(&mut self, error: ParsingError, raw: RawRow) {
        tracing::debug!("Rejected {}", error);
        self.pending_removal.insert(error.line);
        self.raw_rows.insert(error.line, raw);
        self.parsing_errors.push(error);
    }

    fn reconcile(self) -> Reconciled {
        let ParseSession {
            raw_rows,
            mut rows,
            parsing_errors,
            mut pending_removal,
            tracker,
            ..
        } = self;

        let mut rejections: BTreeMap<usize, Rejection> = parsing_errors
            .iter()
            .map(|error| (error.line, Rejection::Parsing(error.error.clone())))
            .collect();

        let mut validation_errors = BTreeMap::new();
        for group in tracker.into_groups() {
            let error = LineError::RepeatedElementsFound {
                duplication_key: group.key,
                lines: group.lines.clone(),
            };
            for line in group.lines {
                pending_removal.insert(line);
                rejections.insert(line, Rejection::Duplicate(error.clone()));
                validation_errors.insert(line, error.clone());
            }
        }

        rows.retain(|line, _| !pending_removal.contains(line));

        let error_rows = rejections
            .into_iter()
            .filter_map(|(line, rejection)| {
                raw_rows
                    .get(&line)
                    .map(|raw| ErrorRow::new(line, rejection, raw))
            })
            .collect();

        Reconciled {
            result: ParsedFileResult {
                rows,
                parsing_errors,
                validation_errors,
            },
            error_rows,
        }
    }
}
