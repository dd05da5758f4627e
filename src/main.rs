use clap::Parser;
use txn_csv_import::utils::{logger, validation::Validate};
use txn_csv_import::{
    CliConfig, CsvErrorSink, ErrorSink, ImportError, NoopErrorSink, ParsedFileResult, ParserConfig,
    TomlConfig, TransactionCsvParser,
};

#[tokio::main]
async fn main() {
    let config = CliConfig::parse();

    if config.log_json {
        logger::init_json_logger(config.verbose);
    } else {
        logger::init_cli_logger(config.verbose);
    }
    tracing::debug!("CLI config: {:?}", config);

    match run(&config).await {
        Ok(result) => {
            if let Err(e) = report(&result, config.json) {
                fail(e);
            }
        }
        Err(e) => fail(e),
    }
}

async fn run(config: &CliConfig) -> Result<ParsedFileResult, ImportError> {
    let file_config = config
        .config
        .as_ref()
        .map(TomlConfig::from_file)
        .transpose()?;
    if let Some(file_config) = &file_config {
        file_config.validate()?;
    }

    let parser_config = config.into_parser_config(file_config.as_ref());
    parser_config.validate()?;

    match config.error_report_path(file_config.as_ref()) {
        Some(path) => {
            tracing::info!("Rejected rows will be written to {}", path.display());
            parse(parser_config, CsvErrorSink::new(path), config).await
        }
        None => parse(parser_config, NoopErrorSink, config).await,
    }
}

async fn parse<K: ErrorSink>(
    parser_config: ParserConfig,
    sink: K,
    config: &CliConfig,
) -> Result<ParsedFileResult, ImportError> {
    TransactionCsvParser::with_sink(parser_config, sink)
        .parse_file(&config.input)
        .await
}

fn report(result: &ParsedFileResult, json: bool) -> Result<(), ImportError> {
    if json {
        println!("{}", serde_json::to_string_pretty(result)?);
        return Ok(());
    }

    let summary = result.summary();
    println!(
        "✅ {} lines read: {} accepted, {} rejected, {} duplicates",
        summary.total_lines, summary.accepted, summary.rejected, summary.duplicates
    );
    for error in &result.parsing_errors {
        println!("  line {}: {}", error.line, error.error);
    }
    for (line, error) in &result.validation_errors {
        println!("  line {}: {}", line, error);
    }
    Ok(())
}

fn fail(e: ImportError) -> ! {
    tracing::error!("❌ Import failed: {} (Severity: {:?})", e, e.severity());
    eprintln!("❌ {}", e.user_friendly_message());
    std::process::exit(e.exit_code());
}
