use crate::config::{ParserConfig, TomlConfig};
use clap::Parser;
use std::path::PathBuf;

#[derive(Debug, Clone, Parser)]
#[command(name = "txn-import")]
#[command(about = "Validate a transaction CSV and report every rejected line")]
pub struct CliConfig {
    /// CSV file with date, amount, description and currency columns
    pub input: PathBuf,

    #[arg(long, help = "TOML file with [parser] and [report] settings")]
    pub config: Option<PathBuf>,

    #[arg(long, help = "Column separator (overrides the config file)")]
    pub delimiter: Option<char>,

    #[arg(long, help = "Write rejected rows to this CSV file")]
    pub error_report: Option<PathBuf>,

    #[arg(long, help = "Print the full parse result as JSON")]
    pub json: bool,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Emit log events as JSON lines on stderr")]
    pub log_json: bool,
}

impl CliConfig {
    /// Flags given on the command line win over the config file.
    pub fn into_parser_config(&self, file_config: Option<&TomlConfig>) -> ParserConfig {
        let mut parser = file_config
            .map(|config| config.parser.clone())
            .unwrap_or_default();

        if let Some(delimiter) = self.delimiter {
            parser.delimiter = delimiter;
        }
        parser
    }

    pub fn error_report_path(&self, file_config: Option<&TomlConfig>) -> Option<PathBuf> {
        self.error_report.clone().or_else(|| {
            file_config
                .and_then(|config| config.error_report_path())
                .map(PathBuf::from)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_flags_override_file_config() {
        let cli = CliConfig::parse_from([
            "txn-import",
            "upload.csv",
            "--delimiter",
            ";",
            "--error-report",
            "cli-errors.csv",
        ]);
        let file_config = TomlConfig::from_toml_str(
            "[parser]\ndelimiter = \"|\"\n[report]\nerror_report_path = \"file-errors.csv\"\n",
        )
        .unwrap();

        let parser = cli.into_parser_config(Some(&file_config));
        assert_eq!(parser.delimiter, ';');
        assert_eq!(
            cli.error_report_path(Some(&file_config)),
            Some(PathBuf::from("cli-errors.csv"))
        );
    }

    #[test]
    fn test_file_config_used_when_flags_absent() {
        let cli = CliConfig::parse_from(["txn-import", "upload.csv"]);
        let file_config = TomlConfig::from_toml_str(
            "[parser]\ndelimiter = \"|\"\n[report]\nerror_report_path = \"file-errors.csv\"\n",
        )
        .unwrap();

        assert_eq!(cli.into_parser_config(Some(&file_config)).delimiter, '|');
        assert_eq!(
            cli.error_report_path(Some(&file_config)),
            Some(PathBuf::from("file-errors.csv"))
        );
        assert_eq!(cli.into_parser_config(None), ParserConfig::default());
        assert!(!cli.json);
        assert!(!cli.log_json);
    }

    #[test]
    fn test_log_json_is_separate_from_result_json() {
        let cli = CliConfig::parse_from(["txn-import", "upload.csv", "--log-json"]);
        assert!(cli.log_json);
        assert!(!cli.json);

        let cli = CliConfig::parse_from(["txn-import", "upload.csv", "--json", "--verbose"]);
        assert!(cli.json);
        assert!(!cli.log_json);
    }
}
