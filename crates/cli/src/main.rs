// csv2wp - import architects and buildings from CSV into WordPress

mod exit_codes;
mod import;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, ValueEnum};
use tracing_subscriber::EnvFilter;

use exit_codes::{EXIT_ERROR, EXIT_SUCCESS};

#[derive(Parser)]
#[command(name = "csv2wp")]
#[command(about = "Import architects and buildings data from CSV files to WordPress")]
#[command(long_version = long_version())]
#[command(version)]
#[command(after_help = "\
Environment:
  WP_API_URL, WP_API_USERNAME, WP_API_PASSWORD   required
  ARCHITECTS_CSV, BUILDINGS_CSV                  default input files
  ARCHITECTS_ENDPOINT, BUILDINGS_ENDPOINT        REST endpoints under WP_API_URL
  A .env file in the working directory is read first.

Examples:
  csv2wp
  csv2wp --type architects --file data/architects.csv
  csv2wp --type buildings --dry-run
  csv2wp --dry-run --json | jq '.reports[].summary'")]
struct Cli {
    /// Type of import
    #[arg(long = "type", short = 't', value_enum, default_value_t = ImportType::All)]
    kind: ImportType,

    /// Path to CSV file (overrides ARCHITECTS_CSV / BUILDINGS_CSV; with
    /// `--type all` it is used for both)
    #[arg(long, short = 'f')]
    file: Option<PathBuf>,

    /// Validate and map data without writing anything
    #[arg(long, short = 'd')]
    dry_run: bool,

    /// Print the import reports as JSON on stdout
    #[arg(long)]
    json: bool,

    /// Exit 3 if any row failed to import
    #[arg(long)]
    strict: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ImportType {
    Architects,
    Buildings,
    All,
}

fn main() -> ExitCode {
    csv2wp_config::load_dotenv();
    init_logging();

    let cli = Cli::parse();

    let result = import::cmd_import(import::ImportOptions {
        kind: cli.kind,
        file: cli.file,
        dry_run: cli.dry_run,
        json: cli.json,
        strict: cli.strict,
    });

    match result {
        Ok(()) => ExitCode::from(EXIT_SUCCESS),
        Err(CliError { code, message, hint }) => {
            if !message.is_empty() {
                eprintln!("error: {}", message);
            }
            if let Some(hint) = hint {
                eprintln!("hint:  {}", hint);
            }
            ExitCode::from(code)
        }
    }
}

/// Logs go to stderr; `RUST_LOG` overrides the default `info` level.
fn init_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn long_version() -> &'static str {
    concat!(
        env!("CARGO_PKG_VERSION"),
        " (", env!("CSV2WP_GIT_HASH"), ")",
        "\ntarget:  ", env!("CSV2WP_TARGET"),
    )
}

#[derive(Debug)]
pub struct CliError {
    pub code: u8,
    pub message: String,
    pub hint: Option<String>,
}

impl CliError {
    pub fn error(msg: impl Into<String>) -> Self {
        Self { code: EXIT_ERROR, message: msg.into(), hint: None }
    }

    pub fn config(err: csv2wp_config::ConfigError) -> Self {
        Self::error(err.to_string())
            .with_hint("set it in the environment or in a .env file in the working directory")
    }

    pub fn import(err: csv2wp_import::ImportError) -> Self {
        let hint = match &err {
            csv2wp_import::ImportError::MissingField { column, .. } => {
                Some(format!("every row needs a non-empty '{}' column; nothing was written", column))
            }
            csv2wp_import::ImportError::Parse { .. } => {
                Some("check quoting and that every row has as many fields as the header".to_string())
            }
            csv2wp_import::ImportError::FileRead { .. } => None,
        };
        Self { code: EXIT_ERROR, message: err.to_string(), hint }
    }

    /// Add a hint to an existing error.
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}
