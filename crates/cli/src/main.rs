// stocklink CLI - links a stock ledger to its PO, GRN and GIN exports

mod exit_codes;
mod link;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};

use exit_codes::{
    link_exit_code, EXIT_ERROR, EXIT_INVALID_CONFIG, EXIT_MISSING_INPUT, EXIT_READ, EXIT_SUCCESS,
    EXIT_USAGE, EXIT_WRITE,
};
use stocklink_recon::LinkError;

#[derive(Parser)]
#[command(name = "stocklink")]
#[command(about = "Link a stock ledger to its PO, GRN and GIN exports")]
#[command(version)]
struct Cli {
    /// Log progress at info level (RUST_LOG takes precedence)
    #[arg(long, short = 'v', global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

/// The four exports plus an optional config file.
///
/// Every path is optional at the clap level so that a missing file is
/// reported with its own exit code, naming all absent inputs at once.
#[derive(Args)]
pub struct InputArgs {
    /// Stock ledger export (header on row 1)
    #[arg(long, env = "STOCKLINK_LEDGER")]
    pub ledger: Option<PathBuf>,

    /// Purchase order export (header on row 7)
    #[arg(long, env = "STOCKLINK_PO")]
    pub po: Option<PathBuf>,

    /// Goods receipt note export (header on row 7)
    #[arg(long, env = "STOCKLINK_GRN")]
    pub grn: Option<PathBuf>,

    /// Goods issue note export (header on row 7)
    #[arg(long, env = "STOCKLINK_GIN")]
    pub gin: Option<PathBuf>,

    /// TOML config (header rows, output sheet names, missing-column policy)
    #[arg(long, short = 'c')]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Link the four exports and write the output workbook
    #[command(after_help = "\
Examples:
  stocklink run --ledger ledger.xlsx --po po.xlsx --grn grn.xlsx --gin gin.xlsx
  stocklink run --ledger ledger.csv --po po.csv --grn grn.csv --gin gin.csv -o linked.xlsx
  stocklink run --ledger l.xlsx --po p.xlsx --grn g.xlsx --gin i.xlsx --config stocklink.toml --json")]
    Run {
        #[command(flatten)]
        inputs: InputArgs,

        /// Output workbook path (default: output.file from config, else Stock_Ledger_Final.xlsx)
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,

        /// Print the run summary as JSON to stdout
        #[arg(long)]
        json: bool,

        /// Suppress the human summary on stderr
        #[arg(long, short = 'q')]
        quiet: bool,
    },

    /// Load the four exports and check their required columns
    #[command(after_help = "\
Examples:
  stocklink validate --ledger ledger.xlsx --po po.xlsx --grn grn.xlsx --gin gin.xlsx
  stocklink validate --ledger ledger.xlsx --po po.xlsx --grn grn.xlsx --gin gin.xlsx --json")]
    Validate {
        #[command(flatten)]
        inputs: InputArgs,

        /// Print the validation report as JSON to stdout
        #[arg(long)]
        json: bool,
    },

    /// List the column headers of one file
    #[command(after_help = "\
Examples:
  stocklink columns po.xlsx --header-row 7
  stocklink columns ledger.csv --json")]
    Columns {
        /// File to inspect
        file: PathBuf,

        /// Physical row holding the header (1-based)
        #[arg(long, default_value_t = 1)]
        header_row: usize,

        /// Print headers as a JSON array
        #[arg(long)]
        json: bool,
    },
}

fn init_logging(verbose: bool) {
    let default_filter = if verbose { "info" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .format_timestamp(None)
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        Commands::Run { inputs, output, json, quiet } => link::cmd_run(inputs, output, json, quiet),
        Commands::Validate { inputs, json } => link::cmd_validate(inputs, json),
        Commands::Columns { file, header_row, json } => link::cmd_columns(file, header_row, json),
    };

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

#[derive(Debug)]
pub struct CliError {
    pub code: u8,
    pub message: String,
    pub hint: Option<String>,
}

impl CliError {
    pub fn general(msg: impl Into<String>) -> Self {
        Self { code: EXIT_ERROR, message: msg.into(), hint: None }
    }

    pub fn args(msg: impl Into<String>) -> Self {
        Self { code: EXIT_USAGE, message: msg.into(), hint: None }
    }

    pub fn missing_input(msg: impl Into<String>) -> Self {
        Self { code: EXIT_MISSING_INPUT, message: msg.into(), hint: None }
    }

    pub fn read(msg: impl Into<String>) -> Self {
        Self { code: EXIT_READ, message: msg.into(), hint: None }
    }

    pub fn write(msg: impl Into<String>) -> Self {
        Self { code: EXIT_WRITE, message: msg.into(), hint: None }
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self { code: EXIT_INVALID_CONFIG, message: msg.into(), hint: None }
    }

    /// Add a hint to an existing error.
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}

impl From<LinkError> for CliError {
    fn from(err: LinkError) -> Self {
        let hint = match &err {
            LinkError::MissingInput(_) => Some("pass --ledger, --po, --grn and --gin".to_string()),
            LinkError::MissingColumns(_) => {
                Some("run `stocklink columns FILE --header-row N` to see what was found".to_string())
            }
            _ => None,
        };
        Self { code: link_exit_code(&err), message: err.to_string(), hint }
    }
}
