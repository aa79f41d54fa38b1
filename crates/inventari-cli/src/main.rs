mod commands;
mod output;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "inventari",
    version,
    about = "Rebuild municipal asset inventory tables from PDF text positions"
)]
struct Cli {
    /// Log parser decisions (same as RUST_LOG=debug)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse an inventory PDF (or pdf2json dump) into a table
    Parse {
        /// Path to a PDF, or a .json fragment dump
        input_file: PathBuf,

        /// Document family: relacio-bens or llibre-a
        #[arg(short, long, conflicts_with_all = ["municipality", "report"])]
        family: Option<String>,

        /// Municipality, used with --report to pick the family
        #[arg(short, long, requires = "report")]
        municipality: Option<String>,

        /// Report type ("bens" or "a"), used with --municipality
        #[arg(short, long, requires = "municipality")]
        report: Option<String>,

        /// Only parse this page (1-based)
        #[arg(long)]
        page: Option<usize>,

        /// JSON file overriding the family's window tuning
        #[arg(long, value_name = "FILE")]
        tuning: Option<PathBuf>,

        /// Output format: table (default) or json
        #[arg(short, long, default_value = "table")]
        output: String,

        /// Write the parsed table to a JSON file
        #[arg(short = 'O', long = "out", value_name = "FILE")]
        out: Option<PathBuf>,
    },
    /// Inspect document families and their tuning
    Families {
        #[command(subcommand)]
        action: FamiliesAction,
    },
}

#[derive(Subcommand)]
enum FamiliesAction {
    /// List document families
    List,
    /// Explain a family's columns and vocabularies
    Explain {
        /// Family name (e.g., "llibre-a")
        family: String,
    },
    /// Print a family's built-in tuning as JSON
    Tuning {
        /// Family name
        family: String,
    },
    /// Validate a tuning override file
    ValidateTuning {
        /// Path to JSON tuning file
        file: PathBuf,
    },
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::WARN
    };
    let filter = EnvFilter::builder()
        .with_default_directive(default_level.into())
        .from_env_lossy();
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .compact()
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match cli.command {
        Commands::Parse {
            input_file,
            family,
            municipality,
            report,
            page,
            tuning,
            output,
            out,
        } => commands::parse::run(commands::parse::ParseArgs {
            input_file,
            family,
            municipality,
            report,
            page,
            tuning,
            output_format: output,
            output_file: out,
        }),
        Commands::Families { action } => match action {
            FamiliesAction::List => commands::families::list(),
            FamiliesAction::Explain { family } => commands::families::explain(&family),
            FamiliesAction::Tuning { family } => commands::families::tuning(&family),
            FamiliesAction::ValidateTuning { file } => commands::families::validate(&file),
        },
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
