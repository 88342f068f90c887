use clap::{Parser, Subcommand};
use colored::*;
use docidx::docs::EntryKind;
use std::path::PathBuf;

mod config;
mod init;
mod logger;
mod search;

use config::Config;
use init::init_config;
use search::{
    Format, convert_file, list_entries, open_index, resolve_index_path, search_entries,
    show_entry, show_info, validate_file,
};

// ============================================================================
// CLI Definition
// ============================================================================

#[derive(Parser)]
#[command(name = "docidx")]
#[command(about = "Inspect and convert API reference search indexes", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Index file to use instead of the embedded one (JSON or lists.js)
    #[arg(short, long, global = true)]
    index: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// List all entries of the index
    List {
        /// Only show entries of this type (package or class)
        #[arg(long)]
        kind: Option<EntryKind>,
    },
    /// Show one entry by id or fully qualified name
    Show {
        /// Entry id or label
        entry: String,
    },
    /// Search entry labels (case-insensitive substring)
    Search {
        /// Text to look for
        query: String,
    },
    /// Show entry counts and the index fingerprint
    Info,
    /// Check that a file is a well-formed index
    Validate {
        /// JSON index or lists.js script
        file: PathBuf,
    },
    /// Convert between the JSON index and the lists.js script
    Convert {
        /// JSON index or lists.js script to read
        input: PathBuf,
        /// File to write (stdout if omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Output format (inferred from the output extension if omitted)
        #[arg(long, value_enum)]
        to: Option<Format>,
    },
    /// Initialize a new docidx.toml configuration file
    Init {
        /// Overwrite existing docidx.toml if present
        #[arg(long)]
        force: bool,
    },
}

// ============================================================================
// Main Entry Point
// ============================================================================

fn main() {
    let cli = Cli::parse();

    logger::init_cli_logger(cli.verbose);

    let config = Config::load();

    let index_path = resolve_index_path(cli.index, &config);

    let result = match cli.command {
        Commands::List { kind } => {
            open_index(index_path.as_deref()).and_then(|index| list_entries(&index, kind))
        }
        Commands::Show { entry } => open_index(index_path.as_deref())
            .and_then(|index| show_entry(&index, &entry, config.max_results)),
        Commands::Search { query } => open_index(index_path.as_deref())
            .and_then(|index| search_entries(&index, &query, config.max_results)),
        Commands::Info => open_index(index_path.as_deref()).and_then(|index| show_info(&index)),
        Commands::Validate { file } => validate_file(&file),
        Commands::Convert { input, output, to } => convert_file(&input, output.as_deref(), to),
        Commands::Init { force } => init_config(force),
    };

    if let Err(e) = result {
        eprintln!("\n{} {}", "❌".red(), e.red());
        std::process::exit(1);
    }
}
