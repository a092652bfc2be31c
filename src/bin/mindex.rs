//! CLI entry point for the `mindex` command-line tool.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

use multi_index::cli::commands::{self, FieldFilter};
use multi_index::MindexError;

#[derive(Parser)]
#[command(
    name = "mindex",
    about = "Query JSON records through secondary indexes"
)]
struct Cli {
    /// Output format: "text" (default) or "json"
    #[arg(long, default_value = "text")]
    format: String,

    /// Enable debug logging
    #[arg(long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the records matching every filter
    Query {
        /// JSON file holding an array of flat objects
        file: PathBuf,
        /// Field to build a key/value index over (repeatable)
        #[arg(long = "index")]
        indexes: Vec<String>,
        /// Filter FIELD=VALUE[|VALUE...] (repeatable)
        #[arg(long = "where")]
        filters: Vec<FieldFilter>,
        /// Maximum number of records to print
        #[arg(long)]
        limit: Option<usize>,
        /// Engine configuration (TOML)
        #[arg(long)]
        config: Option<PathBuf>,
    },
    /// Show how a query would be answered
    Explain {
        /// JSON file holding an array of flat objects
        file: PathBuf,
        /// Field to build a key/value index over (repeatable)
        #[arg(long = "index")]
        indexes: Vec<String>,
        /// Filter FIELD=VALUE[|VALUE...] (repeatable)
        #[arg(long = "where")]
        filters: Vec<FieldFilter>,
        /// Engine configuration (TOML)
        #[arg(long)]
        config: Option<PathBuf>,
    },
    /// Show key statistics for indexed fields
    Stats {
        /// JSON file holding an array of flat objects
        file: PathBuf,
        /// Field to report on (repeatable)
        #[arg(long = "index")]
        indexes: Vec<String>,
    },
}

fn main() {
    let cli = Cli::parse();
    let json = cli.format == "json";

    if cli.verbose {
        env_logger::Builder::from_default_env()
            .filter_level(log::LevelFilter::Debug)
            .init();
    } else {
        env_logger::init();
    }

    let result = match cli.command {
        Commands::Query {
            file,
            indexes,
            filters,
            limit,
            config,
        } => commands::cmd_query(&file, &indexes, &filters, limit, config.as_deref(), json),
        Commands::Explain {
            file,
            indexes,
            filters,
            config,
        } => commands::cmd_explain(&file, &indexes, &filters, config.as_deref(), json),
        Commands::Stats { file, indexes } => commands::cmd_stats(&file, &indexes, json),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        let code = match &e {
            MindexError::Io(_) => 1,
            MindexError::Json(_) | MindexError::InvalidRecord { .. } => 2,
            MindexError::Config(_) | MindexError::ConfigWrite(_) => 3,
            MindexError::InvalidCriteria(_) | MindexError::UnknownField(_) => 4,
        };
        process::exit(code);
    }
}
