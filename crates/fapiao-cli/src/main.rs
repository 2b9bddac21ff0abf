//! CLI application for scraping, deduplicating and merging receipt PDFs.

mod commands;

use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use clap::{Parser, Subcommand};
use tracing_subscriber::prelude::*;
use tracing_subscriber::{EnvFilter, fmt};

use commands::{config, issue, merge, process};

/// Fapiao - merge medical receipt PDFs by issue date
#[derive(Parser)]
#[command(name = "fapiao")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Path to config file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Append log records to this file
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Scrape a directory of receipts and merge them into one PDF per date
    Merge(merge::MergeArgs),

    /// Extract the fields of a single receipt
    Process(process::ProcessArgs),

    /// Manage configuration
    Config(config::ConfigArgs),

    /// Create, read and update tracker issues
    Issue(issue::IssueArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config_path = cli.config.clone().unwrap_or_else(commands::default_config_path);
    // `config` must still run when the file is missing or broken, it is how
    // the file gets repaired
    let app_config = match cli.command {
        Commands::Config(_) => commands::load_config(&config_path, false).unwrap_or_default(),
        _ => commands::load_config(&config_path, cli.config.is_some())?,
    };

    let log_file = cli
        .log_file
        .clone()
        .unwrap_or_else(|| app_config.paths.log_file.clone());
    init_logging(cli.verbose, &log_file)?;

    match cli.command {
        Commands::Merge(args) => merge::run(args, &app_config).await,
        Commands::Process(args) => process::run(args, &app_config).await,
        Commands::Config(args) => config::run(args, &config_path).await,
        Commands::Issue(args) => issue::run(args).await,
    }
}

/// Send identical log records to stderr and to an append-only file.
fn init_logging(verbose: u8, log_file: &Path) -> anyhow::Result<()> {
    let level = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    if let Some(parent) = log_file.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    let file = OpenOptions::new().create(true).append(true).open(log_file)?;

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .with(
            fmt::layer()
                .with_target(false)
                .with_ansi(false)
                .with_writer(Mutex::new(file)),
        )
        .try_init()?;

    Ok(())
}
