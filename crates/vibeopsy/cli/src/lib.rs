//! Vibe-Opsy CLI - the kiosk front end on a terminal
//!
//! This CLI lets operators and developers:
//! - Scan an image and print the lesion table, headline diagnosis and receipt
//! - List the diagnostic categories
//! - Inspect what the deterministic-hash strategy derives from a file name
//! - Print the effective configuration

use std::ffi::OsString;
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;
mod config;
mod error;
mod output;
mod render;

use commands::{hash, scan, taxonomy};
pub use self::config::{ClassifierConfig, LoggingConfig, ScanConfig};
pub use error::{CliError, CliResult};
pub use output::OutputFormat;

/// Vibe-Opsy CLI application
#[derive(Parser)]
#[command(name = "vibeopsy")]
#[command(about = "Vibe-Opsy - synthetic skin-lesion scoring kiosk", long_about = None)]
#[command(version)]
struct Cli {
    /// Configuration file (TOML, YAML or JSON)
    #[arg(short, long, global = true, env = "VIBEOPSY_CONFIG")]
    config: Option<PathBuf>,

    /// Output format (table, json, yaml)
    #[arg(short, long, global = true, default_value = "table")]
    output: OutputFormat,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Available commands
#[derive(Subcommand)]
enum Commands {
    /// Scan an image file
    Scan(scan::ScanArgs),

    /// List the diagnostic categories
    Taxonomy,

    /// Show the hash-derived diagnosis for a file name
    Hash {
        /// File name to hash
        name: String,
    },

    /// Print the effective configuration
    Config,
}

/// Run using the current process arguments.
pub async fn run() -> CliResult<()> {
    run_with_args(std::env::args_os()).await
}

/// Run using the provided argument iterator.
pub async fn run_with_args<I, T>(args: I) -> CliResult<()>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let cli = Cli::parse_from(args);

    let config = ScanConfig::load(cli.config.as_deref())?;
    init_tracing(cli.verbose, &config.logging);
    config.validate()?;
    tracing::debug!(config = ?cli.config, "configuration loaded");

    match cli.command {
        Commands::Scan(args) => scan::execute(args, &config, cli.output).await,
        Commands::Taxonomy => taxonomy::execute(&config, cli.output),
        Commands::Hash { name } => hash::execute(&name, &config, cli.output),
        Commands::Config => show_config(&config, cli.output),
    }
}

fn init_tracing(verbose: bool, logging: &LoggingConfig) {
    let level = if verbose {
        "debug".to_string()
    } else {
        logging.level.clone()
    };
    let env_filter =
        tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| level.into());

    // Logs go to stderr so structured output on stdout stays parseable.
    let result = if logging.json {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .try_init()
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .without_time()
                    .with_writer(std::io::stderr),
            )
            .try_init()
    };
    if let Err(e) = result {
        eprintln!("tracing already initialised: {}", e);
    }
}

fn show_config(config: &ScanConfig, format: OutputFormat) -> CliResult<()> {
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(config)?),
        OutputFormat::Yaml | OutputFormat::Table => print!("{}", serde_yaml::to_string(config)?),
    }
    Ok(())
}
