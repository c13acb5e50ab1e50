//! Output formatting for CLI

use clap::ValueEnum;
use serde::Serialize;

use crate::error::CliResult;

/// Output format for CLI commands
#[derive(Debug, Clone, Copy, ValueEnum, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable table format
    #[default]
    Table,
    /// JSON format
    Json,
    /// YAML format
    Yaml,
}

/// Print `value` as JSON or YAML. Returns `false` for [`OutputFormat::Table`],
/// leaving rendering to the caller.
pub fn print_structured<T: Serialize>(format: OutputFormat, value: &T) -> CliResult<bool> {
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(value)?),
        OutputFormat::Yaml => print!("{}", serde_yaml::to_string(value)?),
        OutputFormat::Table => return Ok(false),
    }
    Ok(true)
}
