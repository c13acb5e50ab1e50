//! Show what the deterministic-hash strategy derives from a file name

use colored::Colorize;
use serde::Serialize;
use vibeopsy_engine::hash;
use vibeopsy_types::ScanError;

use crate::config::ScanConfig;
use crate::error::CliResult;
use crate::output::{print_structured, OutputFormat};

#[derive(Serialize)]
struct HashReport<'a> {
    identifier: &'a str,
    hash: u32,
    primary_index: usize,
    code: &'a str,
    name: &'a str,
    malignant: bool,
    confidence_percent: u32,
}

/// Execute the hash command
pub fn execute(identifier: &str, config: &ScanConfig, format: OutputFormat) -> CliResult<()> {
    let registry = config.registry()?;
    let pick = hash::pick(&registry, &config.engine.hash, identifier)?;
    let category = registry
        .get(pick.primary_index)
        .ok_or_else(|| ScanError::NotFound(format!("index {}", pick.primary_index)))?;

    let report = HashReport {
        identifier,
        hash: pick.hash,
        primary_index: pick.primary_index,
        code: &category.code,
        name: &category.name,
        malignant: category.malignant,
        confidence_percent: pick.confidence_percent,
    };
    if print_structured(format, &report)? {
        return Ok(());
    }

    println!("{:<12}{}", "IDENTIFIER".bold(), identifier);
    println!("{:<12}{}", "HASH".bold(), pick.hash);
    println!(
        "{:<12}{} [index {}]",
        "PRIMARY".bold(),
        category,
        pick.primary_index
    );
    println!("{:<12}{}%", "CONFIDENCE".bold(), pick.confidence_percent);
    Ok(())
}
