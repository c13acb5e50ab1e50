//! List the diagnostic categories

use colored::Colorize;

use crate::config::ScanConfig;
use crate::error::CliResult;
use crate::output::{print_structured, OutputFormat};
use crate::render::lesion_table;

/// Execute the taxonomy command
pub fn execute(config: &ScanConfig, format: OutputFormat) -> CliResult<()> {
    let registry = config.registry()?;
    if print_structured(format, &registry)? {
        return Ok(());
    }

    print!("{}", lesion_table(&registry, None));
    println!();
    println!(
        "{}: {} of {} categories are malignant",
        "Note".bold(),
        registry.malignant().count(),
        registry.len()
    );
    Ok(())
}
