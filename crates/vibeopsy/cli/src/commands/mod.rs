//! Subcommand implementations

pub mod hash;
pub mod scan;
pub mod taxonomy;
