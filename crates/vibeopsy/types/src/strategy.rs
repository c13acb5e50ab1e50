//! Synthesis strategies.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ScanError;

/// How a synthetic distribution is produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Strategy {
    /// Random winner with rank-based probability bands.
    #[default]
    TieredRandom,
    /// Reproducible pick derived from the artifact name's hash.
    DeterministicHash,
}

impl Strategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            Strategy::TieredRandom => "tiered-random",
            Strategy::DeterministicHash => "deterministic-hash",
        }
    }

    pub fn is_deterministic(&self) -> bool {
        matches!(self, Strategy::DeterministicHash)
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Strategy {
    type Err = ScanError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "tiered" | "tiered-random" | "random" => Ok(Strategy::TieredRandom),
            "hash" | "deterministic-hash" | "deterministic" => Ok(Strategy::DeterministicHash),
            other => Err(ScanError::InvalidConfig(format!(
                "unknown strategy '{}' (expected tiered-random or deterministic-hash)",
                other
            ))),
        }
    }
}
