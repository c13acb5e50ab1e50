//! Tunable constants for the synthetic strategies.
//!
//! The band limits are cosmetic: they make the output look like a
//! classifier, nothing more. All of them can be overridden from
//! configuration.

use serde::{Deserialize, Serialize};
use vibeopsy_types::{ScanError, ScanResult};

/// Closed interval `[low, high]` a probability is drawn from.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Band {
    pub low: f64,
    pub high: f64,
}

impl Band {
    pub const fn new(low: f64, high: f64) -> Self {
        Self { low, high }
    }

    pub fn contains(&self, value: f64) -> bool {
        value >= self.low && value <= self.high
    }

    fn validate(&self, name: &str) -> ScanResult<()> {
        if !self.low.is_finite() || !self.high.is_finite() {
            return Err(ScanError::InvalidConfig(format!("{} band is not finite", name)));
        }
        if self.low < 0.0 || self.high > 1.0 {
            return Err(ScanError::InvalidConfig(format!(
                "{} band [{}, {}] must lie within [0, 1]",
                name, self.low, self.high
            )));
        }
        if self.low > self.high {
            return Err(ScanError::InvalidConfig(format!(
                "{} band is inverted: low {} > high {}",
                name, self.low, self.high
            )));
        }
        Ok(())
    }
}

/// Rank-based bands for tiered-random synthesis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TierBands {
    /// Band for the designated winner (shuffle position 0).
    #[serde(default = "default_winner")]
    pub winner: Band,

    /// Band for contenders (positions 1..=contender_slots).
    #[serde(default = "default_contender")]
    pub contender: Band,

    /// Each contender is capped at this fraction of the remaining mass.
    #[serde(default = "default_contender_cap")]
    pub contender_cap: f64,

    /// Number of positions after the winner treated as contenders.
    #[serde(default = "default_contender_slots")]
    pub contender_slots: usize,

    /// Band for the tail.
    #[serde(default = "default_tail")]
    pub tail: Band,

    /// Each tail entry is capped at this fraction of the remaining mass.
    #[serde(default = "default_tail_cap")]
    pub tail_cap: f64,
}

impl Default for TierBands {
    fn default() -> Self {
        Self {
            winner: default_winner(),
            contender: default_contender(),
            contender_cap: default_contender_cap(),
            contender_slots: default_contender_slots(),
            tail: default_tail(),
            tail_cap: default_tail_cap(),
        }
    }
}

impl TierBands {
    pub fn validate(&self) -> ScanResult<()> {
        self.winner.validate("winner")?;
        self.contender.validate("contender")?;
        self.tail.validate("tail")?;
        validate_fraction("contender_cap", self.contender_cap)?;
        validate_fraction("tail_cap", self.tail_cap)?;
        Ok(())
    }
}

/// Confidence derivation for deterministic-hash synthesis.
///
/// Confidence in percent is `base + hash % span`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HashConfidence {
    #[serde(default = "default_hash_base")]
    pub base: u32,

    #[serde(default = "default_hash_span")]
    pub span: u32,

    /// Fraction of the leftover mass spread evenly over the other categories.
    #[serde(default = "default_residual_share")]
    pub residual_share: f64,
}

impl Default for HashConfidence {
    fn default() -> Self {
        Self {
            base: default_hash_base(),
            span: default_hash_span(),
            residual_share: default_residual_share(),
        }
    }
}

impl HashConfidence {
    pub fn validate(&self) -> ScanResult<()> {
        if self.span == 0 {
            return Err(ScanError::InvalidConfig("hash span must be at least 1".into()));
        }
        // A zero confidence would tie the primary with every other category.
        if self.base == 0 {
            return Err(ScanError::InvalidConfig(
                "hash confidence base must be at least 1%".into(),
            ));
        }
        let max = u64::from(self.base) + u64::from(self.span) - 1;
        if max > 100 {
            return Err(ScanError::InvalidConfig(format!(
                "hash confidence can reach {}%, which exceeds 100%",
                max
            )));
        }
        validate_fraction("residual_share", self.residual_share)
    }

    /// Confidence in percent for a given hash.
    pub fn percent(&self, hash: u32) -> u32 {
        self.base + hash % self.span.max(1)
    }
}

/// Complete configuration of the synthesizer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SynthesisConfig {
    #[serde(default)]
    pub tiers: TierBands,

    #[serde(default)]
    pub hash: HashConfidence,
}

impl SynthesisConfig {
    pub fn validate(&self) -> ScanResult<()> {
        self.tiers.validate()?;
        self.hash.validate()
    }
}

fn validate_fraction(name: &str, value: f64) -> ScanResult<()> {
    if !(0.0..=1.0).contains(&value) {
        return Err(ScanError::InvalidConfig(format!(
            "{} must be within [0, 1], got {}",
            name, value
        )));
    }
    Ok(())
}

// Default value helpers
fn default_winner() -> Band {
    Band::new(0.40, 0.75)
}

fn default_contender() -> Band {
    Band::new(0.0, 0.20)
}

fn default_contender_cap() -> f64 {
    0.5
}

fn default_contender_slots() -> usize {
    2
}

fn default_tail() -> Band {
    Band::new(0.0, 0.08)
}

fn default_tail_cap() -> f64 {
    0.3
}

fn default_hash_base() -> u32 {
    72
}

fn default_hash_span() -> u32 {
    21
}

fn default_residual_share() -> f64 {
    0.5
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = SynthesisConfig::default();
        config.validate().unwrap();
        assert_eq!(config.tiers.winner, Band::new(0.40, 0.75));
        assert_eq!(config.tiers.contender_slots, 2);
        assert_eq!(config.hash.base, 72);
        assert_eq!(config.hash.span, 21);
    }

    #[test]
    fn inverted_band_is_rejected() {
        let mut tiers = TierBands::default();
        tiers.winner = Band::new(0.8, 0.4);
        let err = tiers.validate().unwrap_err();
        assert!(err.to_string().contains("inverted"));
    }

    #[test]
    fn band_outside_unit_interval_is_rejected() {
        let mut tiers = TierBands::default();
        tiers.tail = Band::new(0.0, 1.5);
        assert!(tiers.validate().is_err());

        let mut tiers = TierBands::default();
        tiers.tail_cap = -0.1;
        assert!(tiers.validate().is_err());
    }

    #[test]
    fn hash_confidence_bounds() {
        let zero_span = HashConfidence {
            span: 0,
            ..HashConfidence::default()
        };
        assert!(zero_span.validate().is_err());

        let zero_base = HashConfidence {
            base: 0,
            span: 1,
            ..HashConfidence::default()
        };
        assert!(zero_base.validate().is_err());

        let too_high = HashConfidence {
            base: 90,
            span: 20,
            ..HashConfidence::default()
        };
        assert!(too_high.validate().is_err());

        let full = HashConfidence {
            base: 80,
            span: 21,
            ..HashConfidence::default()
        };
        assert!(full.validate().is_ok());
    }

    #[test]
    fn percent_uses_modulo_span() {
        let hash = HashConfidence::default();
        assert_eq!(hash.percent(0), 72);
        assert_eq!(hash.percent(20), 92);
        assert_eq!(hash.percent(21), 72);
    }

    #[test]
    fn partial_config_falls_back_to_defaults() {
        let config: SynthesisConfig =
            serde_json::from_str(r#"{"tiers":{"winner":{"low":0.5,"high":0.9}}}"#).unwrap();
        assert_eq!(config.tiers.winner, Band::new(0.5, 0.9));
        assert_eq!(config.tiers.tail, Band::new(0.0, 0.08));
        assert_eq!(config.hash, HashConfidence::default());
    }
}
