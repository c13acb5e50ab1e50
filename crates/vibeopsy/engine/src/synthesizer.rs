//! Distribution synthesizer.

use rand::Rng;
use tracing::debug;
use vibeopsy_taxonomy::TaxonomyRegistry;
use vibeopsy_types::{Category, Distribution, ScanResult, Strategy};

use crate::config::SynthesisConfig;
use crate::{hash, ranking, tiered};

/// Produces synthetic distributions over one taxonomy.
///
/// Stateless apart from its immutable registry and configuration, so a
/// single instance can serve any number of concurrent callers. Randomness is
/// always supplied by the caller.
#[derive(Debug, Clone)]
pub struct Synthesizer {
    registry: TaxonomyRegistry,
    config: SynthesisConfig,
}

impl Synthesizer {
    /// Create a synthesizer, rejecting invalid band configuration.
    pub fn new(registry: TaxonomyRegistry, config: SynthesisConfig) -> ScanResult<Self> {
        config.validate()?;
        Ok(Self { registry, config })
    }

    /// Skin-lesion taxonomy with default bands.
    pub fn with_defaults() -> Self {
        Self {
            registry: TaxonomyRegistry::skin_lesions(),
            config: SynthesisConfig::default(),
        }
    }

    pub fn registry(&self) -> &TaxonomyRegistry {
        &self.registry
    }

    pub fn config(&self) -> &SynthesisConfig {
        &self.config
    }

    /// Synthesize a distribution for `identifier` with `strategy`.
    ///
    /// `rng` is only consulted by [`Strategy::TieredRandom`].
    ///
    /// # Errors
    /// - [`ScanError::EmptyTaxonomy`](vibeopsy_types::ScanError::EmptyTaxonomy)
    ///   when the registry has no categories.
    pub fn synthesize<R: Rng>(
        &self,
        identifier: &str,
        strategy: Strategy,
        rng: &mut R,
    ) -> ScanResult<Distribution> {
        let distribution = match strategy {
            Strategy::TieredRandom => tiered::synthesize(&self.registry, &self.config.tiers, rng)?,
            Strategy::DeterministicHash => {
                hash::synthesize(&self.registry, &self.config.hash, identifier)?
            }
        };

        debug!(
            %strategy,
            identifier,
            primary = %distribution.primary_entry().category_code,
            total_mass = distribution.total_mass(),
            "distribution synthesized"
        );
        Ok(distribution)
    }

    /// Deterministic-hash synthesis, which needs no random source.
    pub fn synthesize_deterministic(&self, identifier: &str) -> ScanResult<Distribution> {
        let distribution = hash::synthesize(&self.registry, &self.config.hash, identifier)?;
        debug!(
            identifier,
            primary = %distribution.primary_entry().category_code,
            "deterministic distribution synthesized"
        );
        Ok(distribution)
    }

    /// Primary category of a distribution produced against this registry.
    pub fn primary<'a>(&'a self, distribution: &Distribution) -> ScanResult<(&'a Category, f64)> {
        ranking::primary(&self.registry, distribution)
    }
}

impl Default for Synthesizer {
    fn default() -> Self {
        Self::with_defaults()
    }
}
