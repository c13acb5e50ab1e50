//! Tiered-random synthesis.
//!
//! A shuffled permutation picks the winner; probabilities are then drawn
//! position by position from rank-based bands, each draw clamped to the
//! mass still unassigned.

use rand::seq::SliceRandom;
use rand::Rng;
use vibeopsy_taxonomy::TaxonomyRegistry;
use vibeopsy_types::{Distribution, ScanError, ScanResult, ScoredResult};

use crate::config::{Band, TierBands};

/// Tier a shuffle position falls into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tier {
    Winner,
    Contender,
    Tail,
}

impl Tier {
    pub fn for_position(position: usize, bands: &TierBands) -> Self {
        match position {
            0 => Tier::Winner,
            p if p <= bands.contender_slots => Tier::Contender,
            _ => Tier::Tail,
        }
    }
}

fn sample<R: Rng>(band: &Band, rng: &mut R) -> f64 {
    rng.gen_range(band.low..=band.high)
}

/// Draw one probability for `tier`, before clamping to the remaining mass.
fn draw<R: Rng>(tier: Tier, bands: &TierBands, remaining: f64, rng: &mut R) -> f64 {
    match tier {
        Tier::Winner => sample(&bands.winner, rng),
        Tier::Contender => (remaining * bands.contender_cap).min(sample(&bands.contender, rng)),
        Tier::Tail => (remaining * bands.tail_cap).min(sample(&bands.tail, rng)),
    }
}

/// Produce a tiered-random distribution over `registry`.
pub fn synthesize<R: Rng>(
    registry: &TaxonomyRegistry,
    bands: &TierBands,
    rng: &mut R,
) -> ScanResult<Distribution> {
    if registry.is_empty() {
        return Err(ScanError::EmptyTaxonomy);
    }
    bands.validate()?;

    let mut order: Vec<usize> = (0..registry.len()).collect();
    order.shuffle(rng);

    let mut scores = vec![0.0; registry.len()];
    let mut remaining = 1.0_f64;
    for (position, &index) in order.iter().enumerate() {
        let tier = Tier::for_position(position, bands);
        let probability = draw(tier, bands, remaining, rng).clamp(0.0, remaining);
        remaining = (remaining - probability).max(0.0);
        scores[index] = probability;
    }

    let entries = registry
        .iter()
        .zip(scores)
        .map(|(category, probability)| ScoredResult::new(category.code.clone(), probability))
        .collect();
    Distribution::new(entries)
}
