//! Primary selection and ranking.

use serde::Serialize;
use vibeopsy_taxonomy::TaxonomyRegistry;
use vibeopsy_types::{Category, Distribution, ScanError, ScanResult};

/// One row of a ranked distribution.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Ranked<'a> {
    pub rank: usize,
    pub category: &'a Category,
    pub probability: f64,
}

/// Pair every registry category with its probability, in registry order.
fn scored<'a>(
    registry: &'a TaxonomyRegistry,
    distribution: &Distribution,
) -> ScanResult<Vec<(&'a Category, f64)>> {
    if registry.is_empty() {
        return Err(ScanError::EmptyTaxonomy);
    }
    if distribution.len() != registry.len() {
        return Err(ScanError::InvariantViolation {
            invariant: "coverage".into(),
            detail: format!(
                "distribution has {} entries, taxonomy has {} categories",
                distribution.len(),
                registry.len()
            ),
        });
    }
    registry
        .iter()
        .map(|category| {
            distribution
                .probability_of(&category.code)
                .map(|p| (category, p))
                .ok_or_else(|| ScanError::NotFound(category.code.clone()))
        })
        .collect()
}

/// The primary category: highest probability, exact ties broken by earliest
/// registry order.
pub fn primary<'a>(
    registry: &'a TaxonomyRegistry,
    distribution: &Distribution,
) -> ScanResult<(&'a Category, f64)> {
    let mut best: Option<(&Category, f64)> = None;
    for (category, probability) in scored(registry, distribution)? {
        match best {
            Some((_, top)) if probability <= top => {}
            _ => best = Some((category, probability)),
        }
    }
    best.ok_or(ScanError::EmptyTaxonomy)
}

/// All categories by descending probability; ties keep registry order.
pub fn ranked<'a>(
    registry: &'a TaxonomyRegistry,
    distribution: &Distribution,
) -> ScanResult<Vec<Ranked<'a>>> {
    let mut rows = scored(registry, distribution)?;
    // sort_by is stable, so equal probabilities stay in registry order
    rows.sort_by(|a, b| b.1.total_cmp(&a.1));
    Ok(rows
        .into_iter()
        .enumerate()
        .map(|(i, (category, probability))| Ranked {
            rank: i + 1,
            category,
            probability,
        })
        .collect())
}
