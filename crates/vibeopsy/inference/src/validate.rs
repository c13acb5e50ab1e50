//! Validation of inference payloads against the taxonomy.
//!
//! A payload is only turned into a [`Distribution`] when it satisfies the
//! same invariants the synthetic engine guarantees. Anything else becomes
//! [`ScanError::ClassificationUnavailable`]; there is no fallback.

use tracing::warn;
use vibeopsy_engine::Prediction;
use vibeopsy_taxonomy::TaxonomyRegistry;
use vibeopsy_types::{Distribution, ScanError, ScanResult};

/// Whether the payload's probabilities are percentages rather than fractions.
///
/// The endpoint reports `confidence` on a 0-100 scale; probabilities are
/// read on that scale as soon as any of them exceeds 1.
pub fn uses_percent_scale(prediction: &Prediction) -> bool {
    prediction.probabilities.values().any(|p| *p > 1.0)
}

/// Convert a payload into a distribution over `registry`.
pub fn into_distribution(
    registry: &TaxonomyRegistry,
    prediction: &Prediction,
) -> ScanResult<Distribution> {
    check(registry, prediction).map_err(|e| {
        warn!(error = %e, diagnosis = %prediction.diagnosis, "inference payload rejected");
        match e {
            ScanError::ClassificationUnavailable(_) | ScanError::EmptyTaxonomy => e,
            other => ScanError::ClassificationUnavailable(format!("invalid payload: {}", other)),
        }
    })
}

fn check(registry: &TaxonomyRegistry, prediction: &Prediction) -> ScanResult<Distribution> {
    if registry.is_empty() {
        return Err(ScanError::EmptyTaxonomy);
    }

    let confidence = prediction.confidence_fraction();
    if !confidence.is_finite() || !(0.0..=1.0).contains(&confidence) {
        return Err(ScanError::ClassificationUnavailable(format!(
            "confidence {} is outside 0-100",
            prediction.confidence
        )));
    }

    let predicted = registry.get(prediction.predicted_class).ok_or_else(|| {
        ScanError::ClassificationUnavailable(format!(
            "predicted_class {} does not index a taxonomy of {} categories",
            prediction.predicted_class,
            registry.len()
        ))
    })?;

    let scale = if uses_percent_scale(prediction) { 100.0 } else { 1.0 };
    let mut scores = Vec::with_capacity(prediction.probabilities.len());
    for (label, value) in &prediction.probabilities {
        if !value.is_finite() || *value < 0.0 {
            return Err(ScanError::ClassificationUnavailable(format!(
                "probability for '{}' is not a non-negative number",
                label
            )));
        }
        let category = registry.resolve_label(label)?;
        scores.push((category.code.clone(), value / scale));
    }

    let distribution = registry.distribution_from_scores(scores)?;

    let primary = distribution.primary_entry();
    if primary.category_code != predicted.code {
        warn!(
            predicted = %predicted.code,
            argmax = %primary.category_code,
            "predicted_class disagrees with the highest probability"
        );
    }
    Ok(distribution)
}
