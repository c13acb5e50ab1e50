//! Inference-style summary of a distribution.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use vibeopsy_taxonomy::TaxonomyRegistry;
use vibeopsy_types::{Distribution, ScanResult};

use crate::ranking;

/// The payload shape a real inference endpoint returns.
///
/// `confidence` is a percentage (0-100); `probabilities` maps a category
/// label to its score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    pub predicted_class: usize,
    pub diagnosis: String,
    pub confidence: f64,
    pub is_cancer: bool,
    pub probabilities: BTreeMap<String, f64>,
}

impl Prediction {
    /// Summarize a distribution the way the inference endpoint would.
    ///
    /// Probabilities are keyed by display name and kept as fractions.
    pub fn from_distribution(
        registry: &TaxonomyRegistry,
        distribution: &Distribution,
    ) -> ScanResult<Self> {
        let (category, probability) = ranking::primary(registry, distribution)?;
        let predicted_class = registry.index_of(&category.code)?;
        let mut probabilities = BTreeMap::new();
        for entry in distribution {
            let name = registry.lookup(&entry.category_code)?.name.clone();
            probabilities.insert(name, entry.probability);
        }
        Ok(Self {
            predicted_class,
            diagnosis: category.name.clone(),
            confidence: probability * 100.0,
            is_cancer: category.malignant,
            probabilities,
        })
    }

    /// Confidence as a fraction in `[0, 1]`.
    pub fn confidence_fraction(&self) -> f64 {
        self.confidence / 100.0
    }
}
