//! Taxonomy registry.

use std::collections::HashSet;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use vibeopsy_types::{Category, Distribution, ScanError, ScanResult, ScoredResult};

/// The seven HAM10000 skin-lesion classes as `(code, name, malignant)`.
pub const SKIN_LESION_CATEGORIES: [(&str, &str, bool); 7] = [
    ("NV", "Melanocytic nevi", false),
    ("MEL", "Melanoma", true),
    ("BKL", "Benign keratosis", false),
    ("BCC", "Basal cell carcinoma", true),
    ("AKIEC", "Actinic keratoses", true),
    ("VASC", "Vascular lesions", false),
    ("DF", "Dermatofibroma", false),
];

/// Fixed, ordered catalog of categories.
///
/// Size and order are set at construction and never change; clones share the
/// same storage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Category>", into = "Vec<Category>")]
pub struct TaxonomyRegistry {
    categories: Arc<[Category]>,
}

impl TaxonomyRegistry {
    /// Build a registry, rejecting invalid or duplicate codes.
    ///
    /// An empty list is accepted; synthesis against it fails with
    /// [`ScanError::EmptyTaxonomy`].
    pub fn new(categories: Vec<Category>) -> ScanResult<Self> {
        let mut seen = HashSet::with_capacity(categories.len());
        for category in &categories {
            category.validate()?;
            if !seen.insert(category.code.as_str()) {
                return Err(ScanError::DuplicateCategory(category.code.clone()));
            }
        }
        Ok(Self {
            categories: categories.into(),
        })
    }

    pub fn empty() -> Self {
        Self {
            categories: Arc::from(Vec::new()),
        }
    }

    /// The default skin-lesion taxonomy.
    pub fn skin_lesions() -> Self {
        let categories: Vec<Category> = SKIN_LESION_CATEGORIES
            .iter()
            .map(|(code, name, malignant)| Category::new(*code, *name, *malignant))
            .collect();
        Self {
            categories: categories.into(),
        }
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    pub fn iter(&self) -> impl Iterator<Item = &Category> {
        self.categories.iter()
    }

    pub fn len(&self) -> usize {
        self.categories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Category> {
        self.categories.get(index)
    }

    pub fn lookup(&self, code: &str) -> ScanResult<&Category> {
        self.categories
            .iter()
            .find(|c| c.code == code)
            .ok_or_else(|| ScanError::NotFound(code.to_string()))
    }

    pub fn index_of(&self, code: &str) -> ScanResult<usize> {
        self.categories
            .iter()
            .position(|c| c.code == code)
            .ok_or_else(|| ScanError::NotFound(code.to_string()))
    }

    /// Resolve a label coming from outside (code or display name, any case).
    pub fn resolve_label(&self, label: &str) -> ScanResult<&Category> {
        self.categories
            .iter()
            .find(|c| c.matches_label(label))
            .ok_or_else(|| ScanError::NotFound(label.to_string()))
    }

    pub fn malignant(&self) -> impl Iterator<Item = &Category> {
        self.categories.iter().filter(|c| c.malignant)
    }

    /// Build a distribution in registry order from `(code, probability)` pairs.
    ///
    /// Every category must be scored exactly once and no unknown code may
    /// appear.
    pub fn distribution_from_scores<I, S>(&self, scores: I) -> ScanResult<Distribution>
    where
        I: IntoIterator<Item = (S, f64)>,
        S: AsRef<str>,
    {
        if self.is_empty() {
            return Err(ScanError::EmptyTaxonomy);
        }

        let mut slots: Vec<Option<f64>> = vec![None; self.len()];
        for (code, probability) in scores {
            let index = self.index_of(code.as_ref())?;
            if slots[index].replace(probability).is_some() {
                return Err(ScanError::InvariantViolation {
                    invariant: "coverage".into(),
                    detail: format!("category {} scored more than once", code.as_ref()),
                });
            }
        }

        let mut entries = Vec::with_capacity(self.len());
        for (category, slot) in self.categories.iter().zip(slots) {
            let probability = slot.ok_or_else(|| ScanError::InvariantViolation {
                invariant: "coverage".into(),
                detail: format!("category {} has no score", category.code),
            })?;
            entries.push(ScoredResult::new(category.code.clone(), probability));
        }

        Distribution::new(entries)
    }

    /// Check that `distribution` covers exactly this registry, in order.
    pub fn check_coverage(&self, distribution: &Distribution) -> ScanResult<()> {
        if distribution.len() != self.len() {
            return Err(ScanError::InvariantViolation {
                invariant: "coverage".into(),
                detail: format!(
                    "distribution has {} entries, taxonomy has {} categories",
                    distribution.len(),
                    self.len()
                ),
            });
        }
        for (category, entry) in self.categories.iter().zip(distribution.iter()) {
            if category.code != entry.category_code {
                return Err(ScanError::InvariantViolation {
                    invariant: "coverage".into(),
                    detail: format!(
                        "expected {} but found {}",
                        category.code, entry.category_code
                    ),
                });
            }
        }
        Ok(())
    }
}

impl Default for TaxonomyRegistry {
    fn default() -> Self {
        Self::skin_lesions()
    }
}

impl TryFrom<Vec<Category>> for TaxonomyRegistry {
    type Error = ScanError;

    fn try_from(categories: Vec<Category>) -> ScanResult<Self> {
        Self::new(categories)
    }
}

impl From<TaxonomyRegistry> for Vec<Category> {
    fn from(registry: TaxonomyRegistry) -> Self {
        registry.categories.to_vec()
    }
}
