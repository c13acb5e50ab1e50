//! Scored results and the distributions they form.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::error::{ScanError, ScanResult};

/// Tolerance applied to the sum bound to absorb floating-point drift.
pub const SUM_EPSILON: f64 = 1e-9;

/// Probability assigned to one category in one synthesis call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredResult {
    pub category_code: String,
    pub probability: f64,
}

impl ScoredResult {
    pub fn new(category_code: impl Into<String>, probability: f64) -> Self {
        Self {
            category_code: category_code.into(),
            probability,
        }
    }
}

/// A complete assignment of probability to every category of a taxonomy.
///
/// Entries are kept in taxonomy order, so "earliest entry" and "earliest
/// registry order" are the same thing. Coverage against a concrete registry
/// is checked by the registry itself; this type only enforces what it can
/// see on its own:
///
/// - at least one entry, no duplicate codes
/// - every probability is finite and in `[0, 1]`
/// - the sum of probabilities is at most `1 + SUM_EPSILON`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawDistribution")]
pub struct Distribution {
    entries: Vec<ScoredResult>,
}

#[derive(Deserialize)]
struct RawDistribution {
    entries: Vec<ScoredResult>,
}

impl TryFrom<RawDistribution> for Distribution {
    type Error = ScanError;

    fn try_from(raw: RawDistribution) -> ScanResult<Self> {
        Distribution::new(raw.entries)
    }
}

impl Distribution {
    /// Build a distribution from entries already in taxonomy order.
    pub fn new(entries: Vec<ScoredResult>) -> ScanResult<Self> {
        if entries.is_empty() {
            return Err(ScanError::EmptyTaxonomy);
        }

        let mut seen = HashSet::with_capacity(entries.len());
        let mut total = 0.0;
        for entry in &entries {
            if !seen.insert(entry.category_code.as_str()) {
                return Err(ScanError::invariant(
                    "coverage",
                    format!("category {} scored more than once", entry.category_code),
                ));
            }
            if !entry.probability.is_finite() || !(0.0..=1.0).contains(&entry.probability) {
                return Err(ScanError::invariant(
                    "bounds",
                    format!(
                        "probability {} for {} is outside [0, 1]",
                        entry.probability, entry.category_code
                    ),
                ));
            }
            total += entry.probability;
        }

        if total > 1.0 + SUM_EPSILON {
            return Err(ScanError::invariant(
                "sum-bound",
                format!("probabilities sum to {}, which exceeds 1", total),
            ));
        }

        Ok(Self { entries })
    }

    pub fn entries(&self) -> &[ScoredResult] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ScoredResult> {
        self.entries.iter()
    }

    /// Probability assigned to `code`, if the distribution covers it.
    pub fn probability_of(&self, code: &str) -> Option<f64> {
        self.entries
            .iter()
            .find(|e| e.category_code == code)
            .map(|e| e.probability)
    }

    /// Sum of all assigned probabilities.
    pub fn total_mass(&self) -> f64 {
        self.entries.iter().map(|e| e.probability).sum()
    }

    /// Mass left unassigned ("uncertainty"), never negative.
    pub fn residual_mass(&self) -> f64 {
        (1.0 - self.total_mass()).max(0.0)
    }

    /// Entry with the highest probability. Exact ties go to the earliest entry.
    pub fn primary_entry(&self) -> &ScoredResult {
        let mut best = &self.entries[0];
        for entry in &self.entries[1..] {
            if entry.probability > best.probability {
                best = entry;
            }
        }
        best
    }

    /// Position of the primary entry in taxonomy order.
    pub fn primary_index(&self) -> usize {
        let primary = self.primary_entry();
        self.entries
            .iter()
            .position(|e| std::ptr::eq(e, primary))
            .unwrap_or(0)
    }
}

impl<'a> IntoIterator for &'a Distribution {
    type Item = &'a ScoredResult;
    type IntoIter = std::slice::Iter<'a, ScoredResult>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
