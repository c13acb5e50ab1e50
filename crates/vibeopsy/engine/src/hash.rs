//! Deterministic-hash synthesis.
//!
//! The identifier hash is the classic `h * 31 + unit` rolling hash over
//! UTF-16 code units with 32-bit signed wraparound, followed by an absolute
//! value. `i32::MIN` maps to `2147483648`, hence the `u32` result.

use serde::{Deserialize, Serialize};
use vibeopsy_taxonomy::TaxonomyRegistry;
use vibeopsy_types::{Distribution, ScanError, ScanResult, ScoredResult};

use crate::config::HashConfidence;

/// Rolling hash of an artifact identifier.
pub fn identifier_hash(input: &str) -> u32 {
    let mut hash: i32 = 0;
    for unit in input.encode_utf16() {
        hash = hash
            .wrapping_shl(5)
            .wrapping_sub(hash)
            .wrapping_add(i32::from(unit));
    }
    hash.unsigned_abs()
}

/// Everything the hash decides for one identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HashPick {
    pub hash: u32,
    pub primary_index: usize,
    pub confidence_percent: u32,
}

impl HashPick {
    pub fn confidence(&self) -> f64 {
        f64::from(self.confidence_percent) / 100.0
    }
}

/// Derive the primary category index and confidence for `identifier`.
pub fn pick(
    registry: &TaxonomyRegistry,
    confidence: &HashConfidence,
    identifier: &str,
) -> ScanResult<HashPick> {
    if registry.is_empty() {
        return Err(ScanError::EmptyTaxonomy);
    }
    confidence.validate()?;
    let hash = identifier_hash(identifier);
    // usize is at least 32 bits on every supported target.
    let primary_index = hash as usize % registry.len();
    Ok(HashPick {
        hash,
        primary_index,
        confidence_percent: confidence.percent(hash),
    })
}

/// Produce a deterministic distribution for `identifier`.
pub fn synthesize(
    registry: &TaxonomyRegistry,
    confidence: &HashConfidence,
    identifier: &str,
) -> ScanResult<Distribution> {
    let pick = pick(registry, confidence, identifier)?;
    let primary = pick.confidence().min(1.0);

    let others = registry.len() - 1;
    let mut residual = if others == 0 {
        0.0
    } else {
        (1.0 - primary) * confidence.residual_share / others as f64
    };
    if residual >= primary {
        residual = 0.0;
    }

    let entries = registry
        .iter()
        .enumerate()
        .map(|(index, category)| {
            let probability = if index == pick.primary_index {
                primary
            } else {
                residual
            };
            ScoredResult::new(category.code.clone(), probability)
        })
        .collect();
    Distribution::new(entries)
}

#[cfg(test)]
mod tests {
    use super::*;
    use vibeopsy_types::Category;

    #[test]
    fn hash_golden_values() {
        assert_eq!(identifier_hash(""), 0);
        assert_eq!(identifier_hash("a"), 97);
        assert_eq!(identifier_hash("sample.jpg"), 142_022_045);
        assert_eq!(identifier_hash("lesion.png"), 1_373_660_183);
        assert_eq!(identifier_hash("IMG_0001.JPG"), 2_051_680_624);
    }

    #[test]
    fn hash_uses_utf16_code_units() {
        // The emoji is a surrogate pair: two units, not one code point.
        assert_eq!(identifier_hash("mole-\u{1F600}.png"), 1_572_625_040);
    }

    #[test]
    fn pick_for_sample_jpg() {
        let registry = TaxonomyRegistry::skin_lesions();
        let pick = pick(&registry, &HashConfidence::default(), "sample.jpg").unwrap();
        assert_eq!(pick.primary_index, 4);
        assert_eq!(pick.confidence_percent, 83);
        assert_eq!(registry.get(pick.primary_index).unwrap().code, "AKIEC");
    }

    #[test]
    fn distribution_for_sample_jpg() {
        let registry = TaxonomyRegistry::skin_lesions();
        let d = synthesize(&registry, &HashConfidence::default(), "sample.jpg").unwrap();
        assert_eq!(d.primary_entry().category_code, "AKIEC");
        assert!((d.primary_entry().probability - 0.83).abs() < 1e-12);

        let residual = (1.0 - 0.83) * 0.5 / 6.0;
        for entry in d.iter().filter(|e| e.category_code != "AKIEC") {
            assert!((entry.probability - residual).abs() < 1e-12);
        }
        assert!(d.total_mass() <= 1.0);
    }

    #[test]
    fn zero_residual_share_leaves_others_at_zero() {
        let registry = TaxonomyRegistry::skin_lesions();
        let confidence = HashConfidence {
            residual_share: 0.0,
            ..HashConfidence::default()
        };
        let d = synthesize(&registry, &confidence, "lesion.png").unwrap();
        assert_eq!(d.primary_entry().category_code, "NV");
        assert_eq!(d.iter().filter(|e| e.probability == 0.0).count(), 6);
    }

    #[test]
    fn residual_never_overtakes_primary() {
        let registry = TaxonomyRegistry::new(vec![
            Category::benign("NV", "Melanocytic nevi"),
            Category::malignant("MEL", "Melanoma"),
        ])
        .unwrap();
        let confidence = HashConfidence {
            base: 10,
            span: 1,
            residual_share: 1.0,
        };
        let d = synthesize(&registry, &confidence, "a").unwrap();
        // hash 97 -> index 1, confidence 10%, residual would be 90%
        assert_eq!(d.primary_entry().category_code, "MEL");
        assert_eq!(d.probability_of("NV"), Some(0.0));
    }

    #[test]
    fn single_category_takes_the_confidence() {
        let registry =
            TaxonomyRegistry::new(vec![Category::malignant("MEL", "Melanoma")]).unwrap();
        let d = synthesize(&registry, &HashConfidence::default(), "anything.jpg").unwrap();
        assert_eq!(d.len(), 1);
        assert!(d.primary_entry().probability >= 0.72);
    }

    #[test]
    fn empty_registry_fails() {
        let err = synthesize(&TaxonomyRegistry::empty(), &HashConfidence::default(), "x")
            .unwrap_err();
        assert_eq!(err, ScanError::EmptyTaxonomy);
    }

    #[test]
    fn zero_confidence_is_rejected_before_synthesis() {
        let registry = TaxonomyRegistry::skin_lesions();
        let confidence = HashConfidence {
            base: 0,
            span: 1,
            residual_share: 0.5,
        };
        let err = synthesize(&registry, &confidence, "sample.jpg").unwrap_err();
        assert!(matches!(err, ScanError::InvalidConfig(_)));
        assert!(pick(&registry, &confidence, "sample.jpg").is_err());
    }

    #[test]
    fn lowest_confidence_keeps_the_picked_primary() {
        let registry = TaxonomyRegistry::skin_lesions();
        let confidence = HashConfidence {
            base: 1,
            span: 1,
            residual_share: 1.0,
        };
        let picked = pick(&registry, &confidence, "sample.jpg").unwrap();
        let d = synthesize(&registry, &confidence, "sample.jpg").unwrap();
        assert_eq!(d.primary_index(), picked.primary_index);
        assert_eq!(d.primary_entry().category_code, "AKIEC");
        let primary = d.primary_entry().probability;
        assert!(d
            .iter()
            .filter(|e| e.category_code != "AKIEC")
            .all(|e| e.probability < primary));
    }
}
