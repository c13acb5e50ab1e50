//! Property tests: every synthesized distribution covers the taxonomy exactly
//! once, keeps each probability in [0, 1] and never assigns more than a total
//! mass of 1, whatever the seed, identifier or taxonomy.

use std::collections::HashSet;

use proptest::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;
use vibeopsy_engine::{
    ranking, tiered, Band, Category, Distribution, ScanError, Strategy as ScanStrategy,
    SynthesisConfig, Synthesizer, TaxonomyRegistry, TierBands,
};

const EPSILON: f64 = 1e-9;

// ---------------------------------------------------------------------------
// Helpers / Strategies
// ---------------------------------------------------------------------------

/// Generate a taxonomy of 1..=9 categories with unique codes.
fn arb_registry() -> impl Strategy<Value = TaxonomyRegistry> {
    prop::collection::vec(any::<bool>(), 1..=9).prop_map(|flags| {
        let categories = flags
            .into_iter()
            .enumerate()
            .map(|(i, malignant)| Category::new(format!("C{}", i), format!("Category {}", i), malignant))
            .collect();
        TaxonomyRegistry::new(categories).expect("unique codes")
    })
}

/// Generate a plausible uploaded file name, including non-ASCII ones.
fn arb_file_name() -> impl Strategy<Value = String> {
    prop_oneof![
        "[a-zA-Z0-9_-]{1,24}\\.(jpg|jpeg|png)",
        "\\PC{0,32}",
    ]
}

fn arb_strategy() -> impl Strategy<Value = ScanStrategy> {
    prop_oneof![
        Just(ScanStrategy::TieredRandom),
        Just(ScanStrategy::DeterministicHash),
    ]
}

fn assert_invariants(registry: &TaxonomyRegistry, d: &Distribution) -> Result<(), TestCaseError> {
    registry
        .check_coverage(d)
        .map_err(|e| TestCaseError::fail(e.to_string()))?;

    let codes: HashSet<_> = d.iter().map(|e| e.category_code.as_str()).collect();
    prop_assert_eq!(codes.len(), registry.len());

    for entry in d.iter() {
        prop_assert!((0.0..=1.0).contains(&entry.probability));
    }
    prop_assert!(d.total_mass() <= 1.0 + EPSILON);
    Ok(())
}

// ---------------------------------------------------------------------------
// Property Tests
// ---------------------------------------------------------------------------

proptest! {
    /// Both strategies satisfy coverage, bounds and the sum bound.
    #[test]
    fn synthesized_distributions_hold_invariants(
        registry in arb_registry(),
        name in arb_file_name(),
        strategy in arb_strategy(),
        seed in any::<u64>(),
    ) {
        let synth = Synthesizer::new(registry.clone(), SynthesisConfig::default()).unwrap();
        let mut rng = StdRng::seed_from_u64(seed);
        let d = synth.synthesize(&name, strategy, &mut rng).unwrap();
        assert_invariants(&registry, &d)?;
    }

    /// The primary returned by ranking is the maximum and the earliest among equals.
    #[test]
    fn primary_is_earliest_maximum(
        registry in arb_registry(),
        name in arb_file_name(),
        seed in any::<u64>(),
    ) {
        let synth = Synthesizer::new(registry.clone(), SynthesisConfig::default()).unwrap();
        let mut rng = StdRng::seed_from_u64(seed);
        let d = synth.synthesize(&name, ScanStrategy::TieredRandom, &mut rng).unwrap();
        let (category, probability) = ranking::primary(&registry, &d).unwrap();

        let max = d.iter().map(|e| e.probability).fold(0.0_f64, f64::max);
        prop_assert_eq!(probability, max);
        let first_max = d.iter().position(|e| e.probability == max).unwrap();
        prop_assert_eq!(&registry.categories()[first_max], category);
    }

    /// Tiered-random with default bands: the winner sits in the winner band
    /// and nobody else reaches it.
    #[test]
    fn tiered_winner_dominates(registry in arb_registry(), seed in any::<u64>()) {
        let bands = TierBands::default();
        let mut rng = StdRng::seed_from_u64(seed);
        let d = tiered::synthesize(&registry, &bands, &mut rng).unwrap();
        let primary = d.primary_entry().probability;
        prop_assert!(bands.winner.contains(primary));
        prop_assert_eq!(d.iter().filter(|e| e.probability >= bands.winner.low).count(), 1);
    }

    /// Deterministic-hash output depends only on the identifier.
    #[test]
    fn hash_strategy_is_reproducible(name in arb_file_name(), a in any::<u64>(), b in any::<u64>()) {
        let synth = Synthesizer::with_defaults();
        let first = synth
            .synthesize(&name, ScanStrategy::DeterministicHash, &mut StdRng::seed_from_u64(a))
            .unwrap();
        let second = synth
            .synthesize(&name, ScanStrategy::DeterministicHash, &mut StdRng::seed_from_u64(b))
            .unwrap();
        prop_assert_eq!(first, second);
    }

    /// Custom but valid bands still never break the sum bound.
    #[test]
    fn custom_bands_respect_sum_bound(
        winner_low in 0.0..=1.0f64,
        winner_width in 0.0..=1.0f64,
        contender_high in 0.0..=1.0f64,
        tail_high in 0.0..=1.0f64,
        contender_cap in 0.0..=1.0f64,
        tail_cap in 0.0..=1.0f64,
        contender_slots in 0usize..5,
        seed in any::<u64>(),
    ) {
        let bands = TierBands {
            winner: Band::new(winner_low, (winner_low + winner_width).min(1.0)),
            contender: Band::new(0.0, contender_high),
            contender_cap,
            contender_slots,
            tail: Band::new(0.0, tail_high),
            tail_cap,
        };
        prop_assume!(bands.validate().is_ok());
        let registry = TaxonomyRegistry::skin_lesions();
        let d = tiered::synthesize(&registry, &bands, &mut StdRng::seed_from_u64(seed)).unwrap();
        assert_invariants(&registry, &d)?;
    }
}

// ---------------------------------------------------------------------------
// Scenario Tests
// ---------------------------------------------------------------------------

#[test]
fn three_category_end_to_end() {
    let registry = TaxonomyRegistry::new(vec![
        Category::benign("NV", "Melanocytic nevi"),
        Category::malignant("MEL", "Melanoma"),
        Category::malignant("BCC", "Basal cell carcinoma"),
    ])
    .unwrap();
    let synth = Synthesizer::new(registry.clone(), SynthesisConfig::default()).unwrap();
    let mut rng = StdRng::seed_from_u64(17);

    for _ in 0..500 {
        let d = synth
            .synthesize("scan.jpg", ScanStrategy::TieredRandom, &mut rng)
            .unwrap();
        let high: Vec<_> = d.iter().filter(|e| e.probability >= 0.40).collect();
        assert_eq!(high.len(), 1);
        assert!(d.total_mass() <= 1.0);

        let (category, probability) = ranking::primary(&registry, &d).unwrap();
        assert_eq!(category.code, high[0].category_code);
        assert_eq!(probability, high[0].probability);
    }
}

#[test]
fn winner_position_is_randomized() {
    let synth = Synthesizer::with_defaults();
    let mut rng = StdRng::seed_from_u64(8);
    let mut counts = vec![0usize; synth.registry().len()];
    for _ in 0..1_000 {
        let d = synth
            .synthesize("sample.jpg", ScanStrategy::TieredRandom, &mut rng)
            .unwrap();
        counts[d.primary_index()] += 1;
    }
    // Uniform shuffle: every position wins sometimes, none wins always.
    assert!(counts.iter().all(|&c| c > 0), "counts: {:?}", counts);
    assert!(counts.iter().all(|&c| c < 400), "counts: {:?}", counts);
}

#[test]
fn sample_jpg_is_bit_identical() {
    let synth = Synthesizer::with_defaults();
    let a = synth.synthesize_deterministic("sample.jpg").unwrap();
    let b = synth.synthesize_deterministic("sample.jpg").unwrap();
    assert_eq!(a, b);
    for (x, y) in a.iter().zip(b.iter()) {
        assert_eq!(x.probability.to_bits(), y.probability.to_bits());
    }
    let (category, confidence) = synth.primary(&a).unwrap();
    assert_eq!(category.code, "AKIEC");
    assert_eq!(confidence, 0.83);
}

#[test]
fn single_category_registry_is_valid() {
    let registry = TaxonomyRegistry::new(vec![Category::benign("NV", "Melanocytic nevi")]).unwrap();
    let synth = Synthesizer::new(registry.clone(), SynthesisConfig::default()).unwrap();
    let mut rng = StdRng::seed_from_u64(4);
    for _ in 0..50 {
        let d = synth
            .synthesize("only.jpg", ScanStrategy::TieredRandom, &mut rng)
            .unwrap();
        let (category, probability) = ranking::primary(&registry, &d).unwrap();
        assert_eq!(category.code, "NV");
        assert!((0.40..=0.75).contains(&probability));
    }
}

#[test]
fn empty_registry_is_an_error_not_an_empty_distribution() {
    let synth = Synthesizer::new(TaxonomyRegistry::empty(), SynthesisConfig::default()).unwrap();
    let mut rng = StdRng::seed_from_u64(0);
    let err = synth
        .synthesize("sample.jpg", ScanStrategy::TieredRandom, &mut rng)
        .unwrap_err();
    assert_eq!(err, ScanError::EmptyTaxonomy);
}
