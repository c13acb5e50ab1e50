//! # vibeopsy-engine
//!
//! Synthetic diagnostic scoring engine. Produces believable, internally
//! consistent probability distributions over a closed taxonomy without any
//! real inference.
//!
//! ## Architecture
//!
//! ```text
//!   Artifact ──► Classifier ──────────────┐
//!                 │ SyntheticClassifier    │ DelayedClassifier (scan latency)
//!                 ▼                        │
//!             Synthesizer ◄── SynthesisConfig (bands, hash confidence)
//!              │         │
//!        tiered::     hash::
//!        synthesize   synthesize
//!              │         │
//!              ▼         ▼
//!            Distribution ──► ranking::primary / ranking::ranked
//! ```
//!
//! ## Invariants
//!
//! - Every registry category appears exactly once in a distribution
//! - Every probability is in `[0, 1]` and the total never exceeds 1
//! - Primary ties break toward the earliest registry entry
//! - Deterministic-hash output depends only on the identifier string
//!
//! ## Quick Start
//!
//! ```rust
//! use rand::SeedableRng;
//! use vibeopsy_engine::{ranking, Strategy, Synthesizer};
//!
//! let synth = Synthesizer::with_defaults();
//! let mut rng = rand::rngs::StdRng::seed_from_u64(7);
//! let d = synth.synthesize("sample.jpg", Strategy::TieredRandom, &mut rng).unwrap();
//! let (category, probability) = ranking::primary(synth.registry(), &d).unwrap();
//! assert!(probability >= 0.40);
//! println!("{} {:.1}%", category.name, probability * 100.0);
//! ```

#![deny(unsafe_code)]

pub mod classifier;
pub mod config;
pub mod hash;
pub mod prediction;
pub mod ranking;
pub mod synthesizer;
pub mod tiered;

pub use classifier::{Classifier, DelayedClassifier, SyntheticClassifier, PROGRESS_STEPS};
pub use config::{Band, HashConfidence, SynthesisConfig, TierBands};
pub use hash::{identifier_hash, HashPick};
pub use prediction::Prediction;
pub use ranking::Ranked;
pub use synthesizer::Synthesizer;

pub use vibeopsy_taxonomy::TaxonomyRegistry;
pub use vibeopsy_types::{
    Artifact, Category, Distribution, ScanError, ScanResult, ScoredResult, Strategy,
};
