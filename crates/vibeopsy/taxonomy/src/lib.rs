//! # vibeopsy-taxonomy
//!
//! The taxonomy registry: a fixed, ordered catalog of diagnostic categories.
//! Order is significant. It decides primary-category tie-breaks and the
//! order entries appear in every [`Distribution`].

#![deny(unsafe_code)]

pub mod registry;

pub use registry::{TaxonomyRegistry, SKIN_LESION_CATEGORIES};

pub use vibeopsy_types::{Category, Distribution, ScanError, ScanResult, ScoredResult};
