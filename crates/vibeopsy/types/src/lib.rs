//! # vibeopsy-types
//!
//! Core data model shared by every Vibe-Opsy crate.
//!
//! - [`Category`]: one immutable taxonomy entry (code, name, malignancy)
//! - [`ScoredResult`]: probability for one category
//! - [`Distribution`]: a validated set of scored results, one per category
//! - [`Artifact`]: the uploaded file a classifier scores
//! - [`Strategy`]: which synthetic strategy produced a distribution
//!
//! ## Invariants
//!
//! - Every probability lies in `[0, 1]`
//! - A distribution never assigns more than a total mass of 1
//! - Primary selection breaks exact ties by earliest taxonomy order

#![deny(unsafe_code)]

pub mod artifact;
pub mod category;
pub mod distribution;
pub mod error;
pub mod strategy;

pub use artifact::Artifact;
pub use category::Category;
pub use distribution::{Distribution, ScoredResult, SUM_EPSILON};
pub use error::{ScanError, ScanResult};
pub use strategy::Strategy;
