//! # Vibe-Opsy Remote Inference
//!
//! Adapter for a real classification endpoint. The artifact is uploaded as a
//! multipart `file` field; the JSON answer is checked against the taxonomy
//! before it is allowed to reach presentation code.
//!
//! ## Invariants
//!
//! - A returned [`Distribution`](vibeopsy_types::Distribution) satisfies the
//!   same coverage, bounds and sum rules as a synthesized one
//! - Every failure is `ClassificationUnavailable`; there is no retry and no
//!   silent fallback to synthetic scores

#![deny(unsafe_code)]

pub mod client;
pub mod config;
pub mod validate;

pub use client::InferenceClassifier;
pub use config::InferenceConfig;
pub use validate::{into_distribution, uses_percent_scale};
