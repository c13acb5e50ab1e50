use thiserror::Error;

/// Errors raised while building taxonomies and scoring artifacts.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ScanError {
    #[error("taxonomy is empty: cannot synthesize a distribution")]
    EmptyTaxonomy,

    #[error("category not found: {0}")]
    NotFound(String),

    #[error("duplicate category code: {0}")]
    DuplicateCategory(String),

    #[error("invalid category: {0}")]
    InvalidCategory(String),

    #[error("classification unavailable: {0}")]
    ClassificationUnavailable(String),

    #[error("distribution invariant violated: {invariant} -- {detail}")]
    InvariantViolation { invariant: String, detail: String },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

impl ScanError {
    pub(crate) fn invariant(invariant: &str, detail: impl Into<String>) -> Self {
        ScanError::InvariantViolation {
            invariant: invariant.to_string(),
            detail: detail.into(),
        }
    }

    /// Whether the caller can reasonably pick a fallback and continue.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, ScanError::NotFound(_))
    }
}

impl From<serde_json::Error> for ScanError {
    fn from(e: serde_json::Error) -> Self {
        ScanError::ClassificationUnavailable(format!("malformed payload: {}", e))
    }
}

/// Convenience type alias for scan results.
pub type ScanResult<T> = Result<T, ScanError>;
