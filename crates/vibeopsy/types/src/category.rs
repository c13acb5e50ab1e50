//! Diagnostic categories.

use serde::{Deserialize, Serialize};

use crate::error::{ScanError, ScanResult};

/// One entry of the diagnostic taxonomy.
///
/// Codes are short, stable identifiers (`MEL`, `NV`, ...) that stay the same
/// across runs; names are for display only.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Category {
    pub code: String,
    pub name: String,
    pub malignant: bool,
}

impl Category {
    pub fn new(code: impl Into<String>, name: impl Into<String>, malignant: bool) -> Self {
        Self {
            code: code.into(),
            name: name.into(),
            malignant,
        }
    }

    pub fn benign(code: impl Into<String>, name: impl Into<String>) -> Self {
        Self::new(code, name, false)
    }

    pub fn malignant(code: impl Into<String>, name: impl Into<String>) -> Self {
        Self::new(code, name, true)
    }

    /// Check that the code is usable as a registry key.
    pub fn validate(&self) -> ScanResult<()> {
        if self.code.trim().is_empty() {
            return Err(ScanError::InvalidCategory(format!(
                "category '{}' has an empty code",
                self.name
            )));
        }
        if self.code.trim() != self.code {
            return Err(ScanError::InvalidCategory(format!(
                "category code '{}' has surrounding whitespace",
                self.code
            )));
        }
        Ok(())
    }

    /// Whether `label` refers to this category, by code or by display name.
    pub fn matches_label(&self, label: &str) -> bool {
        let label = label.trim();
        label.eq_ignore_ascii_case(&self.code) || label.eq_ignore_ascii_case(&self.name)
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.name, self.code)
    }
}
