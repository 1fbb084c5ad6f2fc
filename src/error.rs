//! Error types for the feature-expansion engine

use thiserror::Error;

/// Errors that can occur while expanding a feature catalog.
///
/// These are per-feature failures: the expander records them against the
/// offending feature and keeps going. A null event list and an all-invalid
/// numeric series are *not* errors; they surface as absent values and
/// all-false masks respectively.
#[derive(Debug, Error)]
pub enum ExpandError {
    #[error("malformed spec for '{name}': {reason}")]
    MalformedSpec { name: String, reason: String },

    #[error("dimension mismatch for '{name}': expected {expected} entries, got {actual}")]
    DimensionMismatch {
        name: String,
        expected: usize,
        actual: usize,
    },

    #[error("feature name '{0}' has no parent separator")]
    MalformedName(String),

    #[error("feature '{0}' not found in catalog")]
    MissingFeature(String),

    #[error("invalid JSON: {0}")]
    JsonError(#[from] serde_json::Error),
}

impl ExpandError {
    /// Shorthand for a malformed-spec failure.
    pub fn malformed(name: &str, reason: impl Into<String>) -> Self {
        ExpandError::MalformedSpec {
            name: name.to_string(),
            reason: reason.into(),
        }
    }
}
