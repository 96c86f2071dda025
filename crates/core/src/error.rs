use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LexisError {
    #[error("Configuration missing: {0}")]
    ConfigurationMissing(String),

    #[error("Document not found: {0}")]
    DocumentNotFound(String),

    #[error("Extraction error: {0}")]
    Extraction(String),

    #[error("Storage error: {0}")]
    Storage(String),
}

/// Non-fatal degradations attached to a result instead of being raised.
///
/// Only `ConfigurationMissing` on [`LexisError`] is fatal, and only at startup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Degradation {
    /// Input was empty or malformed and a safe default was substituted.
    InputDegraded { detail: String },
    /// Normalization hit the length ceiling and dropped the tail.
    Truncated { original_chars: usize, kept_chars: usize },
    /// No chunk matched the question; the prompt was built without context.
    RetrievalEmpty,
    /// The AI or extraction collaborator failed; output is template-based.
    UpstreamUnavailable { reason: String },
}

impl Degradation {
    pub fn is_upstream(&self) -> bool {
        matches!(self, Degradation::UpstreamUnavailable { .. })
    }
}
