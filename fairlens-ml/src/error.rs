//! Error types for the fairlens-ml crate.

use fairlens_core::error::LlmError;
use thiserror::Error;

/// Top-level error type for analysis and audit operations.
///
/// The fairness engine itself never returns these; its operations are total
/// over well-formed input. Errors come from data acquisition and export.
#[derive(Debug, Error)]
pub enum MlError {
    #[error("AI provider error: {0}")]
    Provider(#[from] LlmError),

    #[error("Schema mismatch in provider response: {0}")]
    Schema(String),

    #[error("Input text is empty")]
    EmptyInput,

    #[error("Analysis run was superseded by a newer run")]
    Superseded,

    #[error("Dataset error: {0}")]
    Dataset(String),

    #[error("Template error: {0}")]
    Template(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}

impl MlError {
    pub fn schema(msg: impl Into<String>) -> Self {
        Self::Schema(msg.into())
    }

    pub fn dataset(msg: impl Into<String>) -> Self {
        Self::Dataset(msg.into())
    }

    pub fn template(msg: impl Into<String>) -> Self {
        Self::Template(msg.into())
    }

    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    /// Whether this error came from the provider boundary (transport or schema).
    pub fn is_upstream(&self) -> bool {
        matches!(self, Self::Provider(_) | Self::Schema(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_error_display() {
        let err = MlError::schema("missing field `data`");
        assert_eq!(
            err.to_string(),
            "Schema mismatch in provider response: missing field `data`"
        );
        assert!(err.is_upstream());
    }

    #[test]
    fn test_provider_error_from_llm() {
        let err: MlError = LlmError::Timeout { timeout_secs: 5 }.into();
        assert!(matches!(err, MlError::Provider(_)));
        assert!(err.is_upstream());
        assert!(!MlError::Superseded.is_upstream());
    }
}
