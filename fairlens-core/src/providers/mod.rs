//! LLM provider implementations.
//!
//! Use `create_provider()` to instantiate the provider named in config.

pub mod gemini;

use crate::brain::LlmProvider;
use crate::config::LlmConfig;
use crate::error::LlmError;
use std::sync::Arc;

pub use gemini::GeminiProvider;

/// Create an LLM provider from configuration.
pub fn create_provider(config: &LlmConfig) -> Result<Arc<dyn LlmProvider>, LlmError> {
    match config.provider.to_ascii_lowercase().as_str() {
        "gemini" | "google" => {
            let provider = GeminiProvider::new(config)?;
            tracing::info!(model = config.model.as_str(), "Using Gemini provider");
            Ok(Arc::new(provider))
        }
        other => Err(LlmError::UnsupportedProvider {
            provider: other.to_string(),
        }),
    }
}
