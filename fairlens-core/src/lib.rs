//! # FairLens Core
//!
//! Core library for FairLens. Provides the LLM interface (brain), the Gemini
//! provider, layered configuration, and the fundamental message types.

pub mod brain;
pub mod config;
pub mod error;
pub mod providers;
pub mod types;

// Re-export commonly used types at the crate root.
pub use brain::{LlmProvider, MockLlmProvider};
pub use config::{FairlensConfig, LlmConfig, config_exists, load_config};
pub use error::{ConfigError, FairlensError, LlmError, Result};
pub use providers::create_provider;
pub use types::{
    CompletionRequest, CompletionResponse, Message, ResponseFormat, Role, TokenUsage,
};
