//! Brain module: LLM provider abstraction.
//!
//! Defines the `LlmProvider` trait for model-agnostic completions, plus a
//! `MockLlmProvider` that serves canned responses for tests.

use crate::error::LlmError;
use crate::types::{CompletionRequest, CompletionResponse, Message, TokenUsage};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Mutex;

/// Trait for LLM providers.
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Perform a full completion and return the response.
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, LlmError>;

    /// Return the model name.
    fn model_name(&self) -> &str;

    /// Whether the provider can enforce a JSON response schema server-side.
    fn supports_response_schema(&self) -> bool {
        false
    }
}

/// A provider that replays queued responses in FIFO order.
///
/// Each queued entry is either a successful completion or an error. When the
/// queue is empty, `complete` fails with `LlmError::ApiRequest`.
pub struct MockLlmProvider {
    model: String,
    responses: Mutex<VecDeque<Result<CompletionResponse, LlmError>>>,
    requests: Mutex<Vec<CompletionRequest>>,
}

impl Default for MockLlmProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl MockLlmProvider {
    pub fn new() -> Self {
        Self {
            model: "mock-model".to_string(),
            responses: Mutex::new(VecDeque::new()),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Create a MockLlmProvider that returns the given text once.
    pub fn with_response(text: &str) -> Self {
        let provider = Self::new();
        provider.queue_response(Self::text_response(text));
        provider
    }

    /// Queue a response to be returned by the next `complete` call.
    pub fn queue_response(&self, response: CompletionResponse) {
        if let Ok(mut queue) = self.responses.lock() {
            queue.push_back(Ok(response));
        }
    }

    /// Queue an error to be returned by the next `complete` call.
    pub fn queue_error(&self, error: LlmError) {
        if let Ok(mut queue) = self.responses.lock() {
            queue.push_back(Err(error));
        }
    }

    /// Requests received so far, in call order.
    pub fn recorded_requests(&self) -> Vec<CompletionRequest> {
        self.requests
            .lock()
            .map(|r| r.clone())
            .unwrap_or_default()
    }

    /// Create a simple text response for testing.
    pub fn text_response(text: &str) -> CompletionResponse {
        CompletionResponse {
            message: Message::assistant(text),
            usage: TokenUsage {
                input_tokens: 100,
                output_tokens: 50,
            },
            model: "mock-model".to_string(),
            finish_reason: Some("STOP".to_string()),
        }
    }
}

#[async_trait]
impl LlmProvider for MockLlmProvider {
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, LlmError> {
        if let Ok(mut requests) = self.requests.lock() {
            requests.push(request);
        }
        let next = self
            .responses
            .lock()
            .map_err(|_| LlmError::ApiRequest {
                message: "mock response queue poisoned".to_string(),
            })?
            .pop_front();
        next.unwrap_or_else(|| {
            Err(LlmError::ApiRequest {
                message: "no mock response queued".to_string(),
            })
        })
    }

    fn model_name(&self) -> &str {
        &self.model
    }

    fn supports_response_schema(&self) -> bool {
        true
    }
}
