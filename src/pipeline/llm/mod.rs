pub mod types;
pub mod json;
pub mod retry;
pub mod rest;
pub mod ollama;
pub mod mock;

pub use types::*;
pub use json::*;
pub use retry::*;
pub use rest::*;
pub use ollama::*;
pub use mock::*;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum LlmError {
    #[error("LLM endpoint is not reachable at {0}")]
    Connection(String),

    #[error("HTTP client error: {0}")]
    Http(String),

    #[error("LLM endpoint returned error (status {status}): {body}")]
    Status { status: u16, body: String },

    #[error("Malformed LLM endpoint response: {0}")]
    MalformedResponse(String),

    #[error("LLM configuration error: {0}")]
    Config(String),
}

impl LlmError {
    /// Configuration problems fail the same way on every attempt.
    pub fn is_retryable(&self) -> bool {
        !matches!(self, LlmError::Config(_))
    }
}

/// Build the client matching `model.provider`.
///
/// `ollama` talks to a local Ollama instance; any other provider goes through
/// the hosted REST endpoint at `model.api_url`.
pub fn build_client(model: &ModelConfig) -> Result<Box<dyn LlmClient + Send + Sync>, LlmError> {
    if model.is_ollama() {
        Ok(Box::new(OllamaClient::new(model.timeout_secs)?))
    } else {
        if model.api_url.trim().is_empty() {
            return Err(LlmError::Config(format!(
                "api_url is required for provider '{}'",
                model.provider
            )));
        }
        Ok(Box::new(RestLlmClient::new(model.timeout_secs)?))
    }
}
