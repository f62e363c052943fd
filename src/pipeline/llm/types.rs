use serde::Deserialize;

use super::LlmError;

/// Which model to call and where. Passed by reference into every call so no
/// client depends on process-wide state.
#[derive(Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    pub name: String,
    pub provider: String,
    pub api_url: String,
    pub access_token: Option<String>,
    pub timeout_secs: u64,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            name: "gpt4_1".into(),
            provider: "openai".into(),
            api_url: String::new(),
            access_token: None,
            timeout_secs: 120,
        }
    }
}

impl ModelConfig {
    pub fn is_ollama(&self) -> bool {
        self.provider.eq_ignore_ascii_case("ollama")
    }
}

// Keep the access token out of logs.
impl std::fmt::Debug for ModelConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModelConfig")
            .field("name", &self.name)
            .field("provider", &self.provider)
            .field("api_url", &self.api_url)
            .field(
                "access_token",
                &self.access_token.as_ref().map(|_| "<redacted>"),
            )
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

/// LLM client abstraction (allows mocking)
pub trait LlmClient {
    /// Send one prompt, return the raw response text. No retries here.
    fn generate(&self, model: &ModelConfig, prompt: &str) -> Result<String, LlmError>;

    /// Cheap preflight before a batch. Clients that cannot check return Ok.
    fn check_ready(&self, _model: &ModelConfig) -> Result<(), LlmError> {
        Ok(())
    }
}
