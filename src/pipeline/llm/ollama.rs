use serde::{Deserialize, Serialize};

use super::types::{LlmClient, ModelConfig};
use super::LlmError;

pub const DEFAULT_OLLAMA_URL: &str = "http://localhost:11434";

/// Ollama HTTP client for local LLM inference.
pub struct OllamaClient {
    client: reqwest::blocking::Client,
    timeout_secs: u64,
}

impl OllamaClient {
    pub fn new(timeout_secs: u64) -> Result<Self, LlmError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(std::time::Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| LlmError::Http(e.to_string()))?;

        Ok(Self {
            client,
            timeout_secs,
        })
    }

    /// Names of the models pulled into the Ollama instance.
    pub fn list_models(&self, model: &ModelConfig) -> Result<Vec<String>, LlmError> {
        let base_url = base_url(model);
        let url = format!("{base_url}/api/tags");

        let response = self.client.get(&url).send().map_err(|e| {
            if e.is_connect() {
                LlmError::Connection(base_url.clone())
            } else {
                LlmError::Http(e.to_string())
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(LlmError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: OllamaTagsResponse = response
            .json()
            .map_err(|e| LlmError::MalformedResponse(e.to_string()))?;

        Ok(parsed.models.into_iter().map(|m| m.name).collect())
    }
}

/// Configured URL without trailing slash, or the local default.
fn base_url(model: &ModelConfig) -> String {
    let url = model.api_url.trim().trim_end_matches('/');
    if url.is_empty() {
        DEFAULT_OLLAMA_URL.to_string()
    } else {
        url.to_string()
    }
}

/// Request body for Ollama /api/generate
#[derive(Serialize)]
struct OllamaGenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
}

/// Response body from Ollama /api/generate
#[derive(Deserialize)]
struct OllamaGenerateResponse {
    response: String,
}

/// Response body from Ollama /api/tags
#[derive(Deserialize)]
struct OllamaTagsResponse {
    models: Vec<OllamaModel>,
}

#[derive(Deserialize)]
struct OllamaModel {
    name: String,
}

impl LlmClient for OllamaClient {
    fn generate(&self, model: &ModelConfig, prompt: &str) -> Result<String, LlmError> {
        let base_url = base_url(model);
        let url = format!("{base_url}/api/generate");
        let body = OllamaGenerateRequest {
            model: &model.name,
            prompt,
            stream: false,
        };

        let response = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .map_err(|e| {
                if e.is_connect() {
                    LlmError::Connection(base_url.clone())
                } else if e.is_timeout() {
                    LlmError::Http(format!(
                        "Request timed out after {}s",
                        self.timeout_secs
                    ))
                } else {
                    LlmError::Http(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(LlmError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: OllamaGenerateResponse = response
            .json()
            .map_err(|e| LlmError::MalformedResponse(e.to_string()))?;

        Ok(parsed.response)
    }

    fn check_ready(&self, model: &ModelConfig) -> Result<(), LlmError> {
        let models = self.list_models(model)?;
        if models.iter().any(|m| m.starts_with(&model.name)) {
            Ok(())
        } else {
            Err(LlmError::Config(format!(
                "model '{}' is not available in Ollama (found: {})",
                model.name,
                models.join(", ")
            )))
        }
    }
}
