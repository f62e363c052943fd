use serde::{Deserialize, Serialize};

use super::types::{LlmClient, ModelConfig};
use super::LlmError;

/// HTTP client for a hosted inference endpoint that takes a single query
/// and answers `{"response": "..."}`.
pub struct RestLlmClient {
    client: reqwest::blocking::Client,
    timeout_secs: u64,
}

impl RestLlmClient {
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
}

/// Request body for the query endpoint
#[derive(Serialize)]
struct QueryRequest<'a> {
    model_provider: &'a str,
    model_name: &'a str,
    query: &'a str,
}

/// Response body from the query endpoint
#[derive(Deserialize)]
struct QueryResponse {
    response: Option<String>,
}

impl LlmClient for RestLlmClient {
    fn generate(&self, model: &ModelConfig, prompt: &str) -> Result<String, LlmError> {
        let url = model.api_url.trim();
        if url.is_empty() {
            return Err(LlmError::Config("api_url is not set".into()));
        }

        let body = QueryRequest {
            model_provider: &model.provider,
            model_name: &model.name,
            query: prompt,
        };

        let mut request = self.client.post(url).json(&body);
        if let Some(token) = model.access_token.as_deref() {
            request = request.bearer_auth(token);
        }

        let response = request.send().map_err(|e| {
            if e.is_connect() {
                LlmError::Connection(url.to_string())
            } else if e.is_timeout() {
                LlmError::Http(format!("Request timed out after {}s", self.timeout_secs))
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

        let parsed: QueryResponse = response
            .json()
            .map_err(|e| LlmError::MalformedResponse(e.to_string()))?;

        parsed
            .response
            .ok_or_else(|| LlmError::MalformedResponse("missing 'response' field".into()))
    }
}
