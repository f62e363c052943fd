use std::collections::VecDeque;
use std::sync::Mutex;

use super::types::{LlmClient, ModelConfig};
use super::LlmError;

type Handler = Box<dyn Fn(&str) -> Result<String, LlmError> + Send + Sync>;

enum Behavior {
    Fixed(String),
    Script(Mutex<VecDeque<Result<String, LlmError>>>),
    Handler(Handler),
}

/// Mock LLM client for testing. Records every prompt it receives.
pub struct MockLlmClient {
    behavior: Behavior,
    prompts: Mutex<Vec<String>>,
}

impl MockLlmClient {
    /// Always answers with `response`.
    pub fn new(response: &str) -> Self {
        Self::with_behavior(Behavior::Fixed(response.to_string()))
    }

    /// Answers from the queue in order; errors once the queue is empty.
    pub fn scripted(responses: Vec<Result<String, LlmError>>) -> Self {
        Self::with_behavior(Behavior::Script(Mutex::new(responses.into())))
    }

    /// Fails every call with a fresh error from `make_error`.
    pub fn failing<F>(make_error: F) -> Self
    where
        F: Fn() -> LlmError + Send + Sync + 'static,
    {
        Self::with_handler(move |_| Err(make_error()))
    }

    /// Routes each prompt through `handler`.
    pub fn with_handler<F>(handler: F) -> Self
    where
        F: Fn(&str) -> Result<String, LlmError> + Send + Sync + 'static,
    {
        Self::with_behavior(Behavior::Handler(Box::new(handler)))
    }

    fn with_behavior(behavior: Behavior) -> Self {
        Self {
            behavior,
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn call_count(&self) -> usize {
        self.prompts.lock().map(|p| p.len()).unwrap_or_default()
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().map(|p| p.clone()).unwrap_or_default()
    }
}

impl LlmClient for MockLlmClient {
    fn generate(&self, _model: &ModelConfig, prompt: &str) -> Result<String, LlmError> {
        if let Ok(mut prompts) = self.prompts.lock() {
            prompts.push(prompt.to_string());
        }

        match &self.behavior {
            Behavior::Fixed(response) => Ok(response.clone()),
            Behavior::Script(queue) => queue
                .lock()
                .ok()
                .and_then(|mut q| q.pop_front())
                .unwrap_or_else(|| {
                    Err(LlmError::Connection("mock script exhausted".into()))
                }),
            Behavior::Handler(handler) => handler(prompt),
        }
    }
}
