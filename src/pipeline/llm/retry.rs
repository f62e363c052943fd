//! Bounded retry around a single LLM call.
//!
//! Shared by the extraction and judge paths. Failure is returned as a value
//! (`CallOutcome::Failure`) so callers decide whether it is fatal.

use std::sync::Arc;
use std::time::Duration;

use super::types::{LlmClient, ModelConfig};
use super::LlmError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, including the first.
    pub attempts: u32,
    /// Pause after a successful call.
    pub success_delay: Duration,
    /// Pause between failed attempts.
    pub failure_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            attempts: 3,
            success_delay: Duration::ZERO,
            failure_delay: Duration::from_secs(1),
        }
    }
}

impl RetryPolicy {
    /// Same attempt budget, no sleeping.
    pub fn immediate(attempts: u32) -> Self {
        Self {
            attempts: attempts.max(1),
            success_delay: Duration::ZERO,
            failure_delay: Duration::ZERO,
        }
    }
}

#[derive(Debug)]
pub enum CallOutcome {
    Success { response: String, attempts: u32 },
    Failure { attempts: u32, error: LlmError },
}

impl CallOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, CallOutcome::Success { .. })
    }

    pub fn attempts(&self) -> u32 {
        match self {
            CallOutcome::Success { attempts, .. } | CallOutcome::Failure { attempts, .. } => {
                *attempts
            }
        }
    }
}

/// Call the model until it answers or the attempt budget runs out.
///
/// Non-retryable errors end the loop immediately. There is no cancellation.
pub fn invoke_with_retry(
    client: &dyn LlmClient,
    model: &ModelConfig,
    prompt: &str,
    policy: &RetryPolicy,
) -> CallOutcome {
    let max_attempts = policy.attempts.max(1);
    let mut attempt = 0;

    loop {
        attempt += 1;
        match client.generate(model, prompt) {
            Ok(response) => {
                if !policy.success_delay.is_zero() {
                    std::thread::sleep(policy.success_delay);
                }
                return CallOutcome::Success {
                    response,
                    attempts: attempt,
                };
            }
            Err(error) if error.is_retryable() && attempt < max_attempts => {
                tracing::warn!(
                    model = %model.name,
                    attempt,
                    max_attempts,
                    error = %error,
                    "LLM call failed, retrying"
                );
                if !policy.failure_delay.is_zero() {
                    std::thread::sleep(policy.failure_delay);
                }
            }
            Err(error) => {
                return CallOutcome::Failure {
                    attempts: attempt,
                    error,
                };
            }
        }
    }
}

/// A client bound to one model and retry policy. Cheap to clone; the
/// extraction and judge stages each hold one.
#[derive(Clone)]
pub struct LlmInvoker {
    client: Arc<dyn LlmClient + Send + Sync>,
    model: ModelConfig,
    policy: RetryPolicy,
}

impl LlmInvoker {
    pub fn new(
        client: Arc<dyn LlmClient + Send + Sync>,
        model: ModelConfig,
        policy: RetryPolicy,
    ) -> Self {
        Self {
            client,
            model,
            policy,
        }
    }

    pub fn model(&self) -> &ModelConfig {
        &self.model
    }

    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    pub fn invoke(&self, prompt: &str) -> CallOutcome {
        invoke_with_retry(self.client.as_ref(), &self.model, prompt, &self.policy)
    }

    /// Preflight the bound model (see `LlmClient::check_ready`).
    pub fn check_ready(&self) -> Result<(), LlmError> {
        self.client.check_ready(&self.model)
    }
}
