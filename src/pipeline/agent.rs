use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::foundation::error::{VibeError, VibeResult};
use crate::pipeline::provider::TextGenerator;

/// Result of a bounded retry loop around one agent call.
#[derive(Debug)]
pub enum AgentOutcome<T> {
    /// The call produced a parseable value.
    Success {
        /// Parsed response.
        value: T,
        /// Calls made, including the successful one.
        attempts: u32,
    },
    /// Every attempt failed.
    Exhausted {
        /// Calls made.
        attempts: u32,
        /// Error of the final attempt.
        last_error: VibeError,
    },
}

impl<T> AgentOutcome<T> {
    /// Calls made, whatever the outcome.
    pub fn attempts(&self) -> u32 {
        match self {
            AgentOutcome::Success { attempts, .. } | AgentOutcome::Exhausted { attempts, .. } => {
                *attempts
            }
        }
    }

    /// `true` for [`AgentOutcome::Success`].
    pub fn is_success(&self) -> bool {
        matches!(self, AgentOutcome::Success { .. })
    }

    /// Convert exhaustion into [`VibeError::Pipeline`] naming `agent`.
    pub fn into_result(self, agent: &str) -> VibeResult<T> {
        match self {
            AgentOutcome::Success { value, .. } => Ok(value),
            AgentOutcome::Exhausted {
                attempts,
                last_error,
            } => Err(VibeError::pipeline(format!(
                "{agent} failed after {attempts} attempt(s): {last_error}"
            ))),
        }
    }
}

/// Remove markdown code fences that models wrap around JSON.
pub fn clean_json_fences(s: &str) -> String {
    s.replace("```json", "").replace("```", "").trim().to_string()
}

/// Parse model output as JSON, rejecting `null` and empty objects/arrays.
pub fn parse_agent_json(raw: &str) -> VibeResult<serde_json::Value> {
    let cleaned = clean_json_fences(raw);
    let value: serde_json::Value = serde_json::from_str(&cleaned)
        .map_err(|e| VibeError::provider(format!("model returned malformed json: {e}")))?;
    let empty = match &value {
        serde_json::Value::Null => true,
        serde_json::Value::Object(m) => m.is_empty(),
        serde_json::Value::Array(a) => a.is_empty(),
        _ => false,
    };
    if empty {
        return Err(VibeError::provider("model returned an empty response"));
    }
    Ok(value)
}

/// Call `generator` up to `max_retries + 1` times until its output parses into `T`.
///
/// Retries are immediate. Transport errors, malformed JSON, empty payloads and payloads that
/// do not match `T` all count as a failed attempt.
pub fn call_with_retry<T: DeserializeOwned>(
    generator: &dyn TextGenerator,
    max_retries: u32,
    system: &str,
    user: &str,
) -> AgentOutcome<T> {
    let max_attempts = max_retries.saturating_add(1);
    let mut attempt = 0;
    loop {
        attempt += 1;
        let result = generator
            .generate(system, user)
            .and_then(|raw| parse_agent_json(&raw))
            .and_then(|value| {
                serde_json::from_value::<T>(value).map_err(|e| {
                    VibeError::provider(format!("model response has unexpected shape: {e}"))
                })
            });
        match result {
            Ok(value) => {
                debug!(attempt, "agent call succeeded");
                return AgentOutcome::Success {
                    value,
                    attempts: attempt,
                };
            }
            Err(e) if attempt < max_attempts => {
                warn!(attempt, error = %e, "agent call failed, retrying");
            }
            Err(e) => {
                warn!(attempt, error = %e, "agent call failed, giving up");
                return AgentOutcome::Exhausted {
                    attempts: attempt,
                    last_error: e,
                };
            }
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/pipeline/agent.rs"]
mod tests;
