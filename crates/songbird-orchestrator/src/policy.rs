//! Retry policy for schema-level agent failures.

use serde::{Deserialize, Serialize};

/// Apology surfaced when the retry budget is exhausted.
pub const DEFAULT_APOLOGY: &str =
    "I'm sorry, I'm having trouble with that right now. Could you rephrase your request?";

/// How often a role is re-prompted after malformed or unmappable output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetryPolicy {
    /// Re-prompts allowed after the first attempt.
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    /// Message shown to the guest once retries are exhausted.
    #[serde(default = "default_apology")]
    pub apology: String,
}

fn default_max_retries() -> u32 {
    1
}

fn default_apology() -> String {
    DEFAULT_APOLOGY.to_string()
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: default_max_retries(),
            apology: default_apology(),
        }
    }
}

impl RetryPolicy {
    /// Policy that never re-prompts.
    pub fn no_retry() -> Self {
        Self {
            max_retries: 0,
            ..Self::default()
        }
    }

    /// Set the retry count.
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    /// Set the apology text.
    pub fn with_apology(mut self, apology: impl Into<String>) -> Self {
        self.apology = apology.into();
        self
    }

    /// Total attempts per role invocation.
    pub fn attempts(&self) -> u32 {
        self.max_retries.saturating_add(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_one_retry() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.max_retries, 1);
        assert_eq!(policy.attempts(), 2);
        assert_eq!(policy.apology, DEFAULT_APOLOGY);
    }

    #[test]
    fn test_deserialize_partial() {
        let policy: RetryPolicy = serde_json::from_str(r#"{"max_retries": 3}"#).unwrap();
        assert_eq!(policy.attempts(), 4);
        assert_eq!(policy.apology, DEFAULT_APOLOGY);
        assert_eq!(RetryPolicy::no_retry().attempts(), 1);
    }
}
