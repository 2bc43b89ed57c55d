//! Error types for the agent crate.

use thiserror::Error;

/// Errors that can occur in agent operations.
#[derive(Error, Debug)]
pub enum AgentError {
    /// The receptionist produced output outside its two-shape contract.
    #[error("malformed agent output: {0}")]
    MalformedOutput(String),

    /// The data entry worker could not build a complete booking request.
    #[error("schema mapping failed for {intent}: {reason}")]
    SchemaMapping {
        /// Intent being mapped.
        intent: String,
        /// Required fields that could not be resolved.
        missing: Vec<String>,
        /// What went wrong.
        reason: String,
    },

    /// Model invocation failed.
    #[error("model invocation failed: {0}")]
    ModelInvocation(String),

    /// Response parsing failed.
    #[error("failed to parse response: {0}")]
    ResponseParse(String),

    /// Serialization/deserialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl AgentError {
    /// Whether a bounded re-prompt of the same role may fix this error.
    pub fn is_schema_failure(&self) -> bool {
        matches!(self, Self::MalformedOutput(_) | Self::SchemaMapping { .. })
    }
}

/// Result type for agent operations.
pub type Result<T> = std::result::Result<T, AgentError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = AgentError::SchemaMapping {
            intent: "create_reservation".into(),
            missing: vec!["time".into()],
            reason: "missing required fields: time".into(),
        };
        assert_eq!(
            err.to_string(),
            "schema mapping failed for create_reservation: missing required fields: time"
        );

        let err = AgentError::MalformedOutput("no channel".into());
        assert_eq!(err.to_string(), "malformed agent output: no channel");
    }

    #[test]
    fn test_schema_failures() {
        assert!(AgentError::MalformedOutput("x".into()).is_schema_failure());
        assert!(!AgentError::ModelInvocation("timeout".into()).is_schema_failure());
    }

    #[test]
    fn test_error_from_json() {
        let json_err = serde_json::from_str::<serde_json::Value>("invalid").unwrap_err();
        let err: AgentError = json_err.into();
        assert!(matches!(err, AgentError::Serialization(_)));
    }
}
