//! Model configuration for the agent roles.

use serde::{Deserialize, Serialize};

/// Default model when none is configured.
pub const DEFAULT_MODEL: &str = "google/gemini-2.5-flash-lite";

/// Receptionist sampling temperature.
pub const RECEPTIONIST_TEMPERATURE: f32 = 0.2;

/// Data entry sampling temperature.
pub const DATA_ENTRY_TEMPERATURE: f32 = 0.1;

/// Summarizer sampling temperature.
pub const SUMMARIZER_TEMPERATURE: f32 = 0.3;

/// Model configuration for one role.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelConfig {
    /// Model identifier (e.g., "google/gemini-2.5-flash-lite").
    pub model: String,

    /// Maximum tokens to generate in responses.
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    /// Temperature for response generation (0.0 to 2.0).
    #[serde(default = "default_temperature")]
    pub temperature: f32,
}

fn default_max_tokens() -> u32 {
    1024
}

fn default_temperature() -> f32 {
    RECEPTIONIST_TEMPERATURE
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self::new(DEFAULT_MODEL)
    }
}

impl ModelConfig {
    /// Create a configuration with the given model ID.
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            max_tokens: default_max_tokens(),
            temperature: default_temperature(),
        }
    }

    /// Configuration for the receptionist role.
    pub fn receptionist(model: impl Into<String>) -> Self {
        Self::new(model).with_temperature(RECEPTIONIST_TEMPERATURE)
    }

    /// Configuration for the data entry role.
    pub fn data_entry(model: impl Into<String>) -> Self {
        Self::new(model)
            .with_temperature(DATA_ENTRY_TEMPERATURE)
            .with_max_tokens(512)
    }

    /// Configuration for session summarization.
    pub fn summarizer(model: impl Into<String>) -> Self {
        Self::new(model).with_temperature(SUMMARIZER_TEMPERATURE)
    }

    /// Set the maximum tokens.
    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    /// Set the temperature, clamped to 0.0..=2.0.
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature.clamp(0.0, 2.0);
        self
    }
}
