//! Runtime settings resolved from the environment.

use thiserror::Error;

/// Environment variable for the OpenRouter API key.
pub const OPENROUTER_API_KEY_ENV: &str = "OPENROUTER_API_KEY";

/// Environment variable for the model served through OpenRouter.
pub const OPENROUTER_MODEL_ENV: &str = "OPENROUTER_MODEL";

/// Environment variable for the booking API base URL.
pub const BOOKING_API_URL_ENV: &str = "BOOKING_API_URL";

/// Environment variable for the booking API restaurant segment.
pub const BOOKING_RESTAURANT_ENV: &str = "BOOKING_RESTAURANT";

/// Environment variable for the booking API bearer token.
pub const BOOKING_BEARER_TOKEN_ENV: &str = "BOOKING_BEARER_TOKEN";

/// Environment variable for the restaurant name used in prompts.
pub const RESTAURANT_NAME_ENV: &str = "SONGBIRD_RESTAURANT_NAME";

/// Default model when `OPENROUTER_MODEL` is unset.
pub const DEFAULT_MODEL: &str = "google/gemini-2.5-flash-lite";

/// Default booking API base URL (the local mock server).
pub const DEFAULT_BOOKING_API_URL: &str = "http://localhost:8547/api/ConsumerApi/v1/Restaurant/";

/// Default restaurant path segment for the booking API.
pub const DEFAULT_BOOKING_RESTAURANT: &str = "TheHungryUnicorn";

/// Default display name.
pub const DEFAULT_RESTAURANT_NAME: &str = "The Hungry Unicorn";

/// Errors resolving settings.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum SettingsError {
    /// A required variable is not set.
    #[error("missing {0} environment variable")]
    Missing(&'static str),
}

/// Settings shared by the server and the terminal chat.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// OpenRouter API key, if configured.
    pub openrouter_api_key: Option<String>,
    /// Model identifier for every role.
    pub model: String,
    /// Booking API base URL (with trailing slash).
    pub booking_api_url: String,
    /// Booking API restaurant segment.
    pub booking_restaurant: String,
    /// Bearer token for the booking API.
    pub booking_bearer_token: Option<String>,
    /// Restaurant name shown to guests.
    pub restaurant_name: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            openrouter_api_key: None,
            model: DEFAULT_MODEL.to_string(),
            booking_api_url: DEFAULT_BOOKING_API_URL.to_string(),
            booking_restaurant: DEFAULT_BOOKING_RESTAURANT.to_string(),
            booking_bearer_token: None,
            restaurant_name: DEFAULT_RESTAURANT_NAME.to_string(),
        }
    }
}

impl Settings {
    /// Resolve settings from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Resolve settings through an arbitrary lookup. Empty values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let defaults = Self::default();

        let mut booking_api_url = get(BOOKING_API_URL_ENV).unwrap_or(defaults.booking_api_url);
        if !booking_api_url.ends_with('/') {
            booking_api_url.push('/');
        }

        Self {
            openrouter_api_key: get(OPENROUTER_API_KEY_ENV),
            model: get(OPENROUTER_MODEL_ENV).unwrap_or(defaults.model),
            booking_api_url,
            booking_restaurant: get(BOOKING_RESTAURANT_ENV).unwrap_or(defaults.booking_restaurant),
            booking_bearer_token: get(BOOKING_BEARER_TOKEN_ENV),
            restaurant_name: get(RESTAURANT_NAME_ENV).unwrap_or(defaults.restaurant_name),
        }
    }

    /// The OpenRouter API key, or an error naming the missing variable.
    pub fn require_api_key(&self) -> Result<&str, SettingsError> {
        self.openrouter_api_key
            .as_deref()
            .ok_or(SettingsError::Missing(OPENROUTER_API_KEY_ENV))
    }
}
