//! Request DTOs for the API.

use serde::Deserialize;

/// Send a guest message.
#[derive(Debug, Clone, Deserialize)]
pub struct SendMessageRequest {
    /// Message content.
    pub message: String,
}
