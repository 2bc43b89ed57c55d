//! REST API for the Songbird booking assistant.
//!
//! Exposes the conversation loop over HTTP:
//! - Session lifecycle (start, send a message, end)
//! - Memory inspection (summary or recent turns for a returning guest)
//! - Health check
//!
//! # Example
//!
//! ```ignore
//! use songbird_api::{serve, ApiConfig, AppState};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let state = AppState::new(ApiConfig::default(), Arc::new(orchestrator));
//!     serve(ApiConfig::default(), state).await?;
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod handlers;
pub mod router;
pub mod state;
pub mod types;

pub use config::ApiConfig;
pub use error::{ApiError, Result};
pub use router::{create_router, serve};
pub use state::AppState;
