//! Songbird - a restaurant booking assistant built from two cooperating
//! language-model roles.
//!
//! The binary offers two front-ends over the same orchestrator:
//! an HTTP server (`songbird serve`) and a terminal chat (`songbird chat`).

pub mod app;
pub mod cli;
pub mod error;
pub mod repl;

pub use error::{AppError, Result};
