//! Songbird Orchestrator - runs the conversation loop.
//!
//! Each guest message moves through a small state machine
//! ([`TurnState`]): the receptionist either answers directly or hands an
//! instruction to the data entry worker, whose booking tool result goes
//! back to the receptionist for the final reply. Every step is recorded in
//! the memory store. Malformed agent output is retried according to the
//! [`RetryPolicy`], after which the guest receives a generic apology.

pub mod error;
pub mod orchestrator;
pub mod policy;
pub mod state;

pub use error::{OrchestratorError, Result};
pub use orchestrator::{
    is_done_signal, Orchestrator, TurnReply, DEFAULT_CONTEXT_BOUND, DONE_SIGNALS,
};
pub use policy::{RetryPolicy, DEFAULT_APOLOGY};
pub use state::TurnState;
