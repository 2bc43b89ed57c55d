//! Songbird Agent - the two language-model roles of the booking desk.
//!
//! - [`Receptionist`]: talks to the guest and emits one [`ReceptionistAction`]
//!   per call, either a reply or an [`Instruction`] for the back office
//! - [`DataEntryWorker`]: maps an instruction onto a strict booking request
//!   and runs it through the tool gateway
//! - [`LlmSummarizer`]: condenses a closed session for long-term memory
//!
//! All roles talk to a [`LanguageModel`]; [`OpenRouterClient`] is the
//! production implementation and [`testing::ScriptedModel`] replays canned
//! responses.

pub mod action;
pub mod client;
pub mod config;
pub mod context;
pub mod data_entry;
pub mod error;
pub mod model;
pub mod prompt;
pub mod receptionist;
pub mod summarizer;
pub mod testing;

pub use action::{Instruction, ReceptionistAction};
pub use client::{ChatMessage, OpenRouterClient};
pub use config::ModelConfig;
pub use context::SessionContext;
pub use data_entry::{DataEntryWorker, Delegation};
pub use error::{AgentError, Result};
pub use model::LanguageModel;
pub use receptionist::Receptionist;
pub use summarizer::LlmSummarizer;
