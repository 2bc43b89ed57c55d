//! Songbird Core - configuration shared by every Songbird crate.
//!
//! - **config**: state and data directory resolution, `.env` loading
//! - **settings**: runtime settings resolved from the environment

pub mod config;
pub mod settings;

pub use config::{data_dir, ensure_all_dirs, env_file, load_env, logs_dir, state_dir};
pub use settings::{Settings, SettingsError};
