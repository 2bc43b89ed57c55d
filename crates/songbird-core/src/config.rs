//! Directory layout and environment loading.
//!
//! All application data lives under `~/.songbird/`:
//!
//! ```text
//! ~/.songbird/
//! ├── data/     # Long-term conversation summaries (JSONL per session)
//! ├── logs/     # Application logs
//! └── config/   # .env.local with secrets
//! ```
//!
//! # Environment Variables
//!
//! - `SONGBIRD_STATE_DIR`: Override the base state directory
//! - `SONGBIRD_DATA_DIR`: Override the summary archive directory

use std::path::PathBuf;
use std::sync::OnceLock;

use tracing::debug;

/// Environment variable for custom state directory.
pub const STATE_DIR_ENV: &str = "SONGBIRD_STATE_DIR";

/// Environment variable for custom data directory.
pub const DATA_DIR_ENV: &str = "SONGBIRD_DATA_DIR";

const DEFAULT_STATE_DIR: &str = ".songbird";

const DATA_SUBDIR: &str = "data";
const LOGS_SUBDIR: &str = "logs";
const CONFIG_SUBDIR: &str = "config";

static STATE_DIR_CACHE: OnceLock<PathBuf> = OnceLock::new();

/// Get the Songbird state directory.
///
/// Resolved from `SONGBIRD_STATE_DIR`, then `~/.songbird`, then `.songbird`
/// in the current directory.
pub fn state_dir() -> PathBuf {
    STATE_DIR_CACHE
        .get_or_init(|| {
            std::env::var(STATE_DIR_ENV)
                .map(PathBuf::from)
                .unwrap_or_else(|_| {
                    dirs::home_dir()
                        .map(|h| h.join(DEFAULT_STATE_DIR))
                        .unwrap_or_else(|| PathBuf::from(DEFAULT_STATE_DIR))
                })
        })
        .clone()
}

/// Get the directory holding archived conversation summaries.
pub fn data_dir() -> PathBuf {
    std::env::var(DATA_DIR_ENV)
        .map(PathBuf::from)
        .unwrap_or_else(|_| state_dir().join(DATA_SUBDIR))
}

/// Get the logs directory.
pub fn logs_dir() -> PathBuf {
    state_dir().join(LOGS_SUBDIR)
}

/// Get the `.env.local` file inside the config directory.
pub fn env_file() -> PathBuf {
    state_dir().join(CONFIG_SUBDIR).join(".env.local")
}

/// Ensure the data and logs directories exist.
///
/// # Errors
/// Returns an error if any directory cannot be created.
pub fn ensure_all_dirs() -> std::io::Result<()> {
    std::fs::create_dir_all(data_dir())?;
    std::fs::create_dir_all(logs_dir())?;
    std::fs::create_dir_all(state_dir().join(CONFIG_SUBDIR))?;
    Ok(())
}

/// Load environment files, first match wins per variable.
///
/// Order: `./.env.local`, `./.env`, then the state directory's `.env.local`.
/// Missing files are skipped.
pub fn load_env() {
    for candidate in [
        PathBuf::from(".env.local"),
        PathBuf::from(".env"),
        env_file(),
    ] {
        if dotenvy::from_path(&candidate).is_ok() {
            debug!(path = %candidate.display(), "Loaded environment file");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_dir_name() {
        let dir = state_dir();
        assert!(dir.is_absolute() || dir.ends_with(".songbird"));
    }

    #[test]
    fn test_logs_dir_name() {
        assert!(logs_dir().ends_with("logs"));
    }

    #[test]
    fn test_env_file_name() {
        let file = env_file();
        assert!(file.ends_with(".env.local"));
        assert!(file.to_string_lossy().contains("config"));
    }
}
