//! Persistent user preferences for the dashboard shell.

pub mod error;
pub mod manager;
pub mod model;

use std::{env, path::PathBuf};

pub use error::ConfigError;
pub use manager::ConfigManager;
pub use model::{Config, FIELDS};

pub const HOME_ENV: &str = "SQUAREONE_HOME";
const DEFAULT_DIR_NAME: &str = ".squareone";

/// Application base directory: `$SQUAREONE_HOME`, else `~/.squareone`.
pub fn base_dir() -> PathBuf {
    if let Some(custom) = env::var_os(HOME_ENV) {
        return PathBuf::from(custom);
    }
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(DEFAULT_DIR_NAME)
}
