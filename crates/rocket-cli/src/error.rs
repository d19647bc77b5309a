// crates/rocket-cli/src/error.rs

use std::path::PathBuf;

use thiserror::Error;

use rocket_core::RocketError;

/// Errors surfaced by the CLI.
#[derive(Debug, Error)]
pub enum CliError {
    /// Desk operation or collaborator failure.
    #[error(transparent)]
    Rocket(#[from] RocketError),

    #[error("Config error: {0}")]
    Config(String),

    #[error("Unknown asset '{0}' (use a configured symbol or address)")]
    UnknownAsset(String),

    #[error("Unknown account '{0}' (use a configured name or address)")]
    UnknownAccount(String),

    #[error("No sandbox state at {0}. Run `rocket init` first.")]
    NoState(PathBuf),

    #[error("Sandbox state already exists at {0}. Pass --force to overwrite.")]
    StateExists(PathBuf),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),
}
