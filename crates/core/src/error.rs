//! Error types for Grimoire Core

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Script not found: {0}")]
    ScriptNotFound(String),

    #[error("Malformed script import at entry {index}: {reason}")]
    MalformedImport { index: usize, reason: String },

    #[error("Invalid operation: {0}")]
    InvalidOperation(String),

    #[error("Game is over: {0}")]
    GameOver(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Failed to parse config TOML: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Build a malformed-import error for the given entry
    pub(crate) fn import(index: usize, reason: impl Into<String>) -> Self {
        Error::MalformedImport {
            index,
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
