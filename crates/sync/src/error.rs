//! Sync error types

/// Sync result type
pub type Result<T> = std::result::Result<T, Error>;

/// Sync errors
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Room not found: {0}")]
    RoomNotFound(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Queue closed")]
    QueueClosed,

    #[error(transparent)]
    Core(#[from] grimoire_core::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl Error {
    /// Failures worth retrying later, as opposed to rejections
    pub fn is_retryable(&self) -> bool {
        matches!(self, Error::Transport(_) | Error::QueueClosed)
    }
}
