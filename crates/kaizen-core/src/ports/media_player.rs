//! Media player port.

use async_trait::async_trait;
use thiserror::Error;

/// Errors from launching the external player.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PlayerError {
    /// The player binary is not on `PATH`.
    #[error("Media player '{command}' is not installed")]
    NotInstalled {
        /// The configured player command.
        command: String,
    },

    /// The process could not be started.
    #[error("Failed to start media player: {message}")]
    Spawn {
        /// Reason reported by the OS.
        message: String,
    },

    /// The player exited unsuccessfully.
    #[error("Media player exited with status {code:?}")]
    Exited {
        /// Exit code, if the process was not killed by a signal.
        code: Option<i32>,
    },
}

/// Port for playing a stream in an external player.
#[async_trait]
pub trait MediaPlayerPort: Send + Sync {
    /// Play `url` and wait for the player to exit.
    async fn play(&self, url: &str) -> Result<(), PlayerError>;
}
