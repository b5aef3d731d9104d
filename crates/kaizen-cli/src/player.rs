//! External media player adapter.

use std::path::PathBuf;
use std::process::Stdio;

use async_trait::async_trait;
use kaizen_core::{MediaPlayerPort, PlayerError, Settings};
use tokio::process::Command;

/// Plays streams by launching an external player (`mpv -fs <url>` by default).
#[derive(Debug, Clone)]
pub struct ExternalPlayer {
    command: String,
    args: Vec<String>,
}

impl ExternalPlayer {
    /// Create a player adapter for `command`, passing `args` before the URL.
    pub fn new(command: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            command: command.into(),
            args,
        }
    }

    /// Build from settings, falling back to `mpv -fs`.
    pub fn from_settings(settings: &Settings) -> Self {
        let args = settings
            .player_args
            .clone()
            .unwrap_or_else(|| vec!["-fs".to_string()]);
        Self::new(settings.effective_player_command(), args)
    }

    /// The configured binary.
    pub fn command(&self) -> &str {
        &self.command
    }

    /// Locate the player on `PATH`.
    pub fn locate(&self) -> Result<PathBuf, PlayerError> {
        which::which(&self.command).map_err(|_| PlayerError::NotInstalled {
            command: self.command.clone(),
        })
    }

    fn build_command(&self, url: &str) -> Command {
        let mut command = Command::new(&self.command);
        command
            .args(&self.args)
            .arg(url)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .kill_on_drop(true);
        command
    }
}

#[async_trait]
impl MediaPlayerPort for ExternalPlayer {
    async fn play(&self, url: &str) -> Result<(), PlayerError> {
        tracing::info!(target: "kaizen.player", player = %self.command, "starting playback");

        let status = self.build_command(url).status().await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                PlayerError::NotInstalled {
                    command: self.command.clone(),
                }
            } else {
                PlayerError::Spawn {
                    message: e.to_string(),
                }
            }
        })?;

        if !status.success() {
            tracing::warn!(target: "kaizen.player", status = %status, "player exited unsuccessfully");
            return Err(PlayerError::Exited {
                code: status.code(),
            });
        }

        tracing::debug!(target: "kaizen.player", "playback finished");
        Ok(())
    }
}
