//! Core download types.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::events::StatusUpdate;

/// Identifier of one download session.
///
/// Ids are handed out by the download manager in strictly increasing order,
/// so a larger id always belongs to a later session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(u64);

impl SessionId {
    /// Wrap a raw session number.
    #[must_use]
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// The raw session number.
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Audio track of an episode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EpisodeKind {
    /// Original audio with subtitles.
    Sub,
    /// Dubbed audio.
    Dub,
}

impl EpisodeKind {
    /// Path segment used by the catalog API and in filenames.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Sub => "sub",
            Self::Dub => "dub",
        }
    }
}

impl fmt::Display for EpisodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lifecycle of a download session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    /// Nothing has been started.
    #[default]
    Idle,
    /// Bytes are flowing.
    Running,
    /// The worker is parked until resumed.
    Paused,
    /// Cancellation requested, waiting for the worker to confirm.
    Cancelling,
    /// Finished successfully.
    Complete,
    /// Finished with an error (including user cancellation).
    Failed,
    /// Replaced by a newer session.
    Superseded,
}

impl SessionState {
    /// Check if the session has stopped reporting.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Complete | Self::Failed | Self::Superseded)
    }

    /// The state a terminal update leaves its session in.
    #[must_use]
    pub fn ended_by(update: &StatusUpdate) -> Self {
        match &update.error {
            None => Self::Complete,
            Some(err) if err.is_superseded() => Self::Superseded,
            Some(_) => Self::Failed,
        }
    }
}

/// Progress of a transfer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Progress {
    /// Fraction of the declared length, always within `[0, 1]`.
    Fraction(f64),
    /// The server did not declare a length.
    Indeterminate,
}

impl Progress {
    /// Progress of `done` out of `total` bytes.
    ///
    /// A missing or zero total yields [`Progress::Indeterminate`].
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn from_bytes(done: u64, total: Option<u64>) -> Self {
        match total {
            Some(total) if total > 0 => Self::fraction(done as f64 / total as f64),
            _ => Self::Indeterminate,
        }
    }

    /// A fraction clamped into `[0, 1]`. NaN becomes zero.
    #[must_use]
    pub fn fraction(value: f64) -> Self {
        if value.is_nan() {
            return Self::Fraction(0.0);
        }
        Self::Fraction(value.clamp(0.0, 1.0))
    }

    /// The fraction, if known.
    #[must_use]
    pub const fn as_fraction(self) -> Option<f64> {
        match self {
            Self::Fraction(value) => Some(value),
            Self::Indeterminate => None,
        }
    }

    /// Check if the length is unknown.
    #[must_use]
    pub const fn is_indeterminate(self) -> bool {
        matches!(self, Self::Indeterminate)
    }
}

impl Default for Progress {
    fn default() -> Self {
        Self::Fraction(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn session_ids_order_by_value() {
        assert!(SessionId::new(2) > SessionId::new(1));
        assert_eq!(SessionId::new(7).to_string(), "#7");
    }

    #[test]
    fn episode_kind_segments() {
        assert_eq!(EpisodeKind::Sub.as_str(), "sub");
        assert_eq!(EpisodeKind::Dub.to_string(), "dub");
    }

    #[test]
    fn progress_from_bytes_with_length() {
        assert_eq!(Progress::from_bytes(50, Some(200)), Progress::Fraction(0.25));
        assert_eq!(Progress::from_bytes(200, Some(200)), Progress::Fraction(1.0));
    }

    #[test]
    fn progress_from_bytes_without_length() {
        assert!(Progress::from_bytes(50, None).is_indeterminate());
        assert!(Progress::from_bytes(50, Some(0)).is_indeterminate());
    }

    #[test]
    fn progress_is_clamped() {
        assert_eq!(Progress::fraction(1.5), Progress::Fraction(1.0));
        assert_eq!(Progress::fraction(-0.5), Progress::Fraction(0.0));
        assert_eq!(Progress::fraction(f64::NAN), Progress::Fraction(0.0));
    }

    #[test]
    fn terminal_states() {
        assert!(SessionState::Complete.is_terminal());
        assert!(SessionState::Superseded.is_terminal());
        assert!(!SessionState::Paused.is_terminal());
        assert!(!SessionState::Cancelling.is_terminal());
    }

    #[test]
    fn terminal_update_decides_final_state() {
        use crate::download::DownloadError;
        use std::path::PathBuf;

        let id = SessionId::new(3);
        let done = StatusUpdate::completed(id, 1, Some(1), PathBuf::from("a.mp4"));
        assert_eq!(SessionState::ended_by(&done), SessionState::Complete);

        let replaced = StatusUpdate::failed(id, 0, None, DownloadError::Superseded);
        assert_eq!(SessionState::ended_by(&replaced), SessionState::Superseded);

        let cancelled = StatusUpdate::failed(id, 0, None, DownloadError::Cancelled);
        assert_eq!(SessionState::ended_by(&cancelled), SessionState::Failed);
    }
}
