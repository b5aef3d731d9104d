//! Lifecycle of the active session and the snapshot shown for it.

use super::events::{DownloadStatus, StatusSnapshot, StatusUpdate};
use super::types::SessionState;

/// Session state and display snapshot, always changed together.
///
/// Pause and cancel requests only apply while the session is running or
/// paused. Once cancelling, only the worker's terminal update moves the
/// session on; once ended, nothing does until the next [`start`](Self::start).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionTracker {
    state: SessionState,
    snapshot: StatusSnapshot,
}

impl SessionTracker {
    /// An idle tracker.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current lifecycle state.
    #[must_use]
    pub const fn state(&self) -> SessionState {
        self.state
    }

    /// What the download panel shows.
    #[must_use]
    pub const fn snapshot(&self) -> &StatusSnapshot {
        &self.snapshot
    }

    /// A new session begins; whatever was tracked before is forgotten.
    pub fn start(&mut self) {
        self.state = SessionState::Running;
        self.snapshot = StatusSnapshot::started();
    }

    /// Record the worker's pause flag.
    ///
    /// Returns `false` when the session is not running or paused.
    pub fn set_paused(&mut self, paused: bool) -> bool {
        if !matches!(self.state, SessionState::Running | SessionState::Paused) {
            return false;
        }
        if paused {
            self.state = SessionState::Paused;
            self.snapshot.status = DownloadStatus::Paused;
        } else {
            self.state = SessionState::Running;
            self.snapshot.status = DownloadStatus::Downloading;
        }
        true
    }

    /// Record a cancel request.
    ///
    /// Returns `false` when the session is not running or paused.
    pub fn cancel_requested(&mut self) -> bool {
        if !matches!(self.state, SessionState::Running | SessionState::Paused) {
            return false;
        }
        self.state = SessionState::Cancelling;
        self.snapshot.status = DownloadStatus::Cancelling;
        true
    }

    /// Fold one update of the tracked session.
    ///
    /// Updates arriving after the session ended are ignored.
    pub fn apply(&mut self, update: &StatusUpdate) {
        if self.state.is_terminal() {
            return;
        }
        if update.complete {
            self.state = SessionState::ended_by(update);
        }
        self.snapshot.apply(update);
    }
}
