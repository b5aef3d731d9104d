//! Status updates produced by transfer workers and the snapshot the UI renders.

use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use super::errors::DownloadError;
use super::types::{Progress, SessionId};

/// One report from a transfer worker.
///
/// Progress updates have `complete == false` and no error. Every session
/// ends with exactly one terminal update (`complete == true`) that carries
/// either the final path or the error that stopped it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusUpdate {
    /// Session that produced this update.
    pub session: SessionId,
    /// Fraction transferred, or indeterminate when no length was declared.
    pub progress: Progress,
    /// Bytes written to disk so far.
    pub bytes_transferred: u64,
    /// Length declared by the server, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_bytes: Option<u64>,
    /// Whether this is the last update of the session.
    pub complete: bool,
    /// Error that ended the session.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<DownloadError>,
    /// Final file path on success.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result_path: Option<PathBuf>,
}

impl StatusUpdate {
    /// An intermediate progress report.
    #[must_use]
    pub fn progress(session: SessionId, bytes_transferred: u64, total_bytes: Option<u64>) -> Self {
        Self {
            session,
            progress: Progress::from_bytes(bytes_transferred, total_bytes),
            bytes_transferred,
            total_bytes,
            complete: false,
            error: None,
            result_path: None,
        }
    }

    /// The terminal report of a successful transfer.
    #[must_use]
    pub fn completed(
        session: SessionId,
        bytes_transferred: u64,
        total_bytes: Option<u64>,
        path: PathBuf,
    ) -> Self {
        Self {
            session,
            progress: Progress::Fraction(1.0),
            bytes_transferred,
            total_bytes,
            complete: true,
            error: None,
            result_path: Some(path),
        }
    }

    /// The terminal report of a transfer that stopped early.
    #[must_use]
    pub fn failed(
        session: SessionId,
        bytes_transferred: u64,
        total_bytes: Option<u64>,
        error: DownloadError,
    ) -> Self {
        Self {
            session,
            progress: Progress::from_bytes(bytes_transferred, total_bytes),
            bytes_transferred,
            total_bytes,
            complete: true,
            error: Some(error),
            result_path: None,
        }
    }

    /// Check if this update ends its session.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        self.complete
    }

    /// Check if this update comes from a worker that was replaced.
    #[must_use]
    pub fn is_superseded(&self) -> bool {
        self.error.as_ref().is_some_and(DownloadError::is_superseded)
    }
}

/// User-visible state of the download panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DownloadStatus {
    /// Nothing in flight.
    #[default]
    Ready,
    /// Transfer running.
    Downloading,
    /// Transfer parked by the user.
    Paused,
    /// Cancel requested, waiting for the worker.
    Cancelling,
    /// Finished successfully.
    Complete,
    /// Finished with an error.
    Failed,
    /// Stopped by the user.
    Cancelled,
}

impl DownloadStatus {
    /// The label shown in the download panel.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Ready => "Ready",
            Self::Downloading => "Downloading…",
            Self::Paused => "Paused",
            Self::Cancelling => "Cancelling…",
            Self::Complete => "Download Complete!",
            Self::Failed => "Download Failed",
            Self::Cancelled => "Download Cancelled",
        }
    }

    /// Check if this status ends a session.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Complete | Self::Failed | Self::Cancelled)
    }
}

impl fmt::Display for DownloadStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// What the UI shows for the current session: percent, status and error.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct StatusSnapshot {
    /// Last known fraction in `[0, 1]`.
    pub percent: f64,
    /// Whether the last progress report had no declared length.
    pub indeterminate: bool,
    /// Current status.
    pub status: DownloadStatus,
    /// One-line error detail for failed or cancelled sessions.
    pub error: Option<String>,
}

impl StatusSnapshot {
    /// Snapshot for a freshly started session.
    #[must_use]
    pub const fn started() -> Self {
        Self {
            percent: 0.0,
            indeterminate: false,
            status: DownloadStatus::Downloading,
            error: None,
        }
    }

    /// The status label.
    #[must_use]
    pub const fn status_text(&self) -> &'static str {
        self.status.label()
    }

    /// Fold one update into the snapshot.
    ///
    /// Returns `false` without touching the snapshot when the update comes
    /// from a superseded worker. Progress reports keep a `Paused` or
    /// `Cancelling` status so a report already in flight does not undo the
    /// user's last action.
    pub fn apply(&mut self, update: &StatusUpdate) -> bool {
        if update.is_superseded() {
            return false;
        }

        match update.progress {
            Progress::Fraction(value) => {
                self.percent = value;
                self.indeterminate = false;
            }
            Progress::Indeterminate => self.indeterminate = true,
        }

        if !update.complete {
            if !matches!(
                self.status,
                DownloadStatus::Paused | DownloadStatus::Cancelling
            ) {
                self.status = DownloadStatus::Downloading;
            }
            return true;
        }

        match &update.error {
            None => {
                self.percent = 1.0;
                self.indeterminate = false;
                self.status = DownloadStatus::Complete;
                self.error = None;
            }
            Some(err) if err.is_cancelled() => {
                self.status = DownloadStatus::Cancelled;
                self.error = Some(err.to_string());
            }
            Some(err) => {
                self.status = DownloadStatus::Failed;
                self.error = Some(err.user_message());
            }
        }
        true
    }
}
