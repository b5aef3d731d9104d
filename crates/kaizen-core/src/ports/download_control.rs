//! Download control port.
//!
//! This is the surface the UI event loop drives. Every method is
//! non-blocking: starting a session spawns a worker and returns at once,
//! and updates are drained with [`DownloadControlPort::try_next_update`].

use std::path::PathBuf;

use crate::download::{SessionId, StatusSnapshot, StatusUpdate};

/// What to fetch and where to put it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadRequest {
    /// Direct media URL.
    pub url: String,
    /// Directory that will hold the file; created if missing.
    pub directory: PathBuf,
    /// Filename inside `directory`.
    pub filename: String,
}

impl DownloadRequest {
    /// Create a new request.
    pub fn new(
        url: impl Into<String>,
        directory: impl Into<PathBuf>,
        filename: impl Into<String>,
    ) -> Self {
        Self {
            url: url.into(),
            directory: directory.into(),
            filename: filename.into(),
        }
    }

    /// Full destination path.
    #[must_use]
    pub fn destination(&self) -> PathBuf {
        self.directory.join(&self.filename)
    }
}

/// Port for starting and steering the single active download.
///
/// At most one session is active. Starting a new one supersedes the
/// previous session; its worker stops at the next chunk boundary and its
/// updates are tagged as superseded.
pub trait DownloadControlPort: Send + Sync {
    /// Start a new session and return its id.
    ///
    /// Setup failures (bad URL, unwritable directory) are not returned here;
    /// they arrive as the session's terminal update.
    fn start_download(&self, request: DownloadRequest) -> SessionId;

    /// Id of the active session, if any.
    fn active_session(&self) -> Option<SessionId>;

    /// Park the active worker. Returns `false` when nothing is running.
    fn pause(&self) -> bool;

    /// Wake a parked worker. Returns `false` when nothing is running.
    fn resume(&self) -> bool;

    /// Flip the paused flag of the active session.
    ///
    /// Returns the new paused state, or `None` when nothing is running.
    fn toggle_pause(&self) -> Option<bool>;

    /// Ask the active worker to stop. Returns `false` when nothing is running.
    fn cancel(&self) -> bool;

    /// Take the oldest pending update without waiting.
    fn try_next_update(&self) -> Option<StatusUpdate>;

    /// Percent, status and error of the active session as last observed.
    fn current_status(&self) -> StatusSnapshot;
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn _assert_object_safe(_: Arc<dyn DownloadControlPort>) {}

    #[test]
    fn destination_joins_directory_and_filename() {
        let request = DownloadRequest::new("http://x/y", "/videos/Show", "Show_ep1_sub.mp4");
        assert_eq!(
            request.destination(),
            PathBuf::from("/videos/Show/Show_ep1_sub.mp4")
        );
    }
}
