//! Destination planning for a transfer.

use std::path::{Path, PathBuf};

use kaizen_core::{DownloadError, DownloadRequest};

/// A validated destination: a directory plus one bare filename inside it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadDestination {
    /// Directory that will hold the file.
    pub directory: PathBuf,
    path: PathBuf,
}

impl DownloadDestination {
    /// Plan the destination of a request.
    ///
    /// The filename must be a single non-empty path component.
    pub fn plan(request: &DownloadRequest) -> Result<Self, DownloadError> {
        let filename = request.filename.trim();
        if filename.is_empty() {
            return Err(DownloadError::invalid_request("empty filename"));
        }
        if filename.contains(['/', '\\']) || filename == "." || filename == ".." {
            return Err(DownloadError::invalid_request(format!(
                "filename must not contain path separators: {filename}"
            )));
        }
        if request.directory.as_os_str().is_empty() {
            return Err(DownloadError::invalid_request("empty download directory"));
        }

        Ok(Self {
            directory: request.directory.clone(),
            path: request.directory.join(filename),
        })
    }

    /// Create the directory if it is missing.
    pub async fn ensure_dir(&self) -> Result<(), DownloadError> {
        tokio::fs::create_dir_all(&self.directory).await.map_err(|e| {
            DownloadError::io(
                "create_dir",
                format!("{}: {e}", self.directory.display()),
            )
        })
    }

    /// Full path of the file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Remove a partially written file, ignoring a file that is already gone.
    pub async fn remove_partial(&self) {
        match tokio::fs::remove_file(&self.path).await {
            Ok(()) => {
                tracing::debug!(
                    target: "kaizen.download",
                    path = %self.path.display(),
                    "removed partial file"
                );
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => {
                tracing::warn!(
                    target: "kaizen.download",
                    path = %self.path.display(),
                    error = %e,
                    "failed to remove partial file"
                );
            }
        }
    }
}
