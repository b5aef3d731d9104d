//! Download domain: session types, status updates and the on-disk layout.
//!
//! # Structure
//!
//! - `types` - Session identity, episode kind, progress
//! - `errors` - `DownloadError` carried by terminal updates
//! - `events` - `StatusUpdate`, `DownloadStatus`, `StatusSnapshot`
//! - `naming` - Directory and filename rules for downloaded episodes
//! - `tracker` - Lifecycle and displayed status of the active session

mod errors;
mod events;
mod naming;
mod tracker;
mod types;

pub use errors::{DownloadError, DownloadResult};
pub use events::{DownloadStatus, StatusSnapshot, StatusUpdate};
pub use naming::{
    EPISODE_EXTENSION, episode_filename, episode_path, sanitize_title, title_dir,
};
pub use tracker::SessionTracker;
pub use types::{EpisodeKind, Progress, SessionId, SessionState};
