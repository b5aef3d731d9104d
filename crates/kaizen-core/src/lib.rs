//! Core domain types and port definitions for kaizen.
//!
//! This crate has no I/O beyond reading the settings file and creating
//! directories. Adapters (`kaizen-download`, `kaizen-api`, the binary)
//! implement the ports defined in [`ports`].

pub mod catalog;
pub mod download;
pub mod paths;
pub mod ports;
pub mod settings;

// Re-export commonly used types for convenience
pub use catalog::{Anime, Episodes, SearchQuery};
pub use download::{
    DownloadError, DownloadResult, DownloadStatus, EpisodeKind, Progress, SessionId, SessionState,
    SessionTracker, StatusSnapshot, StatusUpdate,
};
pub use ports::{
    CatalogError, CatalogPort, CatalogResult, DownloadControlPort, DownloadRequest,
    MediaPlayerPort, PlayerError,
};
pub use settings::{Settings, SettingsError, validate_settings};

// Re-export path utilities
pub use paths::{PathError, ensure_directory, load_settings, resolve_download_root};
