//! Port definitions (trait abstractions) for external systems.
//!
//! Ports are owned by core and implemented by adapter crates:
//! - `CatalogPort` by `kaizen-api`
//! - `DownloadControlPort` by `kaizen-download`
//! - `MediaPlayerPort` by the binary

pub mod catalog;
pub mod download_control;
pub mod media_player;

pub use catalog::{CatalogError, CatalogPort, CatalogResult};
pub use download_control::{DownloadControlPort, DownloadRequest};
pub use media_player::{MediaPlayerPort, PlayerError};
