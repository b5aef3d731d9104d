//! Path utilities for kaizen config, data and download locations.
//!
//! # Design
//!
//! - Returns `PathBuf` and `PathError` for clear error handling
//! - No terminal I/O; the binary decides how to report failures

mod config;
mod downloads;
mod ensure;
mod error;
mod platform;

#[cfg(test)]
mod test_utils;

// Error type
pub use error::PathError;

// Platform roots
pub use platform::{APP_DIR_NAME, config_dir, data_dir, normalize_user_path};

// Download root
pub use downloads::{
    DEFAULT_DOWNLOAD_DIR_RELATIVE, DownloadDirResolution, DownloadDirSource, default_download_dir,
    resolve_download_root,
};

// Directory operations
pub use ensure::ensure_directory;

// Settings file
pub use config::{SETTINGS_FILE_NAME, load_settings, load_settings_from, settings_path};
