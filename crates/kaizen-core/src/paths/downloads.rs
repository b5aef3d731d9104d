//! Download root resolution.

use std::env;
use std::path::PathBuf;

use super::error::PathError;
use super::platform::normalize_user_path;
use crate::settings::Settings;

/// Default download root relative to the home directory.
pub const DEFAULT_DOWNLOAD_DIR_RELATIVE: &str = "Videos/Kaizen";

/// How the download root was derived.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DownloadDirSource {
    /// The user passed `--download-dir`.
    Explicit,
    /// `KAIZEN_DOWNLOAD_DIR` environment variable / `.env`.
    EnvVar,
    /// `download_dir` in the settings file.
    Settings,
    /// Fallback default (`~/Videos/Kaizen`).
    Default,
}

/// Resolution result for the download root.
#[derive(Debug, Clone)]
pub struct DownloadDirResolution {
    /// The resolved root directory.
    pub path: PathBuf,
    /// How the path was determined.
    pub source: DownloadDirSource,
}

/// Return the default download root.
pub fn default_download_dir() -> Result<PathBuf, PathError> {
    let home = dirs::home_dir().ok_or(PathError::NoHomeDir)?;
    Ok(home.join(DEFAULT_DOWNLOAD_DIR_RELATIVE))
}

/// Resolve the download root.
///
/// Resolution order:
/// 1. Explicit path provided by caller (highest priority)
/// 2. `KAIZEN_DOWNLOAD_DIR` environment variable
/// 3. `download_dir` from settings
/// 4. `~/Videos/Kaizen`
///
/// The directory is not created here; each worker creates its title
/// directory on demand.
pub fn resolve_download_root(
    explicit: Option<&str>,
    settings: &Settings,
) -> Result<DownloadDirResolution, PathError> {
    if let Some(path_str) = explicit {
        return Ok(DownloadDirResolution {
            path: normalize_user_path(path_str)?,
            source: DownloadDirSource::Explicit,
        });
    }

    if let Ok(env_path) = env::var("KAIZEN_DOWNLOAD_DIR") {
        if !env_path.trim().is_empty() {
            return Ok(DownloadDirResolution {
                path: normalize_user_path(&env_path)?,
                source: DownloadDirSource::EnvVar,
            });
        }
    }

    if let Some(ref configured) = settings.download_dir {
        return Ok(DownloadDirResolution {
            path: normalize_user_path(configured)?,
            source: DownloadDirSource::Settings,
        });
    }

    Ok(DownloadDirResolution {
        path: default_download_dir()?,
        source: DownloadDirSource::Default,
    })
}
