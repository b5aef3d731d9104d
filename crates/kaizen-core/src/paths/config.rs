//! Settings file location and loading.

use std::fs;
use std::path::{Path, PathBuf};

use super::error::PathError;
use super::platform::config_dir;
use crate::settings::Settings;

/// Filename of the settings file inside the config directory.
pub const SETTINGS_FILE_NAME: &str = "settings.json";

/// Path to the settings file.
pub fn settings_path() -> Result<PathBuf, PathError> {
    Ok(config_dir()?.join(SETTINGS_FILE_NAME))
}

/// Load settings from the default location, layered over the defaults.
pub fn load_settings() -> Result<Settings, PathError> {
    load_settings_from(&settings_path()?)
}

/// Load settings from `path`, layered over the defaults.
///
/// A missing file yields the defaults. A file that exists but cannot be
/// read or parsed is an error, so a typo never silently resets the user's
/// configuration.
pub fn load_settings_from(path: &Path) -> Result<Settings, PathError> {
    let mut settings = Settings::with_defaults();
    if !path.exists() {
        tracing::debug!(
            target: "kaizen.config",
            path = %path.display(),
            "no settings file, using defaults"
        );
        return Ok(settings);
    }

    let raw = fs::read_to_string(path).map_err(|e| PathError::SettingsFile {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    let file: Settings = serde_json::from_str(&raw).map_err(|e| PathError::SettingsFile {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;

    settings.merge(&file);
    tracing::debug!(target: "kaizen.config", path = %path.display(), "loaded settings file");
    Ok(settings)
}
