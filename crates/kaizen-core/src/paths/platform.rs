//! Platform directories and user path normalization.

use std::env;
use std::path::PathBuf;

use super::error::PathError;

/// Application directory name under the platform config/data roots.
pub const APP_DIR_NAME: &str = "kaizen";

/// Directory holding `settings.json`.
///
/// Resolution order:
/// 1. `KAIZEN_CONFIG_DIR` environment variable
/// 2. Platform config directory (e.g., `~/.config/kaizen`)
pub fn config_dir() -> Result<PathBuf, PathError> {
    if let Ok(path) = env::var("KAIZEN_CONFIG_DIR") {
        if !path.trim().is_empty() {
            return normalize_user_path(&path);
        }
    }

    let base = dirs::config_dir().ok_or(PathError::NoSystemDir("config"))?;
    Ok(base.join(APP_DIR_NAME))
}

/// Directory holding the log file and the maintenance scripts.
///
/// Resolution order:
/// 1. `KAIZEN_DATA_DIR` environment variable
/// 2. `~/.local/kaizen`, where the installer drops `update.sh`,
///    `uninstall.sh` and `VERSION`
pub fn data_dir() -> Result<PathBuf, PathError> {
    if let Ok(path) = env::var("KAIZEN_DATA_DIR") {
        if !path.trim().is_empty() {
            return normalize_user_path(&path);
        }
    }

    let home = dirs::home_dir().ok_or(PathError::NoHomeDir)?;
    Ok(home.join(".local").join(APP_DIR_NAME))
}

/// Normalize a user-provided path, expanding `~` and making it absolute.
pub fn normalize_user_path(raw: &str) -> Result<PathBuf, PathError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(PathError::EmptyPath);
    }

    let expanded = if trimmed.starts_with("~/") || trimmed == "~" {
        let home = dirs::home_dir().ok_or(PathError::NoHomeDir)?;
        if trimmed == "~" {
            home
        } else {
            home.join(trimmed.trim_start_matches("~/"))
        }
    } else {
        PathBuf::from(trimmed)
    };

    if expanded.is_absolute() {
        Ok(expanded)
    } else {
        env::current_dir()
            .map(|cwd| cwd.join(expanded))
            .map_err(|e| PathError::CurrentDirError(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::paths::test_utils::{ENV_LOCK, EnvVarGuard};

    #[test]
    fn test_normalize_rejects_empty() {
        assert!(matches!(normalize_user_path("  "), Err(PathError::EmptyPath)));
    }

    #[test]
    fn test_normalize_expands_home() {
        let home = dirs::home_dir().unwrap();
        assert_eq!(normalize_user_path("~").unwrap(), home);
        assert_eq!(
            normalize_user_path("~/Videos").unwrap(),
            home.join("Videos")
        );
    }

    #[test]
    fn test_normalize_makes_relative_absolute() {
        let path = normalize_user_path("anime").unwrap();
        assert!(path.is_absolute());
        assert!(path.ends_with("anime"));
    }

    #[test]
    fn test_config_dir_env_override() {
        let _lock = ENV_LOCK.lock().unwrap();
        let _env = EnvVarGuard::set("KAIZEN_CONFIG_DIR", "/tmp/kaizen-conf");
        assert_eq!(config_dir().unwrap(), PathBuf::from("/tmp/kaizen-conf"));
    }

    #[test]
    fn test_data_dir_defaults_under_local() {
        let _lock = ENV_LOCK.lock().unwrap();
        let _env = EnvVarGuard::remove("KAIZEN_DATA_DIR");
        let dir = data_dir().unwrap();
        assert!(dir.ends_with(".local/kaizen"));
    }
}
