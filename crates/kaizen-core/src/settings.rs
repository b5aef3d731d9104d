//! Settings domain types and validation.
//!
//! Settings are read from a JSON file; every field is optional so a partial
//! file only overrides what it names.

use serde::{Deserialize, Serialize};

/// Default base URL of the catalog API.
pub const DEFAULT_API_BASE_URL: &str = "https://heavenscape.vercel.app/api/anime";

/// Default interval between poll ticks of the download panel.
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 100;

/// Default minimum interval between progress reports of a worker.
pub const DEFAULT_PROGRESS_INTERVAL_MS: u64 = 100;

/// Default read size of a worker, in KiB.
pub const DEFAULT_CHUNK_SIZE_KB: u32 = 32;

/// Default external media player.
pub const DEFAULT_PLAYER_COMMAND: &str = "mpv";

const MAX_CHUNK_SIZE_KB: u32 = 1024;
const MAX_INTERVAL_MS: u64 = 10_000;

/// Application settings structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    /// Root directory for downloaded episodes.
    pub download_dir: Option<String>,

    /// Interval between poll ticks of the download panel, in milliseconds.
    pub poll_interval_ms: Option<u64>,

    /// Minimum interval between progress reports of a worker, in milliseconds.
    pub progress_interval_ms: Option<u64>,

    /// Read size of a worker, in KiB.
    pub chunk_size_kb: Option<u32>,

    /// Base URL of the catalog API.
    pub api_base_url: Option<String>,

    /// Media player binary.
    pub player_command: Option<String>,

    /// Arguments passed to the player before the stream URL.
    pub player_args: Option<Vec<String>>,

    /// Border colour of the focused component.
    pub focus_active_color: Option<String>,

    /// Border colour of unfocused components.
    pub focus_inactive_color: Option<String>,

    /// Accent colour for tabs, gauge and highlights.
    pub accent_color: Option<String>,
}

impl Settings {
    /// Create settings with sensible defaults.
    #[must_use]
    pub fn with_defaults() -> Self {
        Self {
            download_dir: None,
            poll_interval_ms: Some(DEFAULT_POLL_INTERVAL_MS),
            progress_interval_ms: Some(DEFAULT_PROGRESS_INTERVAL_MS),
            chunk_size_kb: Some(DEFAULT_CHUNK_SIZE_KB),
            api_base_url: Some(DEFAULT_API_BASE_URL.to_string()),
            player_command: Some(DEFAULT_PLAYER_COMMAND.to_string()),
            player_args: Some(vec!["-fs".to_string()]),
            focus_active_color: Some("#5f5fd7".to_string()),
            focus_inactive_color: Some("#585858".to_string()),
            accent_color: Some("#00afaf".to_string()),
        }
    }

    /// Get the effective poll interval (with default fallback).
    #[must_use]
    pub fn effective_poll_interval_ms(&self) -> u64 {
        self.poll_interval_ms.unwrap_or(DEFAULT_POLL_INTERVAL_MS)
    }

    /// Get the effective progress interval (with default fallback).
    #[must_use]
    pub fn effective_progress_interval_ms(&self) -> u64 {
        self.progress_interval_ms
            .unwrap_or(DEFAULT_PROGRESS_INTERVAL_MS)
    }

    /// Get the effective chunk size in bytes.
    #[must_use]
    pub fn effective_chunk_size(&self) -> usize {
        self.chunk_size_kb.unwrap_or(DEFAULT_CHUNK_SIZE_KB) as usize * 1024
    }

    /// Get the effective catalog base URL.
    #[must_use]
    pub fn effective_api_base_url(&self) -> &str {
        self.api_base_url.as_deref().unwrap_or(DEFAULT_API_BASE_URL)
    }

    /// Get the effective player command.
    #[must_use]
    pub fn effective_player_command(&self) -> &str {
        self.player_command
            .as_deref()
            .unwrap_or(DEFAULT_PLAYER_COMMAND)
    }

    /// Merge another settings into this one, only updating fields that are Some.
    pub fn merge(&mut self, other: &Self) {
        if other.download_dir.is_some() {
            self.download_dir.clone_from(&other.download_dir);
        }
        if other.poll_interval_ms.is_some() {
            self.poll_interval_ms = other.poll_interval_ms;
        }
        if other.progress_interval_ms.is_some() {
            self.progress_interval_ms = other.progress_interval_ms;
        }
        if other.chunk_size_kb.is_some() {
            self.chunk_size_kb = other.chunk_size_kb;
        }
        if other.api_base_url.is_some() {
            self.api_base_url.clone_from(&other.api_base_url);
        }
        if other.player_command.is_some() {
            self.player_command.clone_from(&other.player_command);
        }
        if other.player_args.is_some() {
            self.player_args.clone_from(&other.player_args);
        }
        if other.focus_active_color.is_some() {
            self.focus_active_color.clone_from(&other.focus_active_color);
        }
        if other.focus_inactive_color.is_some() {
            self.focus_inactive_color
                .clone_from(&other.focus_inactive_color);
        }
        if other.accent_color.is_some() {
            self.accent_color.clone_from(&other.accent_color);
        }
    }
}

/// Settings validation error.
#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum SettingsError {
    #[error("{field} must be between 1 and 10000 ms, got {value}")]
    InvalidInterval { field: &'static str, value: u64 },

    #[error("Chunk size must be between 1 and 1024 KiB, got {0}")]
    InvalidChunkSize(u32),

    #[error("API base URL must start with http:// or https://, got '{0}'")]
    InvalidApiUrl(String),

    #[error("Player command cannot be empty")]
    EmptyPlayerCommand,

    #[error("Download directory cannot be empty")]
    EmptyDownloadDir,
}

/// Validate settings values.
pub fn validate_settings(settings: &Settings) -> Result<(), SettingsError> {
    for (field, value) in [
        ("poll_interval_ms", settings.poll_interval_ms),
        ("progress_interval_ms", settings.progress_interval_ms),
    ] {
        if let Some(value) = value {
            if !(1..=MAX_INTERVAL_MS).contains(&value) {
                return Err(SettingsError::InvalidInterval { field, value });
            }
        }
    }

    if let Some(chunk) = settings.chunk_size_kb {
        if !(1..=MAX_CHUNK_SIZE_KB).contains(&chunk) {
            return Err(SettingsError::InvalidChunkSize(chunk));
        }
    }

    if let Some(ref url) = settings.api_base_url {
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(SettingsError::InvalidApiUrl(url.clone()));
        }
    }

    if settings
        .player_command
        .as_ref()
        .is_some_and(|p| p.trim().is_empty())
    {
        return Err(SettingsError::EmptyPlayerCommand);
    }

    if settings
        .download_dir
        .as_ref()
        .is_some_and(|p| p.trim().is_empty())
    {
        return Err(SettingsError::EmptyDownloadDir);
    }

    Ok(())
}
