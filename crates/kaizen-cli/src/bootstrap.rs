//! CLI bootstrap - the composition root.
//!
//! The only place where concrete adapters are instantiated:
//! - Catalog client (via kaizen-api)
//! - Download manager (via kaizen-download)
//! - External media player
//!
//! The event loop only sees the ports.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use kaizen_api::{ApiClientConfig, DefaultApiClient};
use kaizen_core::paths::DownloadDirSource;
use kaizen_core::{
    CatalogPort, MediaPlayerPort, Settings, load_settings, resolve_download_root,
    validate_settings,
};
use kaizen_download::{DownloadManager, TransferConfig};

use crate::app::{AppConfig, Services};
use crate::error::CliError;
use crate::parser::Cli;
use crate::player::ExternalPlayer;

/// Printed when the media player is missing.
pub const MISSING_PLAYER: &str =
    "[!] Please install MPV-player using your package manager before running kaizen";

/// Fully composed application context.
pub struct CliContext {
    /// Effective settings after command-line overrides.
    pub settings: Settings,
    /// Root of the download layout.
    pub download_root: PathBuf,
    /// Catalog client.
    pub catalog: Arc<dyn CatalogPort>,
    /// Background download manager.
    pub downloads: Arc<DownloadManager>,
    /// Media player.
    pub player: Arc<dyn MediaPlayerPort>,
}

impl std::fmt::Debug for CliContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CliContext")
            .field("settings", &self.settings)
            .field("download_root", &self.download_root)
            .finish_non_exhaustive()
    }
}

impl CliContext {
    /// Values the event loop needs.
    pub fn app_config(&self) -> AppConfig {
        AppConfig {
            download_root: self.download_root.clone(),
            poll_interval: Duration::from_millis(self.settings.effective_poll_interval_ms()),
        }
    }

    /// Adapters the event loop performs commands with.
    pub fn services(&self) -> Services {
        Services {
            catalog: Arc::clone(&self.catalog),
            player: Arc::clone(&self.player),
        }
    }
}

/// Apply command-line overrides on top of the settings file.
pub fn effective_settings(cli: &Cli, mut settings: Settings) -> Result<Settings, CliError> {
    if let Some(url) = &cli.api_url {
        settings.api_base_url = Some(url.clone());
    }
    validate_settings(&settings)?;
    Ok(settings)
}

/// Bootstrap the CLI with all dependencies wired up.
///
/// Must run inside the tokio runtime the download workers will use.
pub fn bootstrap(cli: &Cli) -> Result<CliContext, CliError> {
    let settings = effective_settings(cli, load_settings()?)?;

    let resolution = resolve_download_root(cli.download_dir.as_deref(), &settings)?;
    if resolution.source == DownloadDirSource::Default {
        tracing::debug!(target: "kaizen.cli", path = %resolution.path.display(), "using default download root");
    }

    let player = ExternalPlayer::from_settings(&settings);
    let player_path = player.locate().map_err(|err| {
        tracing::error!(target: "kaizen.cli", error = %err, "media player not found");
        CliError::MissingDependency(MISSING_PLAYER.to_string())
    })?;
    tracing::debug!(target: "kaizen.cli", player = %player_path.display(), "media player found");

    let api_config = ApiClientConfig::new().with_base_url(settings.effective_api_base_url());
    let catalog = DefaultApiClient::new(&api_config)?;
    let downloads = DownloadManager::new(TransferConfig::from_settings(&settings))?;

    tracing::info!(
        target: "kaizen.cli",
        download_root = %resolution.path.display(),
        api = %settings.effective_api_base_url(),
        "bootstrap complete"
    );

    Ok(CliContext {
        download_root: resolution.path,
        catalog: Arc::new(catalog),
        downloads: Arc::new(downloads),
        player: Arc::new(player),
        settings,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn api_url_flag_overrides_settings() {
        let cli = Cli::parse_from(["kaizen", "--api-url", "http://localhost:3000/api"]);
        let settings = effective_settings(&cli, Settings::with_defaults()).unwrap();
        assert_eq!(
            settings.effective_api_base_url(),
            "http://localhost:3000/api"
        );
    }

    #[test]
    fn settings_are_validated_after_overrides() {
        let cli = Cli::parse_from(["kaizen"]);
        let settings = Settings {
            player_command: Some("   ".to_string()),
            ..Settings::with_defaults()
        };
        assert!(matches!(
            effective_settings(&cli, settings),
            Err(CliError::Config(_))
        ));
    }
}
