//! Main CLI parser and top-level argument handling.

use clap::Parser;

/// Command-line interface for the kaizen terminal client.
///
/// Without a maintenance flag the interactive interface starts.
#[derive(Debug, Parser)]
#[command(name = "kaizen")]
#[command(about = "Search, stream and download anime from your terminal")]
#[command(disable_version_flag = true)]
pub struct Cli {
    /// Root directory for downloaded episodes
    #[arg(long = "download-dir", env = "KAIZEN_DOWNLOAD_DIR", value_name = "DIR")]
    pub download_dir: Option<String>,

    /// Base URL of the catalog API
    #[arg(long = "api-url", env = "KAIZEN_API_URL", value_name = "URL")]
    pub api_url: Option<String>,

    /// Enable debug logging
    #[arg(long = "verbose")]
    pub verbose: bool,

    /// Run the update script
    #[arg(long = "update", conflicts_with_all = ["uninstall", "version"])]
    pub update: bool,

    /// Run the uninstall script
    #[arg(long = "uninstall", conflicts_with = "version")]
    pub uninstall: bool,

    /// Print version information
    #[arg(short = 'v', long = "version")]
    pub version: bool,
}

/// What this invocation should do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunMode {
    /// Start the terminal interface.
    Interactive,
    /// Run `update.sh`.
    Update,
    /// Run `uninstall.sh`.
    Uninstall,
    /// Print the installed version.
    Version,
}

impl Cli {
    /// The mode selected by the flags.
    pub const fn mode(&self) -> RunMode {
        if self.uninstall {
            RunMode::Uninstall
        } else if self.version {
            RunMode::Version
        } else if self.update {
            RunMode::Update
        } else {
            RunMode::Interactive
        }
    }
}
