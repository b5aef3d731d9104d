//! `--update`, `--uninstall` and `--version`.
//!
//! The installer drops `update.sh`, `uninstall.sh` and `VERSION` into the
//! data directory; these handlers only run or print them.

use std::path::{Path, PathBuf};

use tokio::process::Command;

use crate::error::CliError;

/// Script run by `--update`.
pub const UPDATE_SCRIPT: &str = "update.sh";

/// Script run by `--uninstall`.
pub const UNINSTALL_SCRIPT: &str = "uninstall.sh";

/// File printed by `--version`.
pub const VERSION_FILE: &str = "VERSION";

/// Run one of the installer scripts with `sh`, inheriting the terminal.
pub async fn run_script(data_dir: &Path, script: &str) -> Result<(), CliError> {
    let path = data_dir.join(script);
    if !path.is_file() {
        return Err(CliError::Io(format!(
            "{} not found; was kaizen installed with the install script?",
            path.display()
        )));
    }

    tracing::info!(target: "kaizen.cli", script = %path.display(), "running maintenance script");

    let status = Command::new("sh")
        .arg(&path)
        .status()
        .await
        .map_err(|e| CliError::Process(format!("failed to run {}: {e}", path.display())))?;

    if !status.success() {
        return Err(CliError::Process(format!(
            "{} exited with {status}",
            path.display()
        )));
    }

    Ok(())
}

/// Installed version: the `VERSION` file if present, else the crate version.
pub fn installed_version(data_dir: &Path) -> String {
    let path = version_path(data_dir);
    match std::fs::read_to_string(&path) {
        Ok(contents) if !contents.trim().is_empty() => contents.trim_end().to_string(),
        _ => format!("kaizen {}", env!("CARGO_PKG_VERSION")),
    }
}

fn version_path(data_dir: &Path) -> PathBuf {
    data_dir.join(VERSION_FILE)
}
