//! CLI entry point.

use std::process::ExitCode;
use std::time::Duration;

use clap::Parser;

use kaizen_cli::app::{App, Theme};
use kaizen_cli::maintenance::{self, UNINSTALL_SCRIPT, UPDATE_SCRIPT};
use kaizen_cli::{Cli, CliContext, CliError, RunMode, bootstrap, logging};
use kaizen_core::paths::data_dir;

/// How long to wait for a cancelled download to remove its partial file.
const SHUTDOWN_GRACE: Duration = Duration::from_secs(2);

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    // Load environment variables
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    match run(&cli).await {
        Ok(()) => Ok(ExitCode::SUCCESS),
        Err(err) => {
            eprintln!("{err}");
            Ok(ExitCode::from(u8::try_from(err.exit_code()).unwrap_or(1)))
        }
    }
}

async fn run(cli: &Cli) -> Result<(), CliError> {
    let data_dir = data_dir()?;
    let _log_guard = logging::init_tracing(&data_dir, cli.verbose)?;

    match cli.mode() {
        RunMode::Version => {
            println!("{}", maintenance::installed_version(&data_dir));
            Ok(())
        }
        RunMode::Update => maintenance::run_script(&data_dir, UPDATE_SCRIPT).await,
        RunMode::Uninstall => maintenance::run_script(&data_dir, UNINSTALL_SCRIPT).await,
        RunMode::Interactive => {
            let ctx = bootstrap(cli)?;
            let result = interactive(&ctx).await;
            shutdown_downloads(&ctx).await;
            if let Err(err) = &result {
                tracing::error!(target: "kaizen.cli", error = %err, "interface stopped with error");
            }
            result
        }
    }
}

async fn interactive(ctx: &CliContext) -> Result<(), CliError> {
    let theme = Theme::from_settings(&ctx.settings);
    let services = ctx.services();
    let mut app = App::new(ctx.app_config(), ctx.downloads.clone());

    let mut terminal = ratatui::try_init()?;
    let result = kaizen_cli::app::run(&mut terminal, &mut app, &theme, &services).await;
    ratatui::restore();
    result.map_err(CliError::from)
}

/// Cancel a download still in flight and give it a moment to clean up.
async fn shutdown_downloads(ctx: &CliContext) {
    let Some(task) = ctx.downloads.shutdown() else {
        return;
    };
    match tokio::time::timeout(SHUTDOWN_GRACE, task).await {
        Ok(Ok(update)) => {
            tracing::info!(target: "kaizen.cli", session = %update.session, "download stopped on exit");
        }
        Ok(Err(err)) => tracing::warn!(target: "kaizen.cli", error = %err, "download task failed"),
        Err(_) => tracing::warn!(target: "kaizen.cli", "download did not stop in time"),
    }
}
