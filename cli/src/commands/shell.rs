//! `dev-lxc shell <release>`: interactive bash session in the container.

use std::process::ExitCode;

use anyhow::Result;
use clap::Args;

use crate::app::AppContext;
use crate::application::ports::ProgressReporter;
use crate::application::services::lifecycle;
use crate::commands::{existing_instance, exit_code};
use crate::domain::Release;

/// Arguments for the shell command.
#[derive(Args)]
pub struct ShellArgs {
    /// The Ubuntu release used as the base for the container
    #[arg(value_enum)]
    pub release: Release,

    /// Stop the container after exiting the shell
    #[arg(long)]
    pub stop_after: bool,
}

/// Run `dev-lxc shell`.
///
/// Exits with the session's exit code.
///
/// # Errors
///
/// Returns an error if the instance cannot be resolved or started, or the
/// session cannot be spawned.
pub async fn run(args: &ShellArgs, app: &AppContext) -> Result<ExitCode> {
    let name = existing_instance(app, args.release).await?;
    let reporter = app.reporter();
    let status = lifecycle::shell(&app.provisioner, &reporter, &app.project, &name).await?;

    if args.stop_after {
        reporter.step(&format!("Stopping {name}"));
        lifecycle::stop(&app.provisioner, &name).await?;
    }
    Ok(exit_code(status))
}
