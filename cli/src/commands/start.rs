//! `dev-lxc start <release>`: start the container if it is stopped.

use std::process::ExitCode;

use anyhow::Result;

use crate::app::AppContext;
use crate::application::services::lifecycle::{self, EnsureOutcome};
use crate::commands::{ReleaseArg, existing_instance};

/// Run `dev-lxc start`.
///
/// # Errors
///
/// Returns an error if the instance cannot be queried or fails to start.
pub async fn run(args: &ReleaseArg, app: &AppContext) -> Result<ExitCode> {
    let name = existing_instance(app, args.release).await?;
    let outcome = lifecycle::ensure_running(&app.provisioner, &app.reporter(), &name).await?;
    if let EnsureOutcome::Untouched(status) = outcome {
        tracing::info!(instance = %name, %status, "not starting instance");
    }
    Ok(ExitCode::SUCCESS)
}
