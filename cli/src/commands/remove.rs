//! `dev-lxc remove <release>`: force-delete the container.

use std::process::ExitCode;

use anyhow::Result;

use crate::app::AppContext;
use crate::application::services::lifecycle;
use crate::commands::{ReleaseArg, existing_instance};

/// Run `dev-lxc remove`.
///
/// There is no confirmation: the instance is deleted even when running.
///
/// # Errors
///
/// Returns an error if the instance cannot be resolved or `lxc` cannot be run.
pub async fn run(args: &ReleaseArg, app: &AppContext) -> Result<ExitCode> {
    let name = existing_instance(app, args.release).await?;
    let status = lifecycle::remove(&app.provisioner, &name).await?;

    // The runtime has already printed its own error output.
    if status.success() {
        app.output.line(&format!("Removed instance {name}"));
        Ok(ExitCode::SUCCESS)
    } else {
        app.output.error(&format!("Unable to remove instance {name}"));
        Ok(ExitCode::FAILURE)
    }
}
