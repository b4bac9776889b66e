//! `dev-lxc stop <release>`: stop the container.

use std::process::ExitCode;

use anyhow::Result;

use crate::app::AppContext;
use crate::application::services::lifecycle;
use crate::commands::{ReleaseArg, exit_code, existing_instance};

/// Run `dev-lxc stop`.
///
/// The stop is requested whatever the current state; the runtime's verdict
/// becomes the exit code.
///
/// # Errors
///
/// Returns an error if the instance cannot be resolved or `lxc` cannot be run.
pub async fn run(args: &ReleaseArg, app: &AppContext) -> Result<ExitCode> {
    let name = existing_instance(app, args.release).await?;
    let status = lifecycle::stop(&app.provisioner, &name).await?;
    Ok(exit_code(status))
}
