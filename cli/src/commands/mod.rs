//! Command implementations

pub mod create;
pub mod exec;
pub mod remove;
pub mod shell;
pub mod start;
pub mod stop;

use std::process::{ExitCode, ExitStatus};

use anyhow::Result;
use clap::Args;

use crate::app::AppContext;
use crate::application::services::resolve;
use crate::domain::Release;

/// The release positional shared by every subcommand.
#[derive(Args)]
pub struct ReleaseArg {
    /// The Ubuntu release used as the base for the container
    #[arg(value_enum)]
    pub release: Release,
}

/// Resolve the existing instance of the current project on `release`.
///
/// # Errors
///
/// Returns an error if the instances cannot be listed or the user cancels.
pub async fn existing_instance(app: &AppContext, release: Release) -> Result<String> {
    let base = app.project.instance_name(release);
    resolve::existing_instance(&app.provisioner, &app.prompter, &base).await
}

/// Map a child's exit status onto this process's exit code.
#[must_use]
pub fn exit_code(status: ExitStatus) -> ExitCode {
    let code = status.code().unwrap_or(1);
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    ExitCode::from(code as u8)
}
