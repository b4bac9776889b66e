//! `dev-lxc exec <release> <command>`: run a command in the container.

use std::process::{ExitCode, ExitStatus};

use anyhow::Result;
use clap::Args;
use regex::Regex;

use crate::app::AppContext;
use crate::application::ports::ProgressReporter;
use crate::application::services::lifecycle::{self, CreateRequest};
use crate::commands::{existing_instance, exit_code};
use crate::domain::Release;
use crate::infra::host;

/// Environment assignment accepted by `--env`.
const ENV_ASSIGNMENT: &str = r"^[A-Za-z_][A-Za-z0-9_]*=";

/// Arguments for the exec command.
#[derive(Args)]
pub struct ExecArgs {
    /// The Ubuntu release used as the base for the container
    #[arg(value_enum)]
    pub release: Release,

    /// The command to execute, run through `bash -c`
    pub command: String,

    /// Environment variable for the command (repeatable)
    #[arg(long, value_name = "KEY=VALUE", value_parser = parse_env_assignment)]
    pub env: Vec<String>,

    /// Stop the container after execution completes
    #[arg(long)]
    pub stop_after: bool,

    /// Use a temporary container that is deleted afterwards
    #[arg(long)]
    pub ephemeral: bool,
}

fn parse_env_assignment(value: &str) -> Result<String, String> {
    let re = Regex::new(ENV_ASSIGNMENT).map_err(|e| e.to_string())?;
    if re.is_match(value) {
        Ok(value.to_string())
    } else {
        Err(format!("expected KEY=VALUE, got '{value}'"))
    }
}

/// Run `dev-lxc exec`.
///
/// Exits with the command's own exit code.
///
/// # Errors
///
/// Returns an error if the instance cannot be resolved or started, or the
/// command cannot be spawned.
pub async fn run(args: &ExecArgs, app: &AppContext) -> Result<ExitCode> {
    let reporter = app.reporter();

    if args.ephemeral {
        let req = CreateRequest {
            project: &app.project,
            release: args.release,
            host_uid: host::current_uid(),
            config: None,
            profile: None,
        };
        let (name, status) =
            lifecycle::exec_ephemeral(&app.provisioner, &reporter, &req, &args.command, &args.env)
                .await?;
        report_completion(app, &name, &args.command, status);
        return Ok(exit_code(status));
    }

    let name = existing_instance(app, args.release).await?;
    let status = lifecycle::exec(
        &app.provisioner,
        &reporter,
        &app.project,
        &name,
        &args.command,
        &args.env,
    )
    .await?;
    report_completion(app, &name, &args.command, status);

    if args.stop_after {
        reporter.step(&format!("Stopping {name}"));
        lifecycle::stop(&app.provisioner, &name).await?;
    }
    Ok(exit_code(status))
}

/// Print the fixed completion message for a command run in `name`.
pub(crate) fn report_completion(app: &AppContext, name: &str, command: &str, status: ExitStatus) {
    if status.success() {
        app.output.line("Command execution completed successfully");
    } else {
        app.output
            .error(&format!("Error running command {command} on instance {name}"));
    }
}
