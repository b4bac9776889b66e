//! `dev-lxc create <release>`: launch, initialize, and mount a new container.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::Result;
use clap::Args;

use crate::app::AppContext;
use crate::application::ports::ProgressReporter;
use crate::application::services::lifecycle::{self, CreateRequest};
use crate::commands::exec::report_completion;
use crate::domain::Release;
use crate::domain::config::post_create_commands;
use crate::infra::{config, host};

/// Arguments for the create command.
#[derive(Args)]
pub struct CreateArgs {
    /// The Ubuntu release used as the base for the container
    #[arg(value_enum)]
    pub release: Release,

    /// The path to a LXD config to apply to the instance
    ///
    /// Defaults to the first of .dev-lxc/<release>.yaml, .dev-lxc/base.yaml,
    /// ~/.dev-lxc/<release>.yaml, ~/.dev-lxc/base.yaml that exists.
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// The name of a LXD profile to apply to the instance
    #[arg(short, long)]
    pub profile: Option<String>,
}

/// Run `dev-lxc create`.
///
/// # Errors
///
/// Returns an error if the instance already exists, the config cannot be
/// read, or the launch or mount fails.
pub async fn run(args: &CreateArgs, app: &AppContext) -> Result<ExitCode> {
    let config = args
        .config
        .clone()
        .or_else(|| config::discover(args.release, app.project.root(), None));
    if let Some(path) = &config {
        app.output.line(&format!("Using config {}", path.display()));
    }

    let reporter = app.reporter();
    let name = lifecycle::create(
        &app.provisioner,
        &reporter,
        &CreateRequest {
            project: &app.project,
            release: args.release,
            host_uid: host::current_uid(),
            config: config.as_deref(),
            profile: args.profile.as_deref(),
        },
    )
    .await?;
    reporter.success(&format!("Created {name}"));

    if let Some(path) = &config {
        run_post_create(app, &reporter, &name, path).await?;
    }

    app.output.line("All done! ✨ 🍰 ✨");
    app.output.hint(
        "Jump into your new instance with:",
        &format!("dev-lxc shell {}", args.release),
    );
    Ok(ExitCode::SUCCESS)
}

/// Run the config's `dev-lxc-exec` commands in the new instance.
///
/// Problems with the config itself are warnings: the instance exists and is
/// usable either way.
async fn run_post_create(
    app: &AppContext,
    reporter: &impl ProgressReporter,
    name: &str,
    path: &Path,
) -> Result<()> {
    let display = path.display().to_string();
    let commands = match std::fs::read(path)
        .map_err(anyhow::Error::from)
        .and_then(|raw| post_create_commands(&raw, &display).map_err(anyhow::Error::from))
    {
        Ok(commands) => commands,
        Err(e) => {
            reporter.warn(&format!("skipping dev-lxc-exec: {e}"));
            return Ok(());
        }
    };

    for command in &commands {
        app.output.line(&format!("Executing: {command}"));
        let status =
            lifecycle::exec(&app.provisioner, reporter, &app.project, name, command, &[]).await?;
        report_completion(app, name, command, status);
    }
    Ok(())
}
