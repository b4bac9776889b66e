//! CLI argument parsing with clap derive

use std::process::ExitCode;

use anyhow::Result;
use clap::builder::FalseyValueParser;
use clap::{ArgAction, Parser, Subcommand};

use crate::app::{AppContext, AppFlags, BehaviourFlags, OutputFlags};
use crate::commands;
use crate::infra::provisioner::DEFAULT_LXC_BIN;

/// Create, shell into, and remove per-project developer containers
#[derive(Parser)]
#[command(
    name = "dev-lxc",
    version,
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    /// Suppress non-error output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output
    ///
    /// `NO_COLOR` set to any value other than a false-ish one (`0`, `false`,
    /// `no`, `off`, empty) has the same effect.
    #[arg(long, global = true, env = "NO_COLOR", value_parser = FalseyValueParser::new())]
    pub no_color: bool,

    /// Increase log verbosity (-v, -vv, -vvv)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    /// Never prompt; accept defaults and fail on ambiguous instance names
    #[arg(short = 'y', long, global = true)]
    pub yes: bool,

    /// LXD client executable
    #[arg(long, global = true, env = "DEV_LXC_BIN", default_value = DEFAULT_LXC_BIN)]
    pub lxc_bin: String,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Create a container using the given Ubuntu release as a base
    Create(commands::create::CreateArgs),

    /// Open a bash session in the given release's container
    Shell(commands::shell::ShellArgs),

    /// Remove the given release's container
    Remove(commands::ReleaseArg),

    /// Execute a command in the given release's container
    Exec(commands::exec::ExecArgs),

    /// Start the given release's container
    Start(commands::ReleaseArg),

    /// Stop the given release's container
    Stop(commands::ReleaseArg),
}

impl Cli {
    /// Execute the CLI command.
    ///
    /// # Errors
    ///
    /// Returns an error if the command fails.
    pub async fn run(self) -> Result<ExitCode> {
        let Cli {
            quiet,
            no_color,
            verbose: _,
            yes,
            lxc_bin,
            command,
        } = self;
        let app = AppContext::new(&AppFlags {
            output: OutputFlags { no_color, quiet },
            behaviour: BehaviourFlags { yes, lxc_bin },
        })?;

        match command {
            Command::Create(args) => commands::create::run(&args, &app).await,
            Command::Shell(args) => commands::shell::run(&args, &app).await,
            Command::Remove(args) => commands::remove::run(&args, &app).await,
            Command::Exec(args) => commands::exec::run(&args, &app).await,
            Command::Start(args) => commands::start::run(&args, &app).await,
            Command::Stop(args) => commands::stop::run(&args, &app).await,
        }
    }
}
