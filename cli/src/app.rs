//! Application context: unified state passed to every command handler.
//!
//! `AppContext` bundles the output context, the `lxc` provisioner, the
//! prompter, and the project derived from the working directory, so command
//! handlers take a single `&AppContext`.

use std::io::IsTerminal;

use anyhow::{Context, Result};

use crate::domain::Project;
use crate::infra::command_runner::TokioCommandRunner;
use crate::infra::prompt::DialoguerPrompter;
use crate::infra::provisioner::LxcProvisioner;
use crate::output::{OutputContext, TerminalReporter};

/// Output rendering flags.
pub struct OutputFlags {
    /// Disable ANSI color output.
    pub no_color: bool,
    /// Suppress non-error output.
    pub quiet: bool,
}

/// Behaviour flags.
pub struct BehaviourFlags {
    /// Skip interactive prompts (also set by `CI` / `DEV_LXC_YES` env vars).
    pub yes: bool,
    /// The `lxc` executable to invoke.
    pub lxc_bin: String,
}

/// Flags passed from the top-level CLI to `AppContext::new`.
pub struct AppFlags {
    /// Output rendering options.
    pub output: OutputFlags,
    /// Behaviour options.
    pub behaviour: BehaviourFlags,
}

/// Unified application context passed to every command handler.
pub struct AppContext {
    /// Terminal output context (colors, quiet mode).
    pub output: OutputContext,
    /// `lxc` provisioner.
    pub provisioner: LxcProvisioner<TokioCommandRunner>,
    /// Prompts used to disambiguate instance names.
    pub prompter: DialoguerPrompter,
    /// Project bound to the current working directory.
    pub project: Project,
}

impl AppContext {
    /// Construct an `AppContext` from top-level CLI flags.
    ///
    /// # Errors
    ///
    /// Returns an error if the working directory cannot be read or has no
    /// usable basename.
    pub fn new(flags: &AppFlags) -> Result<Self> {
        // Prompts answer with their defaults under `--yes`, `CI`, `DEV_LXC_YES`,
        // or when stdin is not a terminal.
        let ci_env = std::env::var("CI").is_ok() || std::env::var("DEV_LXC_YES").is_ok();
        let non_interactive = flags.behaviour.yes || ci_env || !std::io::stdin().is_terminal();

        let cwd = std::env::current_dir().context("cannot determine working directory")?;
        let project = Project::from_dir(cwd)?;
        tracing::debug!(project = project.name(), root = %project.root().display(), "resolved project");

        Ok(Self {
            output: OutputContext::new(flags.output.no_color, flags.output.quiet),
            provisioner: LxcProvisioner::default_runner(&flags.behaviour.lxc_bin),
            prompter: DialoguerPrompter::new(non_interactive),
            project,
        })
    }

    /// Progress reporter writing to this context's terminal.
    #[must_use]
    pub fn reporter(&self) -> TerminalReporter<'_> {
        TerminalReporter::new(&self.output)
    }
}
