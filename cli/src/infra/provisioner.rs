//! Infrastructure implementation of the container port traits.
//!
//! `LxcProvisioner<R>` turns every port call into one `lxc` invocation and
//! routes it through a `CommandRunner`.

use std::path::Path;
use std::process::{ExitStatus, Output};

use anyhow::{Context, Result};

use crate::application::ports::{
    CommandRunner, DeviceManager, GuestSession, InstanceInspector, InstanceLifecycle, LaunchSpec,
    ShellExecutor,
};
use crate::domain::instance::{GUEST_HOME, GUEST_ID, GUEST_USER};
use crate::infra::command_runner::TokioCommandRunner;

/// Default name of the LXD client executable.
pub const DEFAULT_LXC_BIN: &str = "lxc";

/// Infrastructure adapter that routes all `lxc` calls through a `CommandRunner`.
///
/// Generic over `R: CommandRunner` so that tests can inject a recording
/// runner without spawning real processes.
pub struct LxcProvisioner<R: CommandRunner> {
    runner: R,
    program: String,
}

impl<R: CommandRunner> LxcProvisioner<R> {
    /// Create a provisioner invoking `program` through `runner`.
    pub fn new(runner: R, program: impl Into<String>) -> Self {
        Self {
            runner,
            program: program.into(),
        }
    }

    /// The runner all calls go through.
    pub fn runner(&self) -> &R {
        &self.runner
    }
}

impl LxcProvisioner<TokioCommandRunner> {
    /// Convenience constructor for production use.
    #[must_use]
    pub fn default_runner(program: &str) -> Self {
        Self::new(TokioCommandRunner, program)
    }
}

impl<R: CommandRunner> InstanceLifecycle for LxcProvisioner<R> {
    async fn launch(&self, spec: &LaunchSpec<'_>) -> Result<ExitStatus> {
        let idmap = format!("raw.idmap={}", spec.idmap);
        let mut args = vec!["launch", spec.image, spec.name, "--config", idmap.as_str()];
        if let Some(profile) = spec.profile {
            args.push("--profile");
            args.push(profile);
        }
        match spec.config {
            Some(config) => self
                .runner
                .run_status_with_stdin(&self.program, &args, config)
                .await
                .context("lxc launch"),
            None => self
                .runner
                .run_status(&self.program, &args)
                .await
                .context("lxc launch"),
        }
    }

    async fn start(&self, name: &str) -> Result<ExitStatus> {
        self.runner
            .run_status(&self.program, &["start", name])
            .await
            .context("lxc start")
    }

    async fn stop(&self, name: &str) -> Result<ExitStatus> {
        self.runner
            .run_status(&self.program, &["stop", name])
            .await
            .context("lxc stop")
    }

    async fn delete(&self, name: &str) -> Result<ExitStatus> {
        self.runner
            .run_status(&self.program, &["delete", "--force", name])
            .await
            .context("lxc delete")
    }
}

impl<R: CommandRunner> InstanceInspector for LxcProvisioner<R> {
    async fn info(&self, name: &str) -> Result<Output> {
        self.runner
            .run(&self.program, &["info", name])
            .await
            .context("lxc info")
    }

    async fn list(&self, filter: &str) -> Result<Output> {
        self.runner
            .run(
                &self.program,
                &["ls", "--all-projects", "-c", "n", "-f", "csv", filter],
            )
            .await
            .context("lxc ls")
    }

    async fn device_source(&self, name: &str, device: &str) -> Result<Output> {
        self.runner
            .run(
                &self.program,
                &["config", "device", "get", name, device, "source"],
            )
            .await
            .context("lxc config device get")
    }
}

impl<R: CommandRunner> DeviceManager for LxcProvisioner<R> {
    async fn add_disk(
        &self,
        name: &str,
        device: &str,
        source: &Path,
        path: &str,
    ) -> Result<ExitStatus> {
        let source = format!("source={}", source.display());
        let path = format!("path={path}");
        self.runner
            .run_status(
                &self.program,
                &["config", "device", "add", name, device, "disk", source.as_str(), path.as_str()],
            )
            .await
            .context("lxc config device add")
    }
}

impl<R: CommandRunner> ShellExecutor for LxcProvisioner<R> {
    async fn exec(&self, name: &str, args: &[&str]) -> Result<Output> {
        let mut full = vec!["exec", name, "--"];
        full.extend_from_slice(args);
        self.runner
            .run(&self.program, &full)
            .await
            .context("lxc exec")
    }

    async fn exec_status(
        &self,
        name: &str,
        session: &GuestSession<'_>,
        args: &[&str],
    ) -> Result<ExitStatus> {
        let id = GUEST_ID.to_string();
        let home = format!("HOME={GUEST_HOME}");
        let user = format!("USER={GUEST_USER}");
        let mut full = vec![
            "exec",
            "--user",
            id.as_str(),
            "--group",
            id.as_str(),
            "--cwd",
            session.cwd,
            "--env",
            home.as_str(),
            "--env",
            user.as_str(),
        ];
        for entry in session.env {
            full.push("--env");
            full.push(entry);
        }
        full.push(name);
        full.push("--");
        full.extend_from_slice(args);
        self.runner
            .run_status(&self.program, &full)
            .await
            .context("lxc exec")
    }
}
