//! Port trait definitions for the Application layer.
//!
//! Ports are the interfaces (contracts) that infrastructure must fulfill.
//! This file imports only from `crate::domain` and never from `crate::infra`,
//! `crate::commands`, or `crate::output`.

use std::path::Path;
use std::process::{ExitStatus, Output};

use anyhow::Result;

// ── Value Types ───────────────────────────────────────────────────────────────

/// Launch parameters for creating a new instance.
pub struct LaunchSpec<'a> {
    /// Image reference, e.g. `"ubuntu:jammy"`.
    pub image: &'a str,
    /// Instance name.
    pub name: &'a str,
    /// Value of `raw.idmap`, e.g. `"both 1001 1000"`.
    pub idmap: &'a str,
    /// Optional LXD profile to apply.
    pub profile: Option<&'a str>,
    /// Raw LXD config piped to the launch on stdin.
    pub config: Option<&'a [u8]>,
}

/// Identity and environment of a command run inside the guest.
pub struct GuestSession<'a> {
    /// Working directory inside the guest.
    pub cwd: &'a str,
    /// Extra `KEY=VALUE` entries, after the default `HOME` and `USER`.
    pub env: &'a [String],
}

// ── Container Port Traits ─────────────────────────────────────────────────────

/// Instance lifecycle operations: launch, start, stop, delete.
///
/// These inherit the terminal so the runtime's own messages reach the user.
#[allow(async_fn_in_trait)]
pub trait InstanceLifecycle {
    /// Launch a new instance with the given spec.
    async fn launch(&self, spec: &LaunchSpec<'_>) -> Result<ExitStatus>;
    /// Start a stopped instance.
    async fn start(&self, name: &str) -> Result<ExitStatus>;
    /// Stop an instance.
    async fn stop(&self, name: &str) -> Result<ExitStatus>;
    /// Force-delete an instance, running or not.
    async fn delete(&self, name: &str) -> Result<ExitStatus>;
}

/// Instance inspection: info, listing, device configuration.
#[allow(async_fn_in_trait)]
pub trait InstanceInspector {
    /// Get the textual `info` report for an instance.
    async fn info(&self, name: &str) -> Result<Output>;
    /// List instance names matching `filter`, across all projects.
    async fn list(&self, filter: &str) -> Result<Output>;
    /// Read the `source` key of a disk device.
    async fn device_source(&self, name: &str, device: &str) -> Result<Output>;
}

/// Device attachment.
#[allow(async_fn_in_trait)]
pub trait DeviceManager {
    /// Attach a host directory as a disk device at `path` inside the guest.
    async fn add_disk(&self, name: &str, device: &str, source: &Path, path: &str)
    -> Result<ExitStatus>;
}

/// Command execution inside an instance.
#[allow(async_fn_in_trait)]
pub trait ShellExecutor {
    /// Execute a command as root inside the instance and capture output.
    async fn exec(&self, name: &str, args: &[&str]) -> Result<Output>;
    /// Execute a command as the guest user with inherited stdio.
    async fn exec_status(
        &self,
        name: &str,
        session: &GuestSession<'_>,
        args: &[&str],
    ) -> Result<ExitStatus>;
}

/// Composite trait: any type implementing all four sub-traits is a
/// `ContainerProvisioner`.
pub trait ContainerProvisioner:
    InstanceLifecycle + InstanceInspector + DeviceManager + ShellExecutor
{
}

/// Blanket implementation: any type implementing all four sub-traits is a
/// `ContainerProvisioner`.
impl<T> ContainerProvisioner for T where
    T: InstanceLifecycle + InstanceInspector + DeviceManager + ShellExecutor
{
}

// ── Command Runner Port ───────────────────────────────────────────────────────

/// Abstracts process execution so infrastructure can be swapped or mocked.
///
/// Every call runs to completion before returning; nothing is retried.
#[allow(async_fn_in_trait)]
pub trait CommandRunner {
    /// Run a program and capture its output.
    async fn run(&self, program: &str, args: &[&str]) -> Result<Output>;
    /// Run a program with inherited stdio and return only its exit status.
    async fn run_status(&self, program: &str, args: &[&str]) -> Result<ExitStatus>;
    /// Run a program with stdin piped from `input` and stdout/stderr inherited.
    async fn run_status_with_stdin(
        &self,
        program: &str,
        args: &[&str],
        input: &[u8],
    ) -> Result<ExitStatus>;
}

// ── Interaction Ports ─────────────────────────────────────────────────────────

/// Abstracts user prompts so resolution logic can be tested without a TTY.
pub trait Prompter {
    /// Ask a yes/no question.
    ///
    /// # Errors
    ///
    /// Returns an error if the prompt cannot be shown or read.
    fn confirm(&self, prompt: &str, default: bool) -> Result<bool>;
    /// Ask the user to pick one of `items`. `None` means no choice can be
    /// made (non-interactive session).
    ///
    /// # Errors
    ///
    /// Returns an error if the prompt cannot be shown or read.
    fn select(&self, prompt: &str, items: &[String]) -> Result<Option<usize>>;
}

/// Abstracts progress reporting so services can emit events without
/// depending on the Presentation layer. Synchronous.
pub trait ProgressReporter {
    /// Emit an in-progress step message.
    fn step(&self, message: &str);
    /// Emit a success message.
    fn success(&self, message: &str);
    /// Emit a warning message.
    fn warn(&self, message: &str);
    /// Begin a wait of unknown length.
    fn wait_start(&self, message: &str);
    /// End the wait begun by `wait_start`.
    fn wait_finish(&self, message: &str);
}
