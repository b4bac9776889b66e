//! Infrastructure implementation of the `CommandRunner` port.
//!
//! `TokioCommandRunner` is the production implementation that uses tokio
//! for process execution. Calls are never timed out: the runtime's own
//! operations (notably waiting for cloud-init) may legitimately take minutes.

use std::process::{ExitStatus, Output, Stdio};

use anyhow::{Context, Result};
use tokio::io::AsyncWriteExt;

use crate::application::ports::CommandRunner;

/// Production `CommandRunner` backed by `tokio::process`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TokioCommandRunner;

impl CommandRunner for TokioCommandRunner {
    async fn run(&self, program: &str, args: &[&str]) -> Result<Output> {
        tracing::debug!(program, ?args, "running (captured)");
        let output = tokio::process::Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .output()
            .await
            .with_context(|| format!("failed to run {program}"))?;
        tracing::trace!(program, code = ?output.status.code(), "finished");
        Ok(output)
    }

    async fn run_status(&self, program: &str, args: &[&str]) -> Result<ExitStatus> {
        tracing::debug!(program, ?args, "running (inherited stdio)");
        let mut child = tokio::process::Command::new(program)
            .args(args)
            .kill_on_drop(true)
            .spawn()
            .with_context(|| format!("failed to spawn {program}"))?;

        child
            .wait()
            .await
            .with_context(|| format!("waiting for {program}"))
    }

    async fn run_status_with_stdin(
        &self,
        program: &str,
        args: &[&str],
        input: &[u8],
    ) -> Result<ExitStatus> {
        tracing::debug!(program, ?args, stdin_bytes = input.len(), "running (piped stdin)");
        let mut child = tokio::process::Command::new(program)
            .args(args)
            .stdin(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .with_context(|| format!("failed to spawn {program}"))?;

        if let Some(mut stdin) = child.stdin.take() {
            stdin
                .write_all(input)
                .await
                .with_context(|| format!("writing stdin of {program}"))?;
            // Dropping the handle closes the pipe so the child sees EOF.
        }

        child
            .wait()
            .await
            .with_context(|| format!("waiting for {program}"))
    }
}
