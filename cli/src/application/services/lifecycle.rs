//! Instance lifecycle operations: create, start, stop, remove, exec, shell.
//!
//! Imports only from `crate::domain` and `crate::application::ports`.
//! Every runtime call is awaited to completion before the next one is made,
//! and nothing is rolled back: a partially created instance stays behind for
//! `remove` to clean up.

use std::path::Path;
use std::process::ExitStatus;

use anyhow::{Context, Result};

use crate::application::ports::{
    ContainerProvisioner, GuestSession, InstanceInspector, InstanceLifecycle, LaunchSpec,
    ProgressReporter, ShellExecutor,
};
use crate::application::services::{probe, resolve};
use crate::domain::instance::{
    GUEST_ID, InstanceStatus, ephemeral_name, mount_device_name, random_hex,
};
use crate::domain::{InstanceError, Project, Release};

/// Hex digits in the suffix of a throwaway instance name.
const EPHEMERAL_SUFFIX_LEN: usize = 12;

/// Interpreter used to run `exec` command strings inside the guest.
const GUEST_SHELL: &str = "bash";

/// Inputs to [`create`].
pub struct CreateRequest<'a> {
    pub project: &'a Project,
    pub release: Release,
    /// Host uid mapped onto the guest's default account.
    pub host_uid: u32,
    /// LXD config file whose raw bytes are piped to the launch.
    pub config: Option<&'a Path>,
    /// LXD profile applied at launch.
    pub profile: Option<&'a str>,
}

/// Result of [`ensure_running`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EnsureOutcome {
    /// The instance was already running; nothing was done.
    AlreadyRunning,
    /// The instance was stopped and has been started.
    Started,
    /// Any other state; nothing was done.
    Untouched(InstanceStatus),
}

/// `raw.idmap` value mapping `host_uid` onto the guest's default account.
#[must_use]
pub fn idmap(host_uid: u32) -> String {
    format!("both {host_uid} {GUEST_ID}")
}

/// Start the instance if, and only if, it is stopped.
///
/// # Errors
///
/// Returns an error if the status query fails or the start is rejected.
pub async fn ensure_running(
    mp: &(impl InstanceInspector + InstanceLifecycle),
    reporter: &impl ProgressReporter,
    name: &str,
) -> Result<EnsureOutcome> {
    match probe::status(mp, name).await? {
        InstanceStatus::Running => Ok(EnsureOutcome::AlreadyRunning),
        InstanceStatus::Stopped => {
            reporter.step(&format!("Starting {name}"));
            let status = mp
                .start(name)
                .await
                .with_context(|| format!("starting instance {name}"))?;
            if !status.success() {
                return Err(InstanceError::StartFailed(name.to_string()).into());
            }
            tracing::info!(instance = name, "instance started");
            Ok(EnsureOutcome::Started)
        }
        other => Ok(EnsureOutcome::Untouched(other)),
    }
}

/// Create an instance for the project and return its name.
///
/// Steps: pick a free name, read the config, launch with the uid mapping,
/// wait for cloud-init, then share the project directory into the guest.
///
/// # Errors
///
/// Returns [`InstanceError::AlreadyExists`] before any mutating call when the
/// project already has an instance on this release,
/// [`InstanceError::ConfigUnreadable`] if the config cannot be read, and an
/// error if the launch or the mount fails.
pub async fn create(
    mp: &impl ContainerProvisioner,
    reporter: &impl ProgressReporter,
    req: &CreateRequest<'_>,
) -> Result<String> {
    let name = resolve::new_instance_name(mp, req.project, req.release).await?;

    let config = req
        .config
        .map(|path| {
            std::fs::read(path).map_err(|source| InstanceError::ConfigUnreadable {
                path: path.to_path_buf(),
                source,
            })
        })
        .transpose()?;

    provision(mp, reporter, req, &name, config.as_deref()).await?;
    Ok(name)
}

async fn provision(
    mp: &impl ContainerProvisioner,
    reporter: &impl ProgressReporter,
    req: &CreateRequest<'_>,
    name: &str,
    config: Option<&[u8]>,
) -> Result<()> {
    let image = req.release.image();
    let idmap = idmap(req.host_uid);
    tracing::info!(instance = name, %image, "launching instance");
    let status = mp
        .launch(&LaunchSpec {
            image: &image,
            name,
            idmap: &idmap,
            profile: req.profile,
            config,
        })
        .await
        .with_context(|| format!("launching instance {name}"))?;
    if !status.success() {
        return Err(InstanceError::LaunchFailed {
            name: name.to_string(),
        }
        .into());
    }

    wait_for_cloud_init(mp, reporter, name).await?;

    let project = req.project;
    let guest_path = project.guest_path();
    let status = mp
        .add_disk(name, &mount_device_name(name), project.root(), &guest_path)
        .await
        .with_context(|| format!("mounting project into {name}"))?;
    if !status.success() {
        return Err(InstanceError::MountFailed {
            name: name.to_string(),
            source_dir: project.root().display().to_string(),
        }
        .into());
    }
    tracing::info!(instance = name, path = %guest_path, "project mounted");
    Ok(())
}

/// Block until cloud-init inside `name` reports completion.
///
/// There is no timeout. A non-zero status is reported as a warning only.
///
/// # Errors
///
/// Returns an error if the wait command cannot be run at all.
pub async fn wait_for_cloud_init(
    mp: &impl ShellExecutor,
    reporter: &impl ProgressReporter,
    name: &str,
) -> Result<()> {
    reporter.wait_start(&format!(
        "Waiting for {name} to complete initialization and package installation \
         (this might take a while)"
    ));
    let output = mp
        .exec(name, &["cloud-init", "status", "--wait"])
        .await
        .with_context(|| format!("waiting for cloud-init in {name}"));
    reporter.wait_finish(&format!("{name} initialized"));

    let output = output?;
    if !output.status.success() {
        let detail = String::from_utf8_lossy(&output.stdout);
        reporter.warn(&format!(
            "cloud-init in {name} finished with errors: {}",
            detail.trim()
        ));
    }
    Ok(())
}

/// Run an interactive shell as the guest user in the mounted project.
///
/// # Errors
///
/// Returns an error if the instance cannot be started or the session cannot
/// be spawned.
pub async fn shell(
    mp: &(impl InstanceInspector + InstanceLifecycle + ShellExecutor),
    reporter: &impl ProgressReporter,
    project: &Project,
    name: &str,
) -> Result<ExitStatus> {
    ensure_running(mp, reporter, name).await?;
    let cwd = project.guest_path();
    let session = GuestSession { cwd: &cwd, env: &[] };
    mp.exec_status(name, &session, &[GUEST_SHELL])
        .await
        .with_context(|| format!("opening shell in {name}"))
}

/// Run `command` through the guest shell as the guest user.
///
/// # Errors
///
/// Returns an error if the instance cannot be started or the command cannot
/// be spawned. A failing command is reported through the exit status.
pub async fn exec(
    mp: &(impl InstanceInspector + InstanceLifecycle + ShellExecutor),
    reporter: &impl ProgressReporter,
    project: &Project,
    name: &str,
    command: &str,
    env: &[String],
) -> Result<ExitStatus> {
    ensure_running(mp, reporter, name).await?;
    let cwd = project.guest_path();
    let session = GuestSession { cwd: &cwd, env };
    mp.exec_status(name, &session, &[GUEST_SHELL, "-c", command])
        .await
        .with_context(|| format!("running command in {name}"))
}

/// Run `command` in a throwaway instance, then stop and delete it.
///
/// Returns the throwaway instance's name with the command's exit status.
/// The instance is removed even when the command fails.
///
/// # Errors
///
/// Returns an error if provisioning fails or the command cannot be spawned.
pub async fn exec_ephemeral(
    mp: &impl ContainerProvisioner,
    reporter: &impl ProgressReporter,
    req: &CreateRequest<'_>,
    command: &str,
    env: &[String],
) -> Result<(String, ExitStatus)> {
    let base = req.project.instance_name(req.release);
    let name = ephemeral_name(&base, &random_hex(EPHEMERAL_SUFFIX_LEN));
    provision(mp, reporter, req, &name, None).await?;

    let result = exec(mp, reporter, req.project, &name, command, env).await;

    reporter.step(&format!("Stopping {name}"));
    stop(mp, &name).await?;
    reporter.step(&format!("Removing {name}"));
    remove(mp, &name).await?;
    Ok((name, result?))
}

/// Force-delete the instance.
///
/// # Errors
///
/// Returns an error if the runtime cannot be invoked.
pub async fn remove(mp: &impl InstanceLifecycle, name: &str) -> Result<ExitStatus> {
    let status = mp
        .delete(name)
        .await
        .with_context(|| format!("removing instance {name}"))?;
    tracing::info!(instance = name, code = ?status.code(), "delete requested");
    Ok(status)
}

/// Ask the runtime to stop the instance, whatever its current state.
///
/// # Errors
///
/// Returns an error if the runtime cannot be invoked.
pub async fn stop(mp: &impl InstanceLifecycle, name: &str) -> Result<ExitStatus> {
    let status = mp
        .stop(name)
        .await
        .with_context(|| format!("stopping instance {name}"))?;
    tracing::info!(instance = name, code = ?status.code(), "stop requested");
    Ok(status)
}
