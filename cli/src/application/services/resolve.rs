//! Instance name resolution for a project and release.
//!
//! Several host directories can share a basename, so one canonical name may
//! have disambiguated variants (`<name>-<hex>`). Creation picks a free
//! variant when the canonical name belongs to another directory; every other
//! command resolves the variants back to a single instance, asking the user
//! when there is a choice.

use std::path::Path;

use anyhow::{Context, Result};

use crate::application::ports::{InstanceInspector, Prompter};
use crate::application::services::probe;
use crate::domain::instance::{matching_names, mount_device_name, random_hex, variant_name};
use crate::domain::{InstanceError, Project, Release};

/// Hex digits in a fresh variant suffix.
const VARIANT_SUFFIX_LEN: usize = 3;

/// List existing instances named `base` or a variant of it.
///
/// # Errors
///
/// Returns an error if the runtime cannot list instances.
pub async fn matches(mp: &impl InstanceInspector, base: &str) -> Result<Vec<String>> {
    let output = mp
        .list(base)
        .await
        .with_context(|| format!("listing instances matching {base}"))?;
    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        anyhow::bail!("failed to list instances matching {base}: {}", stderr.trim());
    }
    Ok(matching_names(&String::from_utf8_lossy(&output.stdout), base))
}

/// Host directory shared into `name`, if it can be determined.
///
/// # Errors
///
/// Returns an error if the runtime cannot be invoked.
pub async fn mount_source(mp: &impl InstanceInspector, name: &str) -> Result<Option<String>> {
    let output = mp
        .device_source(name, &mount_device_name(name))
        .await
        .with_context(|| format!("reading project mount of {name}"))?;
    if !output.status.success() {
        return Ok(None);
    }
    let source = String::from_utf8_lossy(&output.stdout).trim().to_string();
    Ok((!source.is_empty()).then_some(source))
}

/// Choose the name for a new instance of `project` on `release`.
///
/// The canonical name is used when free. When it is taken by an instance
/// mounting a different host directory, a fresh variant is chosen unless
/// one of the existing variants already mounts this project.
///
/// # Errors
///
/// Returns [`InstanceError::AlreadyExists`] if the canonical instance or one
/// of its variants belongs to this project (or the canonical owner cannot
/// be determined), or any runtime failure.
pub async fn new_instance_name(
    mp: &impl InstanceInspector,
    project: &Project,
    release: Release,
) -> Result<String> {
    let base = project.instance_name(release);
    if !probe::status(mp, &base).await?.exists() {
        return Ok(base);
    }

    match mount_source(mp, &base).await? {
        Some(source) if Path::new(&source) != project.root() => {
            tracing::info!(instance = %base, owner = %source, "name taken by another project");
            if let Some(own) = owned_variant(mp, project, &base).await? {
                return Err(InstanceError::AlreadyExists(own).into());
            }
            free_variant(mp, &base).await
        }
        _ => Err(InstanceError::AlreadyExists(base).into()),
    }
}

/// A variant of `base` already mounting this project, if any.
async fn owned_variant(
    mp: &impl InstanceInspector,
    project: &Project,
    base: &str,
) -> Result<Option<String>> {
    for name in matches(mp, base).await? {
        if name == base {
            continue;
        }
        let source = mount_source(mp, &name).await?;
        if source.is_some_and(|s| Path::new(&s) == project.root()) {
            return Ok(Some(name));
        }
    }
    Ok(None)
}

async fn free_variant(mp: &impl InstanceInspector, base: &str) -> Result<String> {
    let mut candidate = variant_name(base, &random_hex(VARIANT_SUFFIX_LEN));
    while !matches(mp, &candidate).await?.is_empty() {
        candidate.push_str(&random_hex(1));
    }
    Ok(candidate)
}

/// Resolve `base` to one existing instance.
///
/// - no match: `base` itself, so a missing instance surfaces from the runtime
/// - only `base`: `base`
/// - one partial match: confirmed with the user
/// - several: picked by the user
///
/// # Errors
///
/// Returns [`InstanceError::Cancelled`] if the user declines,
/// [`InstanceError::Ambiguous`] if a choice is needed but cannot be asked,
/// or any runtime failure.
pub async fn existing_instance(
    mp: &impl InstanceInspector,
    prompter: &impl Prompter,
    base: &str,
) -> Result<String> {
    let found = matches(mp, base).await?;
    match found.as_slice() {
        [] => Ok(base.to_string()),
        [only] if only == base => Ok(base.to_string()),
        [only] => {
            let prompt = format!("One partial match for {base}. Interact with instance {only}?");
            if prompter.confirm(&prompt, true)? {
                Ok(only.clone())
            } else {
                Err(InstanceError::Cancelled.into())
            }
        }
        _ => {
            let prompt = format!("Multiple existing instances match the name '{base}'");
            match prompter.select(&prompt, &found)? {
                Some(index) => found
                    .get(index)
                    .cloned()
                    .ok_or_else(|| InstanceError::Cancelled.into()),
                None => Err(InstanceError::Ambiguous {
                    name: base.to_string(),
                    candidates: found,
                }
                .into()),
            }
        }
    }
}
