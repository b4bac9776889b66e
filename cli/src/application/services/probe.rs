//! Status prober: asks the runtime about one instance and scans the answer.
//!
//! Imports only from `crate::domain` and `crate::application::ports`.

use anyhow::{Context, Result};

use crate::application::ports::InstanceInspector;
use crate::domain::InstanceError;
use crate::domain::instance::{InstanceStatus, NOT_FOUND_MARKER, parse_status};

/// Get the current status of `name`.
///
/// A missing instance is reported as [`InstanceStatus::Nonexistent`], not as
/// an error.
///
/// # Errors
///
/// Returns an error if `lxc info` cannot be run or fails for any reason other
/// than the instance being absent.
pub async fn status(mp: &impl InstanceInspector, name: &str) -> Result<InstanceStatus> {
    let output = mp
        .info(name)
        .await
        .with_context(|| format!("querying instance {name}"))?;

    if output.status.success() {
        let status = parse_status(&String::from_utf8_lossy(&output.stdout));
        tracing::debug!(instance = name, %status, "probed instance");
        return Ok(status);
    }

    let stderr = String::from_utf8_lossy(&output.stderr);
    if stderr.contains(NOT_FOUND_MARKER) {
        tracing::debug!(instance = name, "instance does not exist");
        return Ok(InstanceStatus::Nonexistent);
    }

    Err(InstanceError::ProbeFailed {
        name: name.to_string(),
        detail: stderr.trim().to_string(),
    }
    .into())
}
