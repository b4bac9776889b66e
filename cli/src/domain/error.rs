//! Typed domain error enums.
//!
//! This module has zero imports from `crate::infra`, `crate::commands`,
//! `crate::application`, `tokio`, `std::fs`, or `std::process`.
//! All error types implement `thiserror::Error` and convert to `anyhow::Error`
//! via the `?` operator.

use std::path::PathBuf;

use thiserror::Error;

/// Exit code for conditions the user has to resolve before retrying.
pub const EXIT_USER_ERROR: u8 = 4;

// ── Instance errors ───────────────────────────────────────────────────────────

/// Errors related to instance lifecycle and identity.
#[derive(Debug, Error)]
pub enum InstanceError {
    #[error("Instance {0} already exists")]
    AlreadyExists(String),

    #[error("Could not read LXD config from {}", .path.display())]
    ConfigUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Multiple instances match '{name}': {}. Re-run interactively to choose one.", .candidates.join(", "))]
    Ambiguous {
        name: String,
        candidates: Vec<String>,
    },

    #[error("Cancelled.")]
    Cancelled,

    #[error("Could not query instance {name}: {detail}")]
    ProbeFailed { name: String, detail: String },

    #[error("Failed to launch instance {name}")]
    LaunchFailed { name: String },

    #[error("Failed to mount {source_dir} into instance {name}")]
    MountFailed { name: String, source_dir: String },

    #[error("Failed to start instance {0}")]
    StartFailed(String),
}

impl InstanceError {
    /// Process exit code for this error.
    #[must_use]
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::AlreadyExists(_) | Self::ConfigUnreadable { .. } => EXIT_USER_ERROR,
            _ => 1,
        }
    }
}

// ── Project errors ────────────────────────────────────────────────────────────

/// Errors deriving the project identity from the working directory.
#[derive(Debug, Error)]
pub enum ProjectError {
    #[error("Cannot derive a project name from {}: run dev-lxc from inside a project directory", .0.display())]
    NoBasename(PathBuf),

    #[error("Project directory {} is not valid UTF-8", .0.display())]
    NotUtf8(PathBuf),
}

// ── Release errors ────────────────────────────────────────────────────────────

/// Errors parsing a release codename.
#[derive(Debug, Error)]
pub enum ReleaseError {
    #[error("Unknown release '{value}'\n\nValid releases: {valid}")]
    Unknown { value: String, valid: String },
}

// ── Config errors ─────────────────────────────────────────────────────────────

/// Errors reading the `dev-lxc-exec` section of an LXD config.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Could not parse YAML from {path}: {detail}")]
    InvalidYaml { path: String, detail: String },

    #[error("dev-lxc-exec in {path} must be either a string or list of strings")]
    InvalidExecSection { path: String },
}
