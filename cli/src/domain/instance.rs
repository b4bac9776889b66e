//! Instance identity and status types.
//!
//! Pure functions only: names are derived from the project directory and the
//! release, and status is scanned from `lxc info` text handed in by callers.

use std::fmt;
use std::path::{Path, PathBuf};

use crate::domain::error::ProjectError;
use crate::domain::release::Release;

/// Default account inside Ubuntu cloud images.
pub const GUEST_USER: &str = "ubuntu";

/// Uid and gid of [`GUEST_USER`].
pub const GUEST_ID: u32 = 1000;

/// Home directory of [`GUEST_USER`].
pub const GUEST_HOME: &str = "/home/ubuntu";

/// Error text `lxc info` prints for a missing instance.
pub const NOT_FOUND_MARKER: &str = "Instance not found";

/// The host project directory a container is bound to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Project {
    root: PathBuf,
    name: String,
}

impl Project {
    /// Build a project from an absolute host directory.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory has no basename (e.g. `/`) or the
    /// basename is not valid UTF-8.
    pub fn from_dir(root: impl Into<PathBuf>) -> Result<Self, ProjectError> {
        let root = root.into();
        let name = root
            .file_name()
            .ok_or_else(|| ProjectError::NoBasename(root.clone()))?
            .to_str()
            .ok_or_else(|| ProjectError::NotUtf8(root.clone()))?
            .to_string();
        if name.is_empty() {
            return Err(ProjectError::NoBasename(root));
        }
        Ok(Self { root, name })
    }

    /// Host directory shared into the guest.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Basename of the host directory.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Mount point of the project inside the guest.
    #[must_use]
    pub fn guest_path(&self) -> String {
        format!("{GUEST_HOME}/{}", self.name)
    }

    /// Canonical instance name for this project on `release`.
    #[must_use]
    pub fn instance_name(&self, release: Release) -> String {
        derive_name(&self.name, release)
    }
}

/// Canonical instance name: `<basename>-<release>`.
#[must_use]
pub fn derive_name(basename: &str, release: Release) -> String {
    format!("{basename}-{release}")
}

/// Name of the disk device that shares the project into `instance`.
#[must_use]
pub fn mount_device_name(instance: &str) -> String {
    format!("{instance}-src")
}

/// Disambiguated name used when `base` is taken by another project.
#[must_use]
pub fn variant_name(base: &str, suffix: &str) -> String {
    format!("{base}-{suffix}")
}

/// Name for a throwaway instance derived from `base`.
#[must_use]
pub fn ephemeral_name(base: &str, suffix: &str) -> String {
    format!("{base}-eph-{suffix}")
}

/// Lowercase hex string of `len` characters.
///
/// Entropy sources: nanosecond timestamp and independent `RandomState` hashes.
#[must_use]
pub fn random_hex(len: usize) -> String {
    use std::collections::hash_map::RandomState;
    use std::hash::{BuildHasher, Hasher};

    let mut out = String::with_capacity(len);
    while out.len() < len {
        let mut hasher = RandomState::new().build_hasher();
        hasher.write_u128(
            std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .map(|d| d.as_nanos())
                .unwrap_or(0),
        );
        hasher.write_u64(RandomState::new().build_hasher().finish());
        out.push_str(&format!("{:016x}", hasher.finish()));
    }
    out.truncate(len);
    out
}

/// Keep the names from an `lxc ls` listing that refer to `base` or one of
/// its variants.
///
/// `lxc ls` filters by prefix, so the listing can also hold other projects
/// whose basename extends this one (`web-jammyx-focal`) and throwaway
/// `-eph-` instances. Neither counts.
#[must_use]
pub fn matching_names(listing: &str, base: &str) -> Vec<String> {
    listing
        .split_whitespace()
        .filter(|name| is_base_or_variant(name, base))
        .map(String::from)
        .collect()
}

/// `name` is `base` itself or `<base>-<hex>`.
#[must_use]
pub fn is_base_or_variant(name: &str, base: &str) -> bool {
    match name.strip_prefix(base) {
        Some("") => true,
        Some(rest) => rest
            .strip_prefix('-')
            .is_some_and(|hex| !hex.is_empty() && hex.chars().all(|c| c.is_ascii_hexdigit())),
        None => false,
    }
}

/// Lifecycle state of an instance as reported by the runtime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InstanceStatus {
    /// The runtime does not know the instance.
    Nonexistent,
    Running,
    Stopped,
    /// `lxc info` succeeded but carried no `Status` line.
    Unknown,
    /// Any other reported state, uppercased (e.g. `FROZEN`).
    Other(String),
}

impl InstanceStatus {
    /// Normalize a reported status value.
    #[must_use]
    pub fn from_reported(value: &str) -> Self {
        let value = value.trim().to_ascii_uppercase();
        match value.as_str() {
            "RUNNING" => Self::Running,
            "STOPPED" => Self::Stopped,
            "" | "UNKNOWN" => Self::Unknown,
            _ => Self::Other(value),
        }
    }

    /// Whether the runtime knows the instance at all.
    #[must_use]
    pub fn exists(&self) -> bool {
        *self != Self::Nonexistent
    }
}

impl fmt::Display for InstanceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Nonexistent => f.write_str("NONEXISTENT"),
            Self::Running => f.write_str("RUNNING"),
            Self::Stopped => f.write_str("STOPPED"),
            Self::Unknown => f.write_str("UNKNOWN"),
            Self::Other(s) => f.write_str(s),
        }
    }
}

/// Scan `lxc info` output for the first `Status:` line.
///
/// Only the `Status` key is read. Blank lines and lines without a colon are
/// skipped; no other structure is assumed.
#[must_use]
pub fn parse_status(info: &str) -> InstanceStatus {
    info.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .filter_map(|line| line.split_once(':'))
        .find(|(key, _)| *key == "Status")
        .map_or(InstanceStatus::Unknown, |(_, value)| {
            InstanceStatus::from_reported(value)
        })
}
