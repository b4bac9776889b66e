//! LXD config discovery order and the `dev-lxc-exec` post-create section.
//!
//! Pure functions only, no I/O.

use std::path::{Path, PathBuf};

use serde_yaml::Value;

use crate::domain::error::ConfigError;
use crate::domain::release::Release;

/// Directory holding default LXD configs, both per project and per user.
pub const CONFIG_DOTDIR: &str = ".dev-lxc";

/// Config applied to every release when no release-specific file exists.
pub const BASE_CONFIG: &str = "base.yaml";

/// Top-level key listing commands to run once the instance is created.
pub const EXEC_KEY: &str = "dev-lxc-exec";

/// Default config locations, highest priority first:
///
/// 1. `<project>/.dev-lxc/<release>.yaml`
/// 2. `<project>/.dev-lxc/base.yaml`
/// 3. `<home>/.dev-lxc/<release>.yaml`
/// 4. `<home>/.dev-lxc/base.yaml`
#[must_use]
pub fn config_candidates(release: Release, project_dir: &Path, home: Option<&Path>) -> Vec<PathBuf> {
    let release_yaml = format!("{release}.yaml");
    let mut roots = vec![project_dir];
    roots.extend(home);
    roots
        .into_iter()
        .flat_map(|root| {
            let dir = root.join(CONFIG_DOTDIR);
            [dir.join(&release_yaml), dir.join(BASE_CONFIG)]
        })
        .collect()
}

/// Extract the `dev-lxc-exec` commands from a config's raw bytes.
///
/// A missing key (or an empty document) yields no commands. A single string
/// is treated as a one-element list. Scalars inside the list are stringified.
///
/// # Errors
///
/// Returns an error if the bytes are not YAML or the key holds anything but
/// a string or a list of scalars.
pub fn post_create_commands(raw: &[u8], path: &str) -> Result<Vec<String>, ConfigError> {
    if raw.iter().all(u8::is_ascii_whitespace) {
        return Ok(Vec::new());
    }
    let doc: Value = serde_yaml::from_slice(raw).map_err(|e| ConfigError::InvalidYaml {
        path: path.to_string(),
        detail: e.to_string(),
    })?;
    let Some(section) = doc.get(EXEC_KEY) else {
        return Ok(Vec::new());
    };
    let invalid = || ConfigError::InvalidExecSection {
        path: path.to_string(),
    };
    match section {
        Value::String(cmd) => Ok(vec![cmd.clone()]),
        Value::Sequence(items) => items
            .iter()
            .map(|item| scalar_to_string(item).ok_or_else(invalid))
            .collect(),
        _ => Err(invalid()),
    }
}

fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}
