//! Locating LXD config files on disk.

use std::path::{Path, PathBuf};

use crate::domain::Release;
use crate::domain::config::config_candidates;

/// Find the default LXD config for `release`, if any exists.
///
/// `home` overrides the user's home directory; `None` uses [`dirs::home_dir`].
#[must_use]
pub fn discover(release: Release, project_dir: &Path, home: Option<&Path>) -> Option<PathBuf> {
    let home = home.map(Path::to_path_buf).or_else(dirs::home_dir);
    let found = config_candidates(release, project_dir, home.as_deref())
        .into_iter()
        .find(|path| path.is_file());
    match &found {
        Some(path) => tracing::debug!(path = %path.display(), "discovered default config"),
        None => tracing::debug!("no default config found"),
    }
    found
}
