//! Ubuntu release codenames accepted as the base for a developer container.

use std::fmt;
use std::str::FromStr;

use clap::ValueEnum;

use crate::domain::error::ReleaseError;

/// A recognised Ubuntu release codename.
///
/// Variants are ordered oldest to newest. The newest release is only
/// published on the daily image remote.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, ValueEnum)]
pub enum Release {
    Focal,
    Jammy,
    Lunar,
    Noble,
}

impl Release {
    /// Every accepted release, oldest first.
    pub const ALL: [Release; 4] = [Self::Focal, Self::Jammy, Self::Lunar, Self::Noble];

    /// The lowercase codename as passed to `lxc`.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Focal => "focal",
            Self::Jammy => "jammy",
            Self::Lunar => "lunar",
            Self::Noble => "noble",
        }
    }

    /// Whether this is the newest entry of [`Release::ALL`].
    #[must_use]
    pub fn is_daily(self) -> bool {
        Self::ALL.last() == Some(&self)
    }

    /// Image remote serving this release.
    #[must_use]
    pub fn remote(self) -> &'static str {
        if self.is_daily() {
            "ubuntu-daily"
        } else {
            "ubuntu"
        }
    }

    /// Full image reference for `lxc launch`, e.g. `ubuntu:jammy`.
    #[must_use]
    pub fn image(self) -> String {
        format!("{}:{}", self.remote(), self.as_str())
    }
}

impl fmt::Display for Release {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Release {
    type Err = ReleaseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|r| r.as_str() == s)
            .ok_or_else(|| ReleaseError::Unknown {
                value: s.to_string(),
                valid: Self::ALL.map(Release::as_str).join(", "),
            })
    }
}
