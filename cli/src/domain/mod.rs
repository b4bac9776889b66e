//! Domain layer: pure business logic, types, and validation.
//!
//! This module has zero imports from `crate::infra`, `crate::commands`,
//! `crate::application`, `tokio`, `std::fs`, or `std::process`.
//! All functions are synchronous and take data in, returning data out.

pub mod config;
pub mod error;
pub mod instance;
pub mod release;

pub use error::{ConfigError, InstanceError, ProjectError, ReleaseError};
pub use instance::{InstanceStatus, Project, derive_name, parse_status};
pub use release::Release;
