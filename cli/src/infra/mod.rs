//! Infrastructure layer: concrete implementations of application port traits.
//!
//! This module contains all I/O-performing code: process execution, config
//! file discovery, terminal prompts, and host identity.
//!
//! Imports from `crate::domain` and `crate::application::ports` are allowed.
//! Imports from `crate::commands` or `crate::output` are forbidden.

pub mod command_runner;
pub mod config;
pub mod host;
pub mod prompt;
pub mod provisioner;
