//! Application services: use-case orchestration over the port traits.

pub mod lifecycle;
pub mod probe;
pub mod resolve;
