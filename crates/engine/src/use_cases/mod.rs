//! Use cases - User story orchestration.
//!
//! Use cases orchestrate across entity modules to fulfill user stories.

pub mod permissions;

pub use permissions::{PermissionError, PermissionUseCases};
