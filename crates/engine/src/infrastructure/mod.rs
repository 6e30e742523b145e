//! Infrastructure layer - external dependency implementations.
//!
//! Contains:
//! - `ports` - Trait definitions for external dependencies
//! - Grant store adapters (SQLite, in-memory)
//! - Clock

pub mod clock;
pub mod grants;
pub mod memory;
pub mod ports;
