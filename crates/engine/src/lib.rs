//! Ambassador Engine library.
//!
//! Permission resolution and grant storage for the Ambassador bot.
//!
//! ## Structure
//!
//! - `entities/` - Entity modules wrapping grant storage
//! - `use_cases/` - Grant, revoke, check and list operations
//! - `infrastructure/` - Port traits and their SQLite / in-memory adapters
//! - `api/` - HTTP entry points
//! - `app` - Application composition
//! - `config` - Environment configuration

pub mod api;
pub mod app;
pub mod config;
pub mod entities;
pub mod infrastructure;
pub mod use_cases;

pub use app::App;
pub use config::{EngineConfig, GrantStoreKind};
