//! Ambassador permission domain.
//!
//! Vocabulary shared by the engine and the wire types: platform IDs,
//! permission targets, permissions and their default policies, the
//! permission catalog, and grant records.

pub mod builtin;
pub mod catalog;
pub mod error;
pub mod grant;
pub mod identity;
pub mod ids;
pub mod permission;
pub mod target;

pub use catalog::PermissionCatalog;
pub use error::DomainError;
pub use grant::{GrantRecord, GrantScope, ScopeKind};
pub use identity::{Member, ServerContext};
pub use ids::{PermissionKey, RoleId, ServerId, UserId};
pub use permission::{DefaultGrant, Permission};
pub use target::{GrantTarget, PermissionTarget};
