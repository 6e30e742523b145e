//! Grant records.
//!
//! One record exists per (scope, permission, target). Records are created
//! lazily with the permission's default value and then flipped in place;
//! they are never deleted.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::ids::{PermissionKey, RoleId, ServerId, UserId};
use crate::permission::Permission;
use crate::target::GrantTarget;

/// Owning context of a grant record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum GrantScope {
    /// A specific user on a specific server.
    User { server_id: ServerId, user_id: UserId },
    /// A role. Role IDs are globally unique on the platform.
    Role { role_id: RoleId },
}

impl GrantScope {
    pub fn user(server_id: ServerId, user_id: UserId) -> Self {
        Self::User { server_id, user_id }
    }

    pub fn role(role_id: RoleId) -> Self {
        Self::Role { role_id }
    }

    pub fn kind(&self) -> ScopeKind {
        match self {
            Self::User { .. } => ScopeKind::User,
            Self::Role { .. } => ScopeKind::Role,
        }
    }
}

impl fmt::Display for GrantScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::User { server_id, user_id } => write!(f, "user {user_id} on server {server_id}"),
            Self::Role { role_id } => write!(f, "role {role_id}"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScopeKind {
    User,
    Role,
}

impl fmt::Display for ScopeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::User => f.write_str("user"),
            Self::Role => f.write_str("role"),
        }
    }
}

/// Stored decision for a (scope, permission, target) triple.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GrantRecord {
    pub scope: GrantScope,
    pub permission: PermissionKey,
    pub target: GrantTarget,
    pub is_granted: bool,
}

impl GrantRecord {
    pub fn new(
        scope: GrantScope,
        permission: PermissionKey,
        target: GrantTarget,
        is_granted: bool,
    ) -> Self {
        Self {
            scope,
            permission,
            target,
            is_granted,
        }
    }

    /// Fresh record carrying the permission's default decision.
    pub fn with_default(scope: GrantScope, permission: &Permission, target: GrantTarget) -> Self {
        Self::new(
            scope,
            permission.key(),
            target,
            permission.is_granted_by_default_to(target),
        )
    }

    pub fn matches(&self, permission: PermissionKey, target: GrantTarget) -> bool {
        self.permission == permission && self.target == target
    }
}
