//! Revoke permission use case.

use std::sync::Arc;

use ambassador_domain::{GrantScope, Permission, PermissionTarget, RoleId, ServerId, UserId};

use super::{set_grant_for_target, PermissionError};
use crate::entities::Grants;

/// Revokes a permission from a user on a server, or from a role.
///
/// Revocation stores an explicit denial; records are never removed.
pub struct RevokePermission {
    grants: Arc<Grants>,
}

impl RevokePermission {
    pub fn new(grants: Arc<Grants>) -> Self {
        Self { grants }
    }

    pub async fn from_user(
        &self,
        server_id: ServerId,
        user_id: UserId,
        permission: &Permission,
        target: PermissionTarget,
    ) -> Result<(), PermissionError> {
        self.execute(GrantScope::user(server_id, user_id), permission, target)
            .await
    }

    pub async fn from_role(
        &self,
        role_id: RoleId,
        permission: &Permission,
        target: PermissionTarget,
    ) -> Result<(), PermissionError> {
        self.execute(GrantScope::role(role_id), permission, target)
            .await
    }

    pub async fn execute(
        &self,
        scope: GrantScope,
        permission: &Permission,
        target: PermissionTarget,
    ) -> Result<(), PermissionError> {
        set_grant_for_target(&self.grants, &scope, permission, target, false).await?;

        tracing::info!(
            scope = %scope,
            permission = %permission.name(),
            target = %target,
            "Permission revoked"
        );
        Ok(())
    }
}
