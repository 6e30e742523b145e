//! Grant permission use case.

use std::sync::Arc;

use ambassador_domain::{GrantScope, Permission, PermissionTarget, RoleId, ServerId, UserId};

use super::{set_grant_for_target, PermissionError};
use crate::entities::Grants;

/// Grants a permission to a user on a server, or to a role.
pub struct GrantPermission {
    grants: Arc<Grants>,
}

impl GrantPermission {
    pub fn new(grants: Arc<Grants>) -> Self {
        Self { grants }
    }

    pub async fn to_user(
        &self,
        server_id: ServerId,
        user_id: UserId,
        permission: &Permission,
        target: PermissionTarget,
    ) -> Result<(), PermissionError> {
        self.execute(GrantScope::user(server_id, user_id), permission, target)
            .await
    }

    pub async fn to_role(
        &self,
        role_id: RoleId,
        permission: &Permission,
        target: PermissionTarget,
    ) -> Result<(), PermissionError> {
        self.execute(GrantScope::role(role_id), permission, target)
            .await
    }

    /// Fails with `AlreadyGranted` when the record is already granted.
    pub async fn execute(
        &self,
        scope: GrantScope,
        permission: &Permission,
        target: PermissionTarget,
    ) -> Result<(), PermissionError> {
        set_grant_for_target(&self.grants, &scope, permission, target, true).await?;

        tracing::info!(
            scope = %scope,
            permission = %permission.name(),
            target = %target,
            "Permission granted"
        );
        Ok(())
    }
}
