//! Check permission use case.
//!
//! Resolution follows the platform's own hierarchy: a user-level record
//! overrides whatever the member's roles say, and the highest-priority role
//! with a record wins among roles. Without any record the permission's
//! default applies. Checks never create records.

use std::sync::Arc;

use ambassador_domain::{GrantTarget, Member, Permission, PermissionTarget, ServerContext, UserId};

use super::PermissionError;
use crate::entities::Grants;
use crate::infrastructure::ports::RepoError;

/// Determines whether a member holds a permission.
pub struct CheckPermission {
    grants: Arc<Grants>,
}

impl CheckPermission {
    pub fn new(grants: Arc<Grants>) -> Self {
        Self { grants }
    }

    /// Succeeds if the member holds `permission` for `target`.
    ///
    /// The server owner holds every permission. For `All`, both `Self` and
    /// `Other` must be held.
    pub async fn execute(
        &self,
        server: &ServerContext,
        member: &Member,
        permission: &Permission,
        target: PermissionTarget,
    ) -> Result<(), PermissionError> {
        if server.is_owned_by(member.user_id) {
            return Ok(());
        }

        for &concrete in target.expand() {
            if !self.resolve(server, member, permission, concrete).await? {
                tracing::debug!(
                    server_id = %server.id,
                    user_id = %member.user_id,
                    permission = %permission.name(),
                    target = %concrete,
                    "Permission denied"
                );
                return Err(PermissionError::PermissionDenied);
            }
        }

        Ok(())
    }

    /// Like [`execute`](Self::execute), but the owner of the entity being
    /// acted on passes without a permission lookup.
    pub async fn for_entity(
        &self,
        server: &ServerContext,
        member: &Member,
        entity_owner: UserId,
        permission: &Permission,
        target: PermissionTarget,
    ) -> Result<(), PermissionError> {
        if member.user_id == entity_owner {
            return Ok(());
        }

        self.execute(server, member, permission, target).await
    }

    async fn resolve(
        &self,
        server: &ServerContext,
        member: &Member,
        permission: &Permission,
        target: GrantTarget,
    ) -> Result<bool, RepoError> {
        let role_grant = self
            .grants
            .find_first_role_grant(&member.role_ids, permission.key(), target)
            .await?;

        let user_grant = self
            .grants
            .find(&member.scope_on(server.id), permission.key(), target)
            .await?;

        Ok(match (user_grant, role_grant) {
            (Some(user), _) => user.is_granted,
            (None, Some(role)) => role.is_granted,
            (None, None) => permission.is_granted_by_default_to(target),
        })
    }
}
