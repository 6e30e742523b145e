//! Repository port traits.

use async_trait::async_trait;
use ambassador_domain::{GrantRecord, GrantScope, GrantTarget, PermissionKey, RoleId};

use super::RepoError;

// =============================================================================
// Grant Storage
// =============================================================================

/// Durable storage for grant records.
///
/// Implementations must enforce uniqueness of (scope, permission, target):
/// `insert` fails with [`RepoError::Conflict`] when the triple already exists.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait GrantRepo: Send + Sync {
    async fn find(
        &self,
        scope: &GrantScope,
        permission: PermissionKey,
        target: GrantTarget,
    ) -> Result<Option<GrantRecord>, RepoError>;

    async fn insert(&self, record: &GrantRecord) -> Result<(), RepoError>;

    /// Overwrite `is_granted` of an existing record.
    async fn update(&self, record: &GrantRecord) -> Result<(), RepoError>;

    /// Role records for (permission, target) held by any of `role_ids`, in no
    /// particular order.
    async fn find_role_grants(
        &self,
        role_ids: &[RoleId],
        permission: PermissionKey,
        target: GrantTarget,
    ) -> Result<Vec<GrantRecord>, RepoError>;

    /// Every record stored for a scope, ordered by (permission, target).
    async fn list_for_scope(&self, scope: &GrantScope) -> Result<Vec<GrantRecord>, RepoError>;
}
