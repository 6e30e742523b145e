//! Grant entity module.
//!
//! Wraps the grant store with get-or-create semantics and role priority
//! resolution.

use std::sync::Arc;

use ambassador_domain::{
    GrantRecord, GrantScope, GrantTarget, Permission, PermissionKey, PermissionTarget, RoleId,
};

use crate::infrastructure::ports::{GrantRepo, RepoError};

/// Insert attempts before a get-or-create gives up under contention.
pub const DEFAULT_MAX_CREATE_ATTEMPTS: u32 = 3;

/// Grant entity - handles grant record operations.
pub struct Grants {
    repo: Arc<dyn GrantRepo>,
    max_create_attempts: u32,
}

impl Grants {
    pub fn new(repo: Arc<dyn GrantRepo>) -> Self {
        Self {
            repo,
            max_create_attempts: DEFAULT_MAX_CREATE_ATTEMPTS,
        }
    }

    pub fn with_max_create_attempts(mut self, attempts: u32) -> Self {
        self.max_create_attempts = attempts.max(1);
        self
    }

    /// Fetch the record for (scope, permission, target), creating it with the
    /// permission's default value if it does not exist yet.
    ///
    /// An insert that loses a race against a concurrent writer is not an
    /// error: the record is queried again.
    ///
    /// # Panics
    ///
    /// Panics if `target` is [`PermissionTarget::All`].
    pub async fn get_or_create(
        &self,
        scope: &GrantScope,
        permission: &Permission,
        target: PermissionTarget,
    ) -> Result<GrantRecord, RepoError> {
        let target = GrantTarget::expect_concrete(target);
        let mut attempts = 0;

        loop {
            if let Some(existing) = self.repo.find(scope, permission.key(), target).await? {
                return Ok(existing);
            }

            if attempts == self.max_create_attempts {
                return Err(RepoError::contention("grants.get_or_create", attempts));
            }
            attempts += 1;

            let record = GrantRecord::with_default(*scope, permission, target);
            match self.repo.insert(&record).await {
                Ok(()) => {}
                Err(e) if e.is_conflict() => {
                    tracing::debug!(
                        scope = %scope,
                        permission = %permission.name(),
                        target = %target,
                        attempt = attempts,
                        "Grant record created concurrently, requerying"
                    );
                }
                Err(e) => return Err(e),
            }
        }
    }

    /// Persist a mutated record.
    pub async fn save(&self, record: &GrantRecord) -> Result<(), RepoError> {
        self.repo.update(record).await
    }

    /// Look up a record without creating it.
    pub async fn find(
        &self,
        scope: &GrantScope,
        permission: PermissionKey,
        target: GrantTarget,
    ) -> Result<Option<GrantRecord>, RepoError> {
        self.repo.find(scope, permission, target).await
    }

    /// The record of the highest-priority role that has one.
    ///
    /// `role_ids` must be ordered by priority, highest first.
    pub async fn find_first_role_grant(
        &self,
        role_ids: &[RoleId],
        permission: PermissionKey,
        target: GrantTarget,
    ) -> Result<Option<GrantRecord>, RepoError> {
        let records = self
            .repo
            .find_role_grants(role_ids, permission, target)
            .await?;

        Ok(role_ids.iter().find_map(|&role_id| {
            records
                .iter()
                .find(|r| r.scope == GrantScope::role(role_id))
                .cloned()
        }))
    }

    /// Every stored record for a scope.
    pub async fn list(&self, scope: &GrantScope) -> Result<Vec<GrantRecord>, RepoError> {
        self.repo.list_for_scope(scope).await
    }
}
