//! In-memory grant storage.
//!
//! Used when no database is configured and in tests. Uniqueness of the
//! (scope, permission, target) triple falls out of the map key.

use async_trait::async_trait;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;

use ambassador_domain::{GrantRecord, GrantScope, GrantTarget, PermissionKey, RoleId};

use crate::infrastructure::ports::{GrantRepo, RepoError};

type GrantKey = (GrantScope, PermissionKey, GrantTarget);

/// Grant store backed by a concurrent hash map.
#[derive(Default)]
pub struct InMemoryGrantRepo {
    records: DashMap<GrantKey, bool>,
}

impl InMemoryGrantRepo {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored records across both scopes.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

fn key_of(record: &GrantRecord) -> GrantKey {
    (record.scope, record.permission, record.target)
}

#[async_trait]
impl GrantRepo for InMemoryGrantRepo {
    async fn find(
        &self,
        scope: &GrantScope,
        permission: PermissionKey,
        target: GrantTarget,
    ) -> Result<Option<GrantRecord>, RepoError> {
        Ok(self
            .records
            .get(&(*scope, permission, target))
            .map(|granted| GrantRecord::new(*scope, permission, target, *granted)))
    }

    async fn insert(&self, record: &GrantRecord) -> Result<(), RepoError> {
        match self.records.entry(key_of(record)) {
            Entry::Occupied(_) => Err(RepoError::conflict(
                "GrantRecord",
                format!("{} / {} / {}", record.scope, record.permission, record.target),
            )),
            Entry::Vacant(slot) => {
                slot.insert(record.is_granted);
                Ok(())
            }
        }
    }

    async fn update(&self, record: &GrantRecord) -> Result<(), RepoError> {
        match self.records.get_mut(&key_of(record)) {
            Some(mut granted) => {
                *granted = record.is_granted;
                Ok(())
            }
            None => Err(RepoError::not_found(
                "GrantRecord",
                format!("{} / {} / {}", record.scope, record.permission, record.target),
            )),
        }
    }

    async fn find_role_grants(
        &self,
        role_ids: &[RoleId],
        permission: PermissionKey,
        target: GrantTarget,
    ) -> Result<Vec<GrantRecord>, RepoError> {
        Ok(role_ids
            .iter()
            .filter_map(|&role_id| {
                let scope = GrantScope::role(role_id);
                self.records
                    .get(&(scope, permission, target))
                    .map(|granted| GrantRecord::new(scope, permission, target, *granted))
            })
            .collect())
    }

    async fn list_for_scope(&self, scope: &GrantScope) -> Result<Vec<GrantRecord>, RepoError> {
        let mut records: Vec<GrantRecord> = self
            .records
            .iter()
            .filter(|entry| entry.key().0 == *scope)
            .map(|entry| {
                let (scope, permission, target) = *entry.key();
                GrantRecord::new(scope, permission, target, *entry.value())
            })
            .collect();
        records.sort_by_key(|r| (r.permission, r.target));
        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ambassador_domain::{ServerId, UserId};

    const KICK: PermissionKey = PermissionKey::from_u128(0x4b1c);

    #[tokio::test]
    async fn insert_rejects_existing_triple() {
        let repo = InMemoryGrantRepo::new();
        let scope = GrantScope::user(ServerId::new(1), UserId::new(2));

        repo.insert(&GrantRecord::new(scope, KICK, GrantTarget::Own, false))
            .await
            .expect("insert");
        let err = repo
            .insert(&GrantRecord::new(scope, KICK, GrantTarget::Own, true))
            .await
            .expect_err("duplicate");

        assert!(err.is_conflict());
        assert_eq!(repo.len(), 1);
    }

    #[tokio::test]
    async fn user_and_role_scopes_do_not_mix() {
        let repo = InMemoryGrantRepo::new();
        let user = GrantScope::user(ServerId::new(1), UserId::new(2));
        let role = GrantScope::role(RoleId::new(2));

        repo.insert(&GrantRecord::new(role, KICK, GrantTarget::Own, true))
            .await
            .expect("insert");

        assert_eq!(repo.find(&user, KICK, GrantTarget::Own).await.expect("find"), None);
        assert!(repo.list_for_scope(&user).await.expect("list").is_empty());
    }

    #[tokio::test]
    async fn update_of_missing_record_is_not_found() {
        let repo = InMemoryGrantRepo::new();
        let err = repo
            .update(&GrantRecord::new(GrantScope::role(RoleId::new(1)), KICK, GrantTarget::Other, true))
            .await
            .expect_err("missing");
        assert!(err.is_not_found());
        assert!(repo.is_empty());
    }
}
