//! SQLite-backed grant storage.
//!
//! User and role grants live in two independent tables. Each table carries a
//! unique constraint on its (scope, permission, target) columns, which is what
//! makes concurrent get-or-create calls collapse to a single row.

use std::sync::Arc;

use async_trait::async_trait;
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};
use uuid::Uuid;

use ambassador_domain::{GrantRecord, GrantScope, GrantTarget, PermissionKey, RoleId};

use crate::infrastructure::ports::{ClockPort, GrantRepo, RepoError};

const SCHEMA: [&str; 2] = [
    r#"
    CREATE TABLE IF NOT EXISTS user_permissions (
        server_id INTEGER NOT NULL,
        user_id INTEGER NOT NULL,
        permission TEXT NOT NULL,
        target TEXT NOT NULL CHECK (target IN ('self', 'other')),
        is_granted INTEGER NOT NULL,
        created_at TEXT NOT NULL,
        updated_at TEXT NOT NULL,
        UNIQUE (server_id, user_id, permission, target)
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS role_permissions (
        role_id INTEGER NOT NULL,
        permission TEXT NOT NULL,
        target TEXT NOT NULL CHECK (target IN ('self', 'other')),
        is_granted INTEGER NOT NULL,
        created_at TEXT NOT NULL,
        updated_at TEXT NOT NULL,
        UNIQUE (role_id, permission, target)
    )
    "#,
];

/// SQLite implementation of grant storage.
pub struct SqliteGrantRepo {
    pool: SqlitePool,
    clock: Arc<dyn ClockPort>,
}

impl SqliteGrantRepo {
    pub async fn new(db_path: &str, clock: Arc<dyn ClockPort>) -> Result<Self, RepoError> {
        let pool = SqlitePool::connect(&format!("sqlite:{}?mode=rwc", db_path))
            .await
            .map_err(|e| RepoError::database("grants.connect", e))?;

        for statement in SCHEMA {
            sqlx::query(statement)
                .execute(&pool)
                .await
                .map_err(|e| RepoError::database("grants.schema", e))?;
        }

        Ok(Self { pool, clock })
    }
}

#[async_trait]
impl GrantRepo for SqliteGrantRepo {
    async fn find(
        &self,
        scope: &GrantScope,
        permission: PermissionKey,
        target: GrantTarget,
    ) -> Result<Option<GrantRecord>, RepoError> {
        let row = match *scope {
            GrantScope::User { server_id, user_id } => {
                sqlx::query(
                    r#"
                    SELECT is_granted FROM user_permissions
                    WHERE server_id = ? AND user_id = ? AND permission = ? AND target = ?
                    "#,
                )
                .bind(server_id.to_i64())
                .bind(user_id.to_i64())
                .bind(permission.to_string())
                .bind(target.as_str())
                .fetch_optional(&self.pool)
                .await
            }
            GrantScope::Role { role_id } => {
                sqlx::query(
                    r#"
                    SELECT is_granted FROM role_permissions
                    WHERE role_id = ? AND permission = ? AND target = ?
                    "#,
                )
                .bind(role_id.to_i64())
                .bind(permission.to_string())
                .bind(target.as_str())
                .fetch_optional(&self.pool)
                .await
            }
        }
        .map_err(|e| RepoError::database("grants.find", e))?;

        match row {
            Some(row) => {
                let is_granted: bool = row
                    .try_get("is_granted")
                    .map_err(|e| RepoError::database("grants.find", e))?;
                Ok(Some(GrantRecord::new(*scope, permission, target, is_granted)))
            }
            None => Ok(None),
        }
    }

    async fn insert(&self, record: &GrantRecord) -> Result<(), RepoError> {
        let now = self.clock.now().to_rfc3339();

        let result = match record.scope {
            GrantScope::User { server_id, user_id } => {
                sqlx::query(
                    r#"
                    INSERT INTO user_permissions
                        (server_id, user_id, permission, target, is_granted, created_at, updated_at)
                    VALUES (?, ?, ?, ?, ?, ?, ?)
                    "#,
                )
                .bind(server_id.to_i64())
                .bind(user_id.to_i64())
                .bind(record.permission.to_string())
                .bind(record.target.as_str())
                .bind(record.is_granted)
                .bind(&now)
                .bind(&now)
                .execute(&self.pool)
                .await
            }
            GrantScope::Role { role_id } => {
                sqlx::query(
                    r#"
                    INSERT INTO role_permissions
                        (role_id, permission, target, is_granted, created_at, updated_at)
                    VALUES (?, ?, ?, ?, ?, ?)
                    "#,
                )
                .bind(role_id.to_i64())
                .bind(record.permission.to_string())
                .bind(record.target.as_str())
                .bind(record.is_granted)
                .bind(&now)
                .bind(&now)
                .execute(&self.pool)
                .await
            }
        };

        match result {
            Ok(_) => Ok(()),
            Err(sqlx::Error::Database(e)) if e.is_unique_violation() => {
                Err(RepoError::conflict("GrantRecord", describe(record)))
            }
            Err(e) => Err(RepoError::database("grants.insert", e)),
        }
    }

    async fn update(&self, record: &GrantRecord) -> Result<(), RepoError> {
        let now = self.clock.now().to_rfc3339();

        let result = match record.scope {
            GrantScope::User { server_id, user_id } => {
                sqlx::query(
                    r#"
                    UPDATE user_permissions SET is_granted = ?, updated_at = ?
                    WHERE server_id = ? AND user_id = ? AND permission = ? AND target = ?
                    "#,
                )
                .bind(record.is_granted)
                .bind(&now)
                .bind(server_id.to_i64())
                .bind(user_id.to_i64())
                .bind(record.permission.to_string())
                .bind(record.target.as_str())
                .execute(&self.pool)
                .await
            }
            GrantScope::Role { role_id } => {
                sqlx::query(
                    r#"
                    UPDATE role_permissions SET is_granted = ?, updated_at = ?
                    WHERE role_id = ? AND permission = ? AND target = ?
                    "#,
                )
                .bind(record.is_granted)
                .bind(&now)
                .bind(role_id.to_i64())
                .bind(record.permission.to_string())
                .bind(record.target.as_str())
                .execute(&self.pool)
                .await
            }
        }
        .map_err(|e| RepoError::database("grants.update", e))?;

        if result.rows_affected() == 0 {
            return Err(RepoError::not_found("GrantRecord", describe(record)));
        }

        Ok(())
    }

    async fn find_role_grants(
        &self,
        role_ids: &[RoleId],
        permission: PermissionKey,
        target: GrantTarget,
    ) -> Result<Vec<GrantRecord>, RepoError> {
        if role_ids.is_empty() {
            return Ok(Vec::new());
        }

        let placeholders = vec!["?"; role_ids.len()].join(", ");
        let query = format!(
            "SELECT role_id, is_granted FROM role_permissions \
             WHERE permission = ? AND target = ? AND role_id IN ({placeholders})"
        );

        let mut q = sqlx::query(&query)
            .bind(permission.to_string())
            .bind(target.as_str());
        for role_id in role_ids {
            q = q.bind(role_id.to_i64());
        }

        let rows = q
            .fetch_all(&self.pool)
            .await
            .map_err(|e| RepoError::database("grants.find_role_grants", e))?;

        rows.iter()
            .map(|row| -> Result<GrantRecord, RepoError> {
                let role_id: i64 = row
                    .try_get("role_id")
                    .map_err(|e| RepoError::database("grants.find_role_grants", e))?;
                let is_granted: bool = row
                    .try_get("is_granted")
                    .map_err(|e| RepoError::database("grants.find_role_grants", e))?;
                Ok(GrantRecord::new(
                    GrantScope::role(RoleId::from_i64(role_id)),
                    permission,
                    target,
                    is_granted,
                ))
            })
            .collect()
    }

    async fn list_for_scope(&self, scope: &GrantScope) -> Result<Vec<GrantRecord>, RepoError> {
        let rows = match *scope {
            GrantScope::User { server_id, user_id } => {
                sqlx::query(
                    r#"
                    SELECT permission, target, is_granted FROM user_permissions
                    WHERE server_id = ? AND user_id = ?
                    "#,
                )
                .bind(server_id.to_i64())
                .bind(user_id.to_i64())
                .fetch_all(&self.pool)
                .await
            }
            GrantScope::Role { role_id } => {
                sqlx::query(
                    r#"
                    SELECT permission, target, is_granted FROM role_permissions
                    WHERE role_id = ?
                    "#,
                )
                .bind(role_id.to_i64())
                .fetch_all(&self.pool)
                .await
            }
        }
        .map_err(|e| RepoError::database("grants.list_for_scope", e))?;

        let mut records = rows
            .iter()
            .map(|row| row_to_record(*scope, row))
            .collect::<Result<Vec<_>, _>>()?;
        records.sort_by_key(|r| (r.permission, r.target));
        Ok(records)
    }
}

fn row_to_record(scope: GrantScope, row: &SqliteRow) -> Result<GrantRecord, RepoError> {
    let permission: String = row
        .try_get("permission")
        .map_err(|e| RepoError::database("grants.decode", e))?;
    let target: String = row
        .try_get("target")
        .map_err(|e| RepoError::database("grants.decode", e))?;
    let is_granted: bool = row
        .try_get("is_granted")
        .map_err(|e| RepoError::database("grants.decode", e))?;

    let permission = Uuid::parse_str(&permission)
        .map(PermissionKey::from_uuid)
        .map_err(RepoError::serialization)?;
    let target = target
        .parse::<GrantTarget>()
        .map_err(RepoError::serialization)?;

    Ok(GrantRecord::new(scope, permission, target, is_granted))
}

fn describe(record: &GrantRecord) -> String {
    format!("{} / {} / {}", record.scope, record.permission, record.target)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::clock::FixedClock;
    use crate::infrastructure::ports::MockClockPort;
    use ambassador_domain::{ServerId, UserId};
    use chrono::{TimeZone, Utc};

    const KICK: PermissionKey = PermissionKey::from_u128(0x4b1c);
    const BAN: PermissionKey = PermissionKey::from_u128(0xba7);

    async fn open(dir: &tempfile::TempDir) -> SqliteGrantRepo {
        let db_path = dir.path().join("permissions.db");
        let now = Utc.timestamp_opt(1_700_000_000, 0).single().expect("valid timestamp");
        SqliteGrantRepo::new(&db_path.to_string_lossy(), Arc::new(FixedClock(now)))
            .await
            .expect("open grant store")
    }

    fn user_scope() -> GrantScope {
        GrantScope::user(ServerId::new(1), UserId::new(u64::MAX - 1))
    }

    #[tokio::test]
    async fn inserted_record_is_found_by_triple() {
        let dir = tempfile::tempdir().expect("tempdir");
        let repo = open(&dir).await;

        let record = GrantRecord::new(user_scope(), KICK, GrantTarget::Own, true);
        repo.insert(&record).await.expect("insert");

        let found = repo
            .find(&user_scope(), KICK, GrantTarget::Own)
            .await
            .expect("find");
        assert_eq!(found, Some(record));

        let other = repo
            .find(&user_scope(), KICK, GrantTarget::Other)
            .await
            .expect("find");
        assert_eq!(other, None);
    }

    #[tokio::test]
    async fn duplicate_insert_is_a_conflict() {
        let dir = tempfile::tempdir().expect("tempdir");
        let repo = open(&dir).await;

        let scope = GrantScope::role(RoleId::new(9));
        let record = GrantRecord::new(scope, KICK, GrantTarget::Own, false);
        repo.insert(&record).await.expect("first insert");

        let err = repo
            .insert(&GrantRecord::new(scope, KICK, GrantTarget::Own, true))
            .await
            .expect_err("second insert must fail");
        assert!(err.is_conflict(), "unexpected error: {err}");
    }

    #[tokio::test]
    async fn updates_persist_across_reopen() {
        let dir = tempfile::tempdir().expect("tempdir");

        {
            let repo = open(&dir).await;
            let mut record = GrantRecord::new(user_scope(), BAN, GrantTarget::Other, false);
            repo.insert(&record).await.expect("insert");
            record.is_granted = true;
            repo.update(&record).await.expect("update");
        }

        let repo = open(&dir).await;
        let found = repo
            .find(&user_scope(), BAN, GrantTarget::Other)
            .await
            .expect("find")
            .expect("record survives reopen");
        assert!(found.is_granted);
    }

    #[tokio::test]
    async fn updating_a_missing_record_is_not_found() {
        let dir = tempfile::tempdir().expect("tempdir");
        let repo = open(&dir).await;

        let err = repo
            .update(&GrantRecord::new(user_scope(), BAN, GrantTarget::Own, true))
            .await
            .expect_err("nothing to update");
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn role_grants_are_filtered_by_roles_permission_and_target() {
        let dir = tempfile::tempdir().expect("tempdir");
        let repo = open(&dir).await;

        for (role, permission, target) in [
            (1, KICK, GrantTarget::Own),
            (2, KICK, GrantTarget::Own),
            (3, KICK, GrantTarget::Own),
            (2, BAN, GrantTarget::Own),
            (2, KICK, GrantTarget::Other),
        ] {
            repo.insert(&GrantRecord::new(
                GrantScope::role(RoleId::new(role)),
                permission,
                target,
                true,
            ))
            .await
            .expect("insert");
        }

        let mut found = repo
            .find_role_grants(&[RoleId::new(2), RoleId::new(3), RoleId::new(4)], KICK, GrantTarget::Own)
            .await
            .expect("find role grants");
        found.sort_by_key(|r| r.scope);

        assert_eq!(
            found.iter().map(|r| r.scope).collect::<Vec<_>>(),
            vec![GrantScope::role(RoleId::new(2)), GrantScope::role(RoleId::new(3))]
        );

        let none = repo
            .find_role_grants(&[], KICK, GrantTarget::Own)
            .await
            .expect("empty role list");
        assert!(none.is_empty());
    }

    #[tokio::test]
    async fn lists_only_the_requested_scope() {
        let dir = tempfile::tempdir().expect("tempdir");
        let repo = open(&dir).await;

        let elsewhere = GrantScope::user(ServerId::new(2), UserId::new(u64::MAX - 1));
        repo.insert(&GrantRecord::new(user_scope(), KICK, GrantTarget::Other, true))
            .await
            .expect("insert");
        repo.insert(&GrantRecord::new(user_scope(), KICK, GrantTarget::Own, false))
            .await
            .expect("insert");
        repo.insert(&GrantRecord::new(elsewhere, BAN, GrantTarget::Own, true))
            .await
            .expect("insert");

        let listed = repo.list_for_scope(&user_scope()).await.expect("list");
        assert_eq!(
            listed,
            vec![
                GrantRecord::new(user_scope(), KICK, GrantTarget::Own, false),
                GrantRecord::new(user_scope(), KICK, GrantTarget::Other, true),
            ]
        );
    }

    #[tokio::test]
    async fn timestamps_come_from_the_injected_clock() {
        let dir = tempfile::tempdir().expect("tempdir");
        let db_path = dir.path().join("permissions.db");
        let now = Utc.with_ymd_and_hms(2025, 6, 15, 10, 30, 0).single().expect("valid timestamp");

        let mut clock = MockClockPort::new();
        clock.expect_now().times(1).returning(move || now);

        let repo = SqliteGrantRepo::new(&db_path.to_string_lossy(), Arc::new(clock))
            .await
            .expect("open grant store");
        repo.insert(&GrantRecord::new(GrantScope::role(RoleId::new(5)), KICK, GrantTarget::Own, true))
            .await
            .expect("insert");

        let created_at: String =
            sqlx::query_scalar("SELECT created_at FROM role_permissions WHERE role_id = 5")
                .fetch_one(&repo.pool)
                .await
                .expect("created_at");
        assert_eq!(created_at, now.to_rfc3339());
    }
}
