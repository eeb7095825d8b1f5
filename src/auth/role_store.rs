use async_trait::async_trait;
use sqlx::SqlitePool;
use uuid::Uuid;

use super::Role;
use crate::errors::AppResult;

/// Read-only view of the persisted role table.
#[async_trait]
pub trait RoleStore: Send + Sync {
    /// The stored role for `user_id`, `None` when no record exists.
    async fn role_for(&self, user_id: Uuid) -> AppResult<Option<Role>>;

    /// Cheap connectivity probe.
    async fn ping(&self) -> AppResult<()>;
}

#[derive(Debug, Clone)]
pub struct SqlRoleStore {
    pool: SqlitePool,
}

impl SqlRoleStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RoleStore for SqlRoleStore {
    async fn role_for(&self, user_id: Uuid) -> AppResult<Option<Role>> {
        let stored: Option<String> = sqlx::query_scalar("SELECT role FROM user_roles WHERE user_id = ? LIMIT 1")
            .bind(user_id.to_string())
            .fetch_optional(&self.pool)
            .await?;

        Ok(stored.and_then(|value| match value.parse::<Role>() {
            Ok(role) => Some(role),
            Err(err) => {
                tracing::warn!(user_id = %user_id, error = %err, "ignoring unrecognised stored role");
                None
            }
        }))
    }

    async fn ping(&self) -> AppResult<()> {
        sqlx::query_scalar::<_, i64>("SELECT 1").fetch_one(&self.pool).await?;
        Ok(())
    }
}
