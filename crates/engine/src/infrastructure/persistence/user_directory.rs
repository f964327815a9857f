//! Read-only SQLite view of host-owned accounts.

use async_trait::async_trait;
use haulquest_domain::UserId;
use sqlx::{Row, SqlitePool};

use crate::infrastructure::ports::{RepoError, UserAccount, UserDirectoryPort};

pub struct SqliteUserDirectory {
    pool: SqlitePool,
}

impl SqliteUserDirectory {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserDirectoryPort for SqliteUserDirectory {
    async fn list_active(&self) -> Result<Vec<UserAccount>, RepoError> {
        let rows = sqlx::query("SELECT id, role, is_active FROM accounts WHERE is_active = 1")
            .fetch_all(&self.pool)
            .await
            .map_err(|e| RepoError::database("accounts.list_active", e))?;
        rows.iter()
            .map(|row| {
                let id: i64 = row.get("id");
                let role: String = row.get("role");
                let is_active: bool = row.get("is_active");
                Ok(UserAccount {
                    id: UserId::new(id),
                    role: role.parse()?,
                    is_active,
                })
            })
            .collect()
    }

    async fn get(&self, user_id: UserId) -> Result<Option<UserAccount>, RepoError> {
        let row = sqlx::query("SELECT id, role, is_active FROM accounts WHERE id = ?")
            .bind(user_id.as_i64())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| RepoError::database("accounts.get", e))?;
        row.map(|row| {
            let id: i64 = row.get("id");
            let role: String = row.get("role");
            let is_active: bool = row.get("is_active");
            Ok(UserAccount {
                id: UserId::new(id),
                role: role.parse()?,
                is_active,
            })
        })
        .transpose()
    }
}
