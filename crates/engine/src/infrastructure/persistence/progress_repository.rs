//! SQLite progress storage.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use haulquest_domain::{Mission, MissionProgress, ProgressId, ProgressStatus, UserId};
use sqlx::{sqlite::SqliteRow, Row, SqlitePool};
use uuid::Uuid;

use super::connection::{decode_timestamp, decode_timestamp_opt, encode_timestamp};
use super::mission_repository::row_to_mission_named;
use crate::infrastructure::ports::{ProgressRepo, RepoError};

pub struct SqliteProgressRepo {
    pool: SqlitePool,
}

impl SqliteProgressRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

fn row_to_progress(row: &SqliteRow) -> Result<MissionProgress, RepoError> {
    let id: String = row.get("id");
    let user_id: i64 = row.get("user_id");
    let mission_id: String = row.get("mission_id");
    let current_progress: f64 = row.get("current_progress");
    let target_progress: f64 = row.get("target_progress");
    let status: String = row.get("status");
    let started_at: String = row.get("started_at");
    let completed_at: Option<String> = row.get("completed_at");

    let id = Uuid::parse_str(&id)
        .map_err(|e| RepoError::serialization(format!("bad progress id '{}': {}", id, e)))?;
    let mission_id = Uuid::parse_str(&mission_id)
        .map_err(|e| RepoError::serialization(format!("bad mission id '{}': {}", mission_id, e)))?;

    let progress = MissionProgress::hydrate(
        ProgressId::from_uuid(id),
        UserId::new(user_id),
        mission_id.into(),
        current_progress,
        target_progress,
        status.parse::<ProgressStatus>()?,
        decode_timestamp(&started_at)?,
        decode_timestamp_opt(completed_at)?,
    );
    Ok(progress)
}

#[async_trait]
impl ProgressRepo for SqliteProgressRepo {
    async fn insert_if_absent(&self, progress: &MissionProgress) -> Result<bool, RepoError> {
        let result = sqlx::query(
            r#"
            INSERT INTO mission_progress (
                id, user_id, mission_id, current_progress, target_progress,
                status, started_at, completed_at
            )
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            ON CONFLICT (user_id, mission_id) DO NOTHING
            "#,
        )
        .bind(progress.id().to_string())
        .bind(progress.user_id().as_i64())
        .bind(progress.mission_id().to_string())
        .bind(progress.current_progress())
        .bind(progress.target_progress())
        .bind(progress.status().as_str())
        .bind(encode_timestamp(progress.started_at()))
        .bind(progress.completed_at().map(encode_timestamp))
        .execute(&self.pool)
        .await
        .map_err(|e| RepoError::database("progress.insert", e))?;

        Ok(result.rows_affected() == 1)
    }

    async fn update(&self, progress: &MissionProgress) -> Result<(), RepoError> {
        sqlx::query(
            r#"
            UPDATE mission_progress
            SET current_progress = ?, status = ?, completed_at = ?
            WHERE id = ?
            "#,
        )
        .bind(progress.current_progress())
        .bind(progress.status().as_str())
        .bind(progress.completed_at().map(encode_timestamp))
        .bind(progress.id().to_string())
        .execute(&self.pool)
        .await
        .map_err(|e| RepoError::database("progress.update", e))?;
        Ok(())
    }

    async fn list_in_progress_with_missions(
        &self,
        user_id: UserId,
    ) -> Result<Vec<(MissionProgress, Mission)>, RepoError> {
        let rows = sqlx::query(
            r#"
            SELECT
                p.id, p.user_id, p.mission_id, p.current_progress,
                p.target_progress, p.status, p.started_at, p.completed_at,
                m.id AS m_id, m.code, m.name, m.description, m.category,
                m.target_type, m.target_value, m.target_unit, m.reward_kind,
                m.reward_value, m.xp, m.role, m.cadence, m.starts_at,
                m.ends_at, m.is_active, m.sort_order
            FROM mission_progress p
            JOIN missions m ON m.id = p.mission_id
            WHERE p.user_id = ? AND p.status = 'in_progress'
            ORDER BY m.sort_order
            "#,
        )
        .bind(user_id.as_i64())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| RepoError::database("progress.list_with_missions", e))?;

        rows.iter()
            .map(|row| {
                let progress = row_to_progress(row)?;
                let mission = row_to_mission_named(row, "m_id")?;
                Ok((progress, mission))
            })
            .collect()
    }

    async fn list_in_progress_oldest_first(
        &self,
        user_id: UserId,
    ) -> Result<Vec<MissionProgress>, RepoError> {
        let rows = sqlx::query(
            r#"
            SELECT * FROM mission_progress
            WHERE user_id = ? AND status = 'in_progress'
            ORDER BY started_at ASC, id ASC
            "#,
        )
        .bind(user_id.as_i64())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| RepoError::database("progress.list_oldest_first", e))?;
        rows.iter().map(row_to_progress).collect()
    }

    async fn count_in_progress(&self, user_id: UserId) -> Result<u64, RepoError> {
        let row = sqlx::query(
            "SELECT COUNT(*) AS n FROM mission_progress WHERE user_id = ? AND status = 'in_progress'",
        )
        .bind(user_id.as_i64())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| RepoError::database("progress.count", e))?;
        let n: i64 = row.get("n");
        Ok(n as u64)
    }

    async fn in_progress_counts_by_user(&self) -> Result<Vec<(UserId, u64)>, RepoError> {
        let rows = sqlx::query(
            r#"
            SELECT user_id, COUNT(*) AS n
            FROM mission_progress
            WHERE status = 'in_progress'
            GROUP BY user_id
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| RepoError::database("progress.counts_by_user", e))?;
        Ok(rows
            .iter()
            .map(|row| {
                let user_id: i64 = row.get("user_id");
                let n: i64 = row.get("n");
                (UserId::new(user_id), n as u64)
            })
            .collect())
    }

    async fn expire_for_closed_missions(&self, now: DateTime<Utc>) -> Result<u64, RepoError> {
        let result = sqlx::query(
            r#"
            UPDATE mission_progress
            SET status = 'expired'
            WHERE status = 'in_progress'
              AND mission_id IN (
                  SELECT id FROM missions WHERE is_active = 0 OR ends_at < ?
              )
            "#,
        )
        .bind(encode_timestamp(now))
        .execute(&self.pool)
        .await
        .map_err(|e| RepoError::database("progress.expire_closed", e))?;
        Ok(result.rows_affected())
    }

    async fn expire_all_for_user(&self, user_id: UserId) -> Result<u64, RepoError> {
        let result = sqlx::query(
            "UPDATE mission_progress SET status = 'expired' WHERE user_id = ? AND status = 'in_progress'",
        )
        .bind(user_id.as_i64())
        .execute(&self.pool)
        .await
        .map_err(|e| RepoError::database("progress.expire_for_user", e))?;
        Ok(result.rows_affected())
    }

    async fn delete_all_for_user(&self, user_id: UserId) -> Result<u64, RepoError> {
        let result = sqlx::query("DELETE FROM mission_progress WHERE user_id = ?")
            .bind(user_id.as_i64())
            .execute(&self.pool)
            .await
            .map_err(|e| RepoError::database("progress.delete_for_user", e))?;
        Ok(result.rows_affected())
    }
}

