//! SQLite mission storage.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use haulquest_domain::{Mission, MissionId, Role};
use sqlx::{sqlite::SqliteRow, Row, SqlitePool};
use uuid::Uuid;

use super::connection::{decode_timestamp, encode_timestamp};
use crate::infrastructure::ports::{MissionRepo, RepoError};

pub struct SqliteMissionRepo {
    pool: SqlitePool,
}

impl SqliteMissionRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

pub(crate) fn row_to_mission(row: &SqliteRow) -> Result<Mission, RepoError> {
    row_to_mission_named(row, "id")
}

/// Maps mission columns, reading the id from `id_column` so joined
/// queries can alias it around the progress row's own id.
pub(crate) fn row_to_mission_named(
    row: &SqliteRow,
    id_column: &str,
) -> Result<Mission, RepoError> {
    let id: String = row.get(id_column);
    let code: String = row.get("code");
    let name: String = row.get("name");
    let description: String = row.get("description");
    let category: String = row.get("category");
    let target_type: String = row.get("target_type");
    let target_value: f64 = row.get("target_value");
    let target_unit: Option<String> = row.get("target_unit");
    let reward_kind: String = row.get("reward_kind");
    let reward_value: i64 = row.get("reward_value");
    let xp: i64 = row.get("xp");
    let role: String = row.get("role");
    let cadence: String = row.get("cadence");
    let starts_at: String = row.get("starts_at");
    let ends_at: String = row.get("ends_at");
    let is_active: bool = row.get("is_active");
    let sort_order: i64 = row.get("sort_order");

    let id = Uuid::parse_str(&id)
        .map_err(|e| RepoError::serialization(format!("bad mission id '{}': {}", id, e)))?;

    let mission = Mission::new(
        code,
        name,
        category.parse()?,
        target_type.parse()?,
        target_value,
        role.parse()?,
        cadence.parse()?,
        decode_timestamp(&starts_at)?,
        decode_timestamp(&ends_at)?,
    )
    .with_id(MissionId::from_uuid(id))
    .with_description(description)
    .with_target_unit(target_unit)
    .with_reward(reward_kind.parse()?, reward_value as u32)
    .with_xp(xp as u32)
    .with_active(is_active)
    .with_sort_order(sort_order as u32);

    Ok(mission)
}

#[async_trait]
impl MissionRepo for SqliteMissionRepo {
    async fn get(&self, id: MissionId) -> Result<Option<Mission>, RepoError> {
        let row = sqlx::query("SELECT * FROM missions WHERE id = ?")
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| RepoError::database("mission.get", e))?;
        row.as_ref().map(row_to_mission).transpose()
    }

    async fn insert_if_absent(&self, mission: &Mission) -> Result<bool, RepoError> {
        let result = sqlx::query(
            r#"
            INSERT INTO missions (
                id, code, name, description, category, target_type,
                target_value, target_unit, reward_kind, reward_value, xp,
                role, cadence, starts_at, ends_at, is_active, sort_order
            )
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            ON CONFLICT (code) DO NOTHING
            "#,
        )
        .bind(mission.id().to_string())
        .bind(mission.code())
        .bind(mission.name())
        .bind(mission.description())
        .bind(mission.category().as_str())
        .bind(mission.target_type().as_str())
        .bind(mission.target_value())
        .bind(mission.target_unit())
        .bind(mission.reward_kind().as_str())
        .bind(mission.reward_value() as i64)
        .bind(mission.xp() as i64)
        .bind(mission.role().as_str())
        .bind(mission.cadence().as_str())
        .bind(encode_timestamp(mission.starts_at()))
        .bind(encode_timestamp(mission.ends_at()))
        .bind(mission.is_active())
        .bind(mission.sort_order() as i64)
        .execute(&self.pool)
        .await
        .map_err(|e| RepoError::database("mission.insert", e))?;

        Ok(result.rows_affected() == 1)
    }

    async fn list_active(&self) -> Result<Vec<Mission>, RepoError> {
        let rows = sqlx::query("SELECT * FROM missions WHERE is_active = 1 ORDER BY sort_order")
            .fetch_all(&self.pool)
            .await
            .map_err(|e| RepoError::database("mission.list_active", e))?;
        rows.iter().map(row_to_mission).collect()
    }

    async fn list_active_for_role(&self, role: Role) -> Result<Vec<Mission>, RepoError> {
        let rows = sqlx::query(
            "SELECT * FROM missions WHERE is_active = 1 AND role = ? ORDER BY sort_order",
        )
        .bind(role.as_str())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| RepoError::database("mission.list_active_for_role", e))?;
        rows.iter().map(row_to_mission).collect()
    }

    async fn deactivate_ended(&self, now: DateTime<Utc>) -> Result<u64, RepoError> {
        let result =
            sqlx::query("UPDATE missions SET is_active = 0 WHERE is_active = 1 AND ends_at < ?")
                .bind(encode_timestamp(now))
                .execute(&self.pool)
                .await
                .map_err(|e| RepoError::database("mission.deactivate_ended", e))?;
        Ok(result.rows_affected())
    }
}
