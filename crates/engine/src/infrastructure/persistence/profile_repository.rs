//! SQLite profile storage.
//!
//! Profile writes go through an optimistic version check: the row carries
//! a `version` counter and an update only lands when the caller read the
//! version it is replacing. Concurrent dispatches retry instead of
//! silently losing XP.

use async_trait::async_trait;
use haulquest_domain::{GamificationProfile, LevelState, ProfileStats, UserId};
use sqlx::{sqlite::SqliteRow, Row, SqlitePool};

use super::connection::{decode_timestamp_opt, encode_timestamp};
use crate::infrastructure::ports::{ProfileRepo, RepoError};

pub struct SqliteProfileRepo {
    pool: SqlitePool,
}

impl SqliteProfileRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

fn row_to_profile(row: &SqliteRow) -> Result<GamificationProfile, RepoError> {
    let user_id: i64 = row.get("user_id");
    let level: i64 = row.get("level");
    let current_xp: i64 = row.get("current_xp");
    let xp_to_next_level: i64 = row.get("xp_to_next_level");
    let total_xp: i64 = row.get("total_xp");
    let streak_days: i64 = row.get("streak_days");
    let longest_streak: i64 = row.get("longest_streak");
    let last_activity_at: Option<String> = row.get("last_activity_at");
    let stats_json: String = row.get("stats_json");
    let version: i64 = row.get("version");

    let stats: ProfileStats = serde_json::from_str(&stats_json)
        .map_err(|e| RepoError::serialization(format!("bad profile stats: {}", e)))?;

    let profile = GamificationProfile::new(UserId::new(user_id))
        .with_level_state(LevelState {
            level: level as u32,
            current_xp: current_xp as u32,
            xp_to_next_level: xp_to_next_level as u32,
            total_xp: total_xp as u64,
        })
        .with_streaks(streak_days as u32, longest_streak as u32)
        .with_last_activity_at(decode_timestamp_opt(last_activity_at)?)
        .with_stats(stats)
        .with_version(version);
    Ok(profile)
}

#[async_trait]
impl ProfileRepo for SqliteProfileRepo {
    async fn get(&self, user_id: UserId) -> Result<Option<GamificationProfile>, RepoError> {
        let row = sqlx::query("SELECT * FROM gamification_profiles WHERE user_id = ?")
            .bind(user_id.as_i64())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| RepoError::database("profile.get", e))?;
        row.as_ref().map(row_to_profile).transpose()
    }

    async fn insert_if_absent(&self, profile: &GamificationProfile) -> Result<bool, RepoError> {
        let stats_json = serde_json::to_string(profile.stats())
            .map_err(|e| RepoError::serialization(e.to_string()))?;
        let result = sqlx::query(
            r#"
            INSERT INTO gamification_profiles (
                user_id, level, current_xp, xp_to_next_level, total_xp,
                streak_days, longest_streak, last_activity_at, stats_json,
                version
            )
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, 0)
            ON CONFLICT (user_id) DO NOTHING
            "#,
        )
        .bind(profile.user_id().as_i64())
        .bind(profile.level() as i64)
        .bind(profile.current_xp() as i64)
        .bind(profile.xp_to_next_level() as i64)
        .bind(profile.total_xp() as i64)
        .bind(profile.streak_days() as i64)
        .bind(profile.longest_streak() as i64)
        .bind(profile.last_activity_at().map(encode_timestamp))
        .bind(stats_json)
        .execute(&self.pool)
        .await
        .map_err(|e| RepoError::database("profile.insert", e))?;

        Ok(result.rows_affected() == 1)
    }

    async fn update_versioned(&self, profile: &GamificationProfile) -> Result<bool, RepoError> {
        let stats_json = serde_json::to_string(profile.stats())
            .map_err(|e| RepoError::serialization(e.to_string()))?;
        let result = sqlx::query(
            r#"
            UPDATE gamification_profiles
            SET level = ?, current_xp = ?, xp_to_next_level = ?,
                total_xp = ?, streak_days = ?, longest_streak = ?,
                last_activity_at = ?, stats_json = ?, version = version + 1
            WHERE user_id = ? AND version = ?
            "#,
        )
        .bind(profile.level() as i64)
        .bind(profile.current_xp() as i64)
        .bind(profile.xp_to_next_level() as i64)
        .bind(profile.total_xp() as i64)
        .bind(profile.streak_days() as i64)
        .bind(profile.longest_streak() as i64)
        .bind(profile.last_activity_at().map(encode_timestamp))
        .bind(stats_json)
        .bind(profile.user_id().as_i64())
        .bind(profile.version())
        .execute(&self.pool)
        .await
        .map_err(|e| RepoError::database("profile.update", e))?;

        Ok(result.rows_affected() == 1)
    }

    async fn list_user_ids(&self) -> Result<Vec<UserId>, RepoError> {
        let rows = sqlx::query("SELECT user_id FROM gamification_profiles")
            .fetch_all(&self.pool)
            .await
            .map_err(|e| RepoError::database("profile.list_user_ids", e))?;
        Ok(rows
            .iter()
            .map(|row| UserId::new(row.get::<i64, _>("user_id")))
            .collect())
    }

    async fn delete(&self, user_id: UserId) -> Result<(), RepoError> {
        sqlx::query("DELETE FROM gamification_profiles WHERE user_id = ?")
            .bind(user_id.as_i64())
            .execute(&self.pool)
            .await
            .map_err(|e| RepoError::database("profile.delete", e))?;
        Ok(())
    }
}
