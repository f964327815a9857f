//! SQLite pool construction and idempotent schema setup.

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;

use crate::infrastructure::ports::RepoError;

/// Open (or create) a file-backed database and ensure the schema.
pub async fn connect(db_path: &str) -> Result<SqlitePool, RepoError> {
    let pool = SqlitePool::connect(&format!("sqlite:{}?mode=rwc", db_path))
        .await
        .map_err(|e| RepoError::database("connect", e))?;
    ensure_schema(&pool).await?;
    Ok(pool)
}

/// In-memory database for tests. Pinned to a single connection: every
/// pooled connection would otherwise get its own empty memory database.
#[cfg(test)]
pub async fn connect_in_memory() -> Result<SqlitePool, RepoError> {
    let pool = sqlx::sqlite::SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .map_err(|e| RepoError::database("connect", e))?;
    ensure_schema(&pool).await?;
    Ok(pool)
}

/// Create tables and indexes if missing. Safe to run on every boot.
pub async fn ensure_schema(pool: &SqlitePool) -> Result<(), RepoError> {
    let statements = [
        r#"
        CREATE TABLE IF NOT EXISTS missions (
            id TEXT PRIMARY KEY,
            code TEXT NOT NULL UNIQUE,
            name TEXT NOT NULL,
            description TEXT NOT NULL,
            category TEXT NOT NULL,
            target_type TEXT NOT NULL,
            target_value REAL NOT NULL,
            target_unit TEXT,
            reward_kind TEXT NOT NULL,
            reward_value INTEGER NOT NULL,
            xp INTEGER NOT NULL,
            role TEXT NOT NULL,
            cadence TEXT NOT NULL,
            starts_at TEXT NOT NULL,
            ends_at TEXT NOT NULL,
            is_active INTEGER NOT NULL,
            sort_order INTEGER NOT NULL
        )
        "#,
        r#"
        CREATE INDEX IF NOT EXISTS idx_missions_active_role
            ON missions (is_active, role)
        "#,
        r#"
        CREATE TABLE IF NOT EXISTS mission_progress (
            id TEXT PRIMARY KEY,
            user_id INTEGER NOT NULL,
            mission_id TEXT NOT NULL REFERENCES missions (id),
            current_progress REAL NOT NULL,
            target_progress REAL NOT NULL,
            status TEXT NOT NULL,
            started_at TEXT NOT NULL,
            completed_at TEXT,
            UNIQUE (user_id, mission_id)
        )
        "#,
        r#"
        CREATE INDEX IF NOT EXISTS idx_progress_user_status
            ON mission_progress (user_id, status)
        "#,
        r#"
        CREATE TABLE IF NOT EXISTS gamification_profiles (
            user_id INTEGER PRIMARY KEY,
            level INTEGER NOT NULL,
            current_xp INTEGER NOT NULL,
            xp_to_next_level INTEGER NOT NULL,
            total_xp INTEGER NOT NULL,
            streak_days INTEGER NOT NULL,
            longest_streak INTEGER NOT NULL,
            last_activity_at TEXT,
            stats_json TEXT NOT NULL,
            version INTEGER NOT NULL DEFAULT 0
        )
        "#,
        // Host-owned account view. The engine only reads it; the table is
        // created here so standalone and test deployments work out of the
        // box.
        r#"
        CREATE TABLE IF NOT EXISTS accounts (
            id INTEGER PRIMARY KEY,
            role TEXT NOT NULL,
            is_active INTEGER NOT NULL DEFAULT 1
        )
        "#,
    ];

    for statement in statements {
        sqlx::query(statement)
            .execute(pool)
            .await
            .map_err(|e| RepoError::database("ensure_schema", e))?;
    }
    Ok(())
}

/// RFC 3339 text is the canonical timestamp encoding; it sorts correctly
/// for UTC values, which the expiry queries rely on.
pub(crate) fn encode_timestamp(value: DateTime<Utc>) -> String {
    value.to_rfc3339()
}

pub(crate) fn decode_timestamp(value: &str) -> Result<DateTime<Utc>, RepoError> {
    DateTime::parse_from_rfc3339(value)
        .map(|t| t.with_timezone(&Utc))
        .map_err(|e| RepoError::serialization(format!("bad timestamp '{}': {}", value, e)))
}

pub(crate) fn decode_timestamp_opt(
    value: Option<String>,
) -> Result<Option<DateTime<Utc>>, RepoError> {
    value.as_deref().map(decode_timestamp).transpose()
}
