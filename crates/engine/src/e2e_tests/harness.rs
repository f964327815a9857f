//! Shared fixtures for end-to-end tests over in-memory SQLite.

use std::sync::Arc;

use chrono::{DateTime, TimeZone, Utc};
use sqlx::{Row, SqlitePool};

use haulquest_domain::{
    Cadence, Mission, MissionCategory, MissionProgress, Role, TargetType, UserId,
};

use crate::app::{App, EngineConfig};
use crate::infrastructure::clock::ManualClock;
use crate::infrastructure::persistence::{connection, SqliteRepositories};
use crate::infrastructure::ports::{MissionRepo, ProgressRepo};
use crate::infrastructure::realtime::BroadcastRealtime;

/// 2025-06-11, a Wednesday, week index 23, day index 161.
pub fn wednesday() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 6, 11, 12, 0, 0).unwrap()
}

pub struct TestHarness {
    pub pool: SqlitePool,
    pub app: App,
    pub clock: Arc<ManualClock>,
    pub realtime: Arc<BroadcastRealtime>,
}

impl TestHarness {
    pub async fn new() -> Self {
        Self::at(wednesday()).await
    }

    pub async fn at(now: DateTime<Utc>) -> Self {
        let pool = connection::connect_in_memory().await.expect("in-memory db");
        let repos = SqliteRepositories::from_pool(pool.clone());
        let clock = Arc::new(ManualClock::new(now));
        let realtime = Arc::new(BroadcastRealtime::new(64));
        let app = App::with_ports(
            repos.mission,
            repos.progress,
            repos.profile,
            repos.users,
            realtime.clone(),
            clock.clone(),
            EngineConfig::default(),
        );
        Self {
            pool,
            app,
            clock,
            realtime,
        }
    }

    pub async fn seed_account(&self, id: i64, role: Role, is_active: bool) {
        sqlx::query("INSERT INTO accounts (id, role, is_active) VALUES (?, ?, ?)")
            .bind(id)
            .bind(role.as_str())
            .bind(is_active)
            .execute(&self.pool)
            .await
            .expect("seed account");
    }

    /// A deliveries/count mission windowed over this week, stored active.
    pub async fn insert_delivery_mission(&self, code: &str, target: f64, xp: u32) -> Mission {
        let starts = Utc.with_ymd_and_hms(2025, 6, 9, 0, 0, 0).unwrap();
        let ends = Utc.with_ymd_and_hms(2025, 6, 15, 23, 59, 59).unwrap();
        let mission = Mission::new(
            code,
            "Steady Hauler",
            MissionCategory::Deliveries,
            TargetType::Count,
            target,
            Role::Driver,
            Cadence::Weekly,
            starts,
            ends,
        )
        .with_xp(xp);
        assert!(self
            .app
            .repositories
            .mission
            .insert_if_absent(&mission)
            .await
            .expect("insert mission"));
        mission
    }

    pub async fn assign(&self, user_id: i64, mission: &Mission, at: DateTime<Utc>) {
        let row = MissionProgress::assign(UserId::new(user_id), mission, at);
        assert!(self
            .app
            .repositories
            .progress
            .insert_if_absent(&row)
            .await
            .expect("assign progress"));
    }

    /// (status, current_progress) for one user x mission pair.
    pub async fn progress_state(&self, user_id: i64, mission: &Mission) -> (String, f64) {
        let row = sqlx::query(
            "SELECT status, current_progress FROM mission_progress WHERE user_id = ? AND mission_id = ?",
        )
        .bind(user_id)
        .bind(mission.id().to_string())
        .fetch_one(&self.pool)
        .await
        .expect("progress row");
        (row.get("status"), row.get("current_progress"))
    }

    pub async fn count_rows(&self, table: &str) -> i64 {
        let row = sqlx::query(&format!("SELECT COUNT(*) AS n FROM {}", table))
            .fetch_one(&self.pool)
            .await
            .expect("count");
        row.get("n")
    }

    pub async fn count_progress_with_status(&self, user_id: i64, status: &str) -> i64 {
        let row = sqlx::query(
            "SELECT COUNT(*) AS n FROM mission_progress WHERE user_id = ? AND status = ?",
        )
        .bind(user_id)
        .bind(status)
        .fetch_one(&self.pool)
        .await
        .expect("count");
        row.get("n")
    }
}
