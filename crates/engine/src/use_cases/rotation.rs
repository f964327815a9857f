//! Mission rotation - materializes the deterministic weekly and daily
//! slates into windowed mission rows.
//!
//! Codes are derived from the period index, role, and slot, so re-running
//! a rotation within the same period inserts nothing new. That idempotence
//! is the only coordination between replicas.

use std::sync::Arc;

use haulquest_domain::{
    calendar, select_missions, Cadence, Mission, Role, DAILY_MISSION_COUNT, WEEKLY_MISSION_COUNT,
};

use crate::infrastructure::ports::{ClockPort, MissionRepo, RepoError};

pub struct MaterializeMissions {
    missions: Arc<dyn MissionRepo>,
    clock: Arc<dyn ClockPort>,
}

impl MaterializeMissions {
    pub fn new(missions: Arc<dyn MissionRepo>, clock: Arc<dyn ClockPort>) -> Self {
        Self { missions, clock }
    }

    /// Materialize this week's slate for every role. Returns the number
    /// of missions actually inserted; a second call in the same week
    /// returns zero.
    pub async fn materialize_week(&self) -> Result<usize, RepoError> {
        self.materialize(Cadence::Weekly).await
    }

    /// Daily analogue of [`materialize_week`](Self::materialize_week).
    pub async fn materialize_day(&self) -> Result<usize, RepoError> {
        self.materialize(Cadence::Daily).await
    }

    async fn materialize(&self, cadence: Cadence) -> Result<usize, RepoError> {
        let now = self.clock.now();

        let stale = self.missions.deactivate_ended(now).await?;
        if stale > 0 {
            tracing::info!(count = stale, "deactivated missions past their window");
        }

        let (period_index, (starts_at, ends_at), count) = match cadence {
            Cadence::Weekly => (
                calendar::week_index(now),
                calendar::week_bounds(now),
                WEEKLY_MISSION_COUNT,
            ),
            Cadence::Daily => (
                calendar::day_index(now),
                calendar::day_bounds(now),
                DAILY_MISSION_COUNT,
            ),
        };

        let mut inserted = 0;
        for role in Role::ALL {
            let picks = select_missions(role, cadence, count, period_index);
            for (slot, template) in picks.iter().enumerate() {
                let code = match cadence {
                    Cadence::Weekly => Mission::weekly_code(period_index, role, slot),
                    Cadence::Daily => Mission::daily_code(period_index, role, slot),
                };
                let mission =
                    Mission::from_template(template, code, role, starts_at, ends_at, slot);
                if self.missions.insert_if_absent(&mission).await? {
                    inserted += 1;
                }
            }
        }
        Ok(inserted)
    }
}
