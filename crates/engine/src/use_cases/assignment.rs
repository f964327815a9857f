//! Mission assignment - creates progress rows for active accounts.
//!
//! Runs after each rotation pass and inside the sync sweep. The
//! (user, mission) uniqueness constraint makes re-assignment a no-op, and
//! the active cap bounds how many rows one user can ever hold open.

use std::sync::Arc;

use haulquest_domain::MissionProgress;

use crate::infrastructure::ports::{
    ClockPort, MissionRepo, ProgressRepo, RepoError, UserAccount, UserDirectoryPort,
};
use crate::use_cases::cap::ACTIVE_MISSION_CAP;

pub struct AssignMissions {
    missions: Arc<dyn MissionRepo>,
    progress: Arc<dyn ProgressRepo>,
    users: Arc<dyn UserDirectoryPort>,
    clock: Arc<dyn ClockPort>,
    cap: usize,
}

impl AssignMissions {
    pub fn new(
        missions: Arc<dyn MissionRepo>,
        progress: Arc<dyn ProgressRepo>,
        users: Arc<dyn UserDirectoryPort>,
        clock: Arc<dyn ClockPort>,
    ) -> Self {
        Self {
            missions,
            progress,
            users,
            clock,
            cap: ACTIVE_MISSION_CAP,
        }
    }

    pub fn with_cap(mut self, cap: usize) -> Self {
        self.cap = cap;
        self
    }

    /// Assign current missions to every active account. Per-user failures
    /// are logged and the sweep continues.
    pub async fn execute_all(&self) -> Result<usize, RepoError> {
        let accounts = self.users.list_active().await?;
        let mut assigned = 0;
        for account in accounts {
            match self.execute(&account).await {
                Ok(count) => assigned += count,
                Err(e) => {
                    tracing::warn!(
                        user_id = %account.id,
                        error = %e,
                        "mission assignment failed; continuing with next user"
                    );
                }
            }
        }
        Ok(assigned)
    }

    /// Assign this role's active missions to one account, stopping at the
    /// cap. Returns the number of rows created.
    pub async fn execute(&self, account: &UserAccount) -> Result<usize, RepoError> {
        let now = self.clock.now();
        let missions = self.missions.list_active_for_role(account.role).await?;
        let mut held = self.progress.count_in_progress(account.id).await? as usize;
        let mut assigned = 0;

        for mission in missions {
            if held >= self.cap {
                break;
            }
            if mission.window_closed(now) {
                continue;
            }
            let row = MissionProgress::assign(account.id, &mission, now);
            if self.progress.insert_if_absent(&row).await? {
                held += 1;
                assigned += 1;
            }
        }

        if assigned > 0 {
            tracing::debug!(user_id = %account.id, assigned, "assigned missions");
        }
        Ok(assigned)
    }
}
