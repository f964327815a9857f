//! The periodic system sync sweep.
//!
//! Four idempotent steps: expire progress on closed missions, expire
//! progress of non-active accounts, backfill missing profiles, and
//! enforce the active-mission cap. Every step and every user inside a
//! step is fault-isolated; one failure is logged and the sweep moves on.

use std::collections::HashSet;
use std::sync::Arc;

use haulquest_domain::{GamificationProfile, UserId};

use crate::infrastructure::ports::{
    ClockPort, ProfileRepo, ProgressRepo, RepoError, UserDirectoryPort,
};
use crate::use_cases::cap::EnforceCap;

pub struct SystemSync {
    progress: Arc<dyn ProgressRepo>,
    profiles: Arc<dyn ProfileRepo>,
    users: Arc<dyn UserDirectoryPort>,
    cap: Arc<EnforceCap>,
    clock: Arc<dyn ClockPort>,
}

impl SystemSync {
    pub fn new(
        progress: Arc<dyn ProgressRepo>,
        profiles: Arc<dyn ProfileRepo>,
        users: Arc<dyn UserDirectoryPort>,
        cap: Arc<EnforceCap>,
        clock: Arc<dyn ClockPort>,
    ) -> Self {
        Self {
            progress,
            profiles,
            users,
            cap,
            clock,
        }
    }

    /// Run the full sweep. Never fails; step errors are logged and the
    /// remaining steps still run.
    pub async fn execute(&self) {
        if let Err(e) = self.expire_stale_progress().await {
            tracing::warn!(error = %e, "stale-progress expiry skipped");
        }
        if let Err(e) = self.expire_orphaned_progress().await {
            tracing::warn!(error = %e, "orphaned-progress expiry skipped");
        }
        if let Err(e) = self.backfill_profiles().await {
            tracing::warn!(error = %e, "profile backfill skipped");
        }
        if let Err(e) = self.enforce_caps().await {
            tracing::warn!(error = %e, "cap enforcement sweep skipped");
        }
    }

    /// Progress whose parent mission was deactivated or whose window
    /// closed moves to expired.
    async fn expire_stale_progress(&self) -> Result<(), RepoError> {
        let expired = self
            .progress
            .expire_for_closed_missions(self.clock.now())
            .await?;
        if expired > 0 {
            tracing::info!(expired, "expired progress on closed missions");
        }
        Ok(())
    }

    /// Progress held by deactivated or deleted accounts moves to expired.
    async fn expire_orphaned_progress(&self) -> Result<(), RepoError> {
        let active: HashSet<UserId> = self
            .users
            .list_active()
            .await?
            .into_iter()
            .map(|account| account.id)
            .collect();

        for (user_id, _) in self.progress.in_progress_counts_by_user().await? {
            if active.contains(&user_id) {
                continue;
            }
            match self.progress.expire_all_for_user(user_id).await {
                Ok(expired) if expired > 0 => {
                    tracing::info!(user_id = %user_id, expired, "expired orphaned progress");
                }
                Ok(_) => {}
                Err(e) => {
                    tracing::warn!(user_id = %user_id, error = %e, "orphan expiry failed; continuing");
                }
            }
        }
        Ok(())
    }

    /// Every active account gets a profile, so later dispatches have a row
    /// to settle XP into.
    async fn backfill_profiles(&self) -> Result<(), RepoError> {
        let existing: HashSet<UserId> = self.profiles.list_user_ids().await?.into_iter().collect();

        for account in self.users.list_active().await? {
            if existing.contains(&account.id) {
                continue;
            }
            let profile = GamificationProfile::new(account.id);
            match self.profiles.insert_if_absent(&profile).await {
                Ok(true) => {
                    tracing::info!(user_id = %account.id, "backfilled missing profile");
                }
                Ok(false) => {}
                Err(e) => {
                    tracing::warn!(user_id = %account.id, error = %e, "profile backfill failed; continuing");
                }
            }
        }
        Ok(())
    }

    /// Users above the cap get their oldest missions expired.
    async fn enforce_caps(&self) -> Result<(), RepoError> {
        for (user_id, held) in self.progress.in_progress_counts_by_user().await? {
            if held as usize <= self.cap.cap() {
                continue;
            }
            if let Err(e) = self.cap.execute(user_id).await {
                tracing::warn!(user_id = %user_id, error = %e, "cap enforcement failed; continuing");
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::ports::{
        MockClockPort, MockProfileRepo, MockProgressRepo, MockUserDirectoryPort, UserAccount,
    };
    use chrono::{TimeZone, Utc};
    use haulquest_domain::Role;

    fn fixed_clock() -> MockClockPort {
        let mut clock = MockClockPort::new();
        clock
            .expect_now()
            .returning(|| Utc.with_ymd_and_hms(2025, 6, 11, 12, 0, 0).unwrap());
        clock
    }

    #[tokio::test]
    async fn expires_progress_of_inactive_accounts_only() {
        let mut users = MockUserDirectoryPort::new();
        users
            .expect_list_active()
            .returning(|| Ok(vec![UserAccount::new(UserId::new(1), Role::Driver)]));

        let mut progress = MockProgressRepo::new();
        progress.expect_expire_for_closed_missions().returning(|_| Ok(0));
        progress
            .expect_in_progress_counts_by_user()
            .returning(|| Ok(vec![(UserId::new(1), 4), (UserId::new(2), 3)]));
        // Only the deactivated account (2) gets expired.
        progress
            .expect_expire_all_for_user()
            .times(1)
            .returning(|user_id| {
                assert_eq!(user_id, UserId::new(2));
                Ok(3)
            });

        let mut profiles = MockProfileRepo::new();
        profiles
            .expect_list_user_ids()
            .returning(|| Ok(vec![UserId::new(1)]));
        profiles.expect_insert_if_absent().returning(|_| Ok(true));

        let cap = Arc::new(EnforceCap::new(Arc::new({
            let mut repo = MockProgressRepo::new();
            repo.expect_list_in_progress_oldest_first()
                .returning(|_| Ok(vec![]));
            repo
        })));

        let sync = SystemSync::new(
            Arc::new(progress),
            Arc::new(profiles),
            Arc::new(users),
            cap,
            Arc::new(fixed_clock()),
        );
        sync.execute().await;
    }

    #[tokio::test]
    async fn backfills_profiles_for_active_accounts_lacking_one() {
        let mut users = MockUserDirectoryPort::new();
        users.expect_list_active().returning(|| {
            Ok(vec![
                UserAccount::new(UserId::new(1), Role::Driver),
                UserAccount::new(UserId::new(2), Role::Shipper),
            ])
        });

        let mut progress = MockProgressRepo::new();
        progress.expect_expire_for_closed_missions().returning(|_| Ok(0));
        progress
            .expect_in_progress_counts_by_user()
            .returning(|| Ok(vec![]));

        let mut profiles = MockProfileRepo::new();
        profiles
            .expect_list_user_ids()
            .returning(|| Ok(vec![UserId::new(1)]));
        profiles
            .expect_insert_if_absent()
            .times(1)
            .returning(|profile| {
                assert_eq!(profile.user_id(), UserId::new(2));
                assert_eq!(profile.level(), 1);
                Ok(true)
            });

        let cap = Arc::new(EnforceCap::new(Arc::new(MockProgressRepo::new())));

        let sync = SystemSync::new(
            Arc::new(progress),
            Arc::new(profiles),
            Arc::new(users),
            cap,
            Arc::new(fixed_clock()),
        );
        sync.execute().await;
    }

    #[tokio::test]
    async fn a_failing_step_does_not_stop_the_sweep() {
        let mut users = MockUserDirectoryPort::new();
        users
            .expect_list_active()
            .returning(|| Err(RepoError::database("accounts.list_active", "down")));

        let mut progress = MockProgressRepo::new();
        progress
            .expect_expire_for_closed_missions()
            .returning(|_| Err(RepoError::database("progress.expire_closed", "down")));
        // Cap sweep still runs even though earlier steps failed.
        progress
            .expect_in_progress_counts_by_user()
            .times(1)
            .returning(|| Ok(vec![]));

        let mut profiles = MockProfileRepo::new();
        profiles.expect_list_user_ids().returning(|| Ok(vec![]));
        let cap = Arc::new(EnforceCap::new(Arc::new(MockProgressRepo::new())));

        let sync = SystemSync::new(
            Arc::new(progress),
            Arc::new(profiles),
            Arc::new(users),
            cap,
            Arc::new(fixed_clock()),
        );
        sync.execute().await;
    }
}
