//! Lazy profile provisioning.

use std::sync::Arc;

use haulquest_domain::{GamificationProfile, UserId};

use crate::infrastructure::ports::{ProfileRepo, RepoError};

/// Get-or-create for the profile row, used at login/registration. Racing
/// callers both end up with the same stored row.
pub struct EnsureProfile {
    profiles: Arc<dyn ProfileRepo>,
}

impl EnsureProfile {
    pub fn new(profiles: Arc<dyn ProfileRepo>) -> Self {
        Self { profiles }
    }

    pub async fn execute(&self, user_id: UserId) -> Result<GamificationProfile, RepoError> {
        if let Some(profile) = self.profiles.get(user_id).await? {
            return Ok(profile);
        }

        let fresh = GamificationProfile::new(user_id);
        if self.profiles.insert_if_absent(&fresh).await? {
            tracing::info!(user_id = %user_id, "created gamification profile");
        }
        // Re-read either way: a racing creator may have won the insert.
        self.profiles
            .get(user_id)
            .await?
            .ok_or_else(|| RepoError::not_found("GamificationProfile", user_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::ports::MockProfileRepo;

    #[tokio::test]
    async fn returns_existing_profile_without_insert() {
        let mut profiles = MockProfileRepo::new();
        profiles
            .expect_get()
            .times(1)
            .returning(|id| Ok(Some(GamificationProfile::new(id))));

        let use_case = EnsureProfile::new(Arc::new(profiles));
        let profile = use_case.execute(UserId::new(7)).await.expect("profile");
        assert_eq!(profile.user_id(), UserId::new(7));
    }

    #[tokio::test]
    async fn creates_and_rereads_when_missing() {
        let mut profiles = MockProfileRepo::new();
        let mut calls = 0;
        profiles.expect_get().times(2).returning(move |id| {
            calls += 1;
            if calls == 1 {
                Ok(None)
            } else {
                Ok(Some(GamificationProfile::new(id)))
            }
        });
        profiles
            .expect_insert_if_absent()
            .times(1)
            .returning(|_| Ok(true));

        let use_case = EnsureProfile::new(Arc::new(profiles));
        let profile = use_case.execute(UserId::new(7)).await.expect("profile");
        assert_eq!(profile.level(), 1);
    }
}
