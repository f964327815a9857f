//! Account cleanup - one logical purge of a user's gamification state.
//!
//! Dependents go first: progress rows, then the profile. Best-effort by
//! contract; a partial failure is logged and left for a later call, never
//! retried inline. A failed dependent delete also skips the profile so
//! ordering is preserved.

use std::sync::Arc;

use haulquest_domain::UserId;

use crate::infrastructure::ports::{ProfileRepo, ProgressRepo};

pub struct PurgeUser {
    progress: Arc<dyn ProgressRepo>,
    profiles: Arc<dyn ProfileRepo>,
}

impl PurgeUser {
    pub fn new(progress: Arc<dyn ProgressRepo>, profiles: Arc<dyn ProfileRepo>) -> Self {
        Self { progress, profiles }
    }

    pub async fn execute(&self, user_id: UserId) {
        let removed = match self.progress.delete_all_for_user(user_id).await {
            Ok(removed) => removed,
            Err(e) => {
                tracing::warn!(
                    user_id = %user_id,
                    error = %e,
                    "progress purge failed; profile left in place"
                );
                return;
            }
        };

        if let Err(e) = self.profiles.delete(user_id).await {
            tracing::warn!(user_id = %user_id, error = %e, "profile purge failed");
            return;
        }

        tracing::info!(user_id = %user_id, progress_rows = removed, "account gamification state purged");
    }
}
