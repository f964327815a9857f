//! Active-mission cap enforcement.
//!
//! FIFO eviction: when a user holds more open missions than the cap, the
//! oldest assignments expire first. Nothing here distinguishes how the
//! excess appeared - over-eager assignment, a catalog burst, or a bug -
//! the bound holds regardless.

use std::sync::Arc;

use haulquest_domain::UserId;

use crate::infrastructure::ports::{ProgressRepo, RepoError};

/// Open missions a user may hold at once.
pub const ACTIVE_MISSION_CAP: usize = 10;

pub struct EnforceCap {
    progress: Arc<dyn ProgressRepo>,
    cap: usize,
}

impl EnforceCap {
    pub fn new(progress: Arc<dyn ProgressRepo>) -> Self {
        Self {
            progress,
            cap: ACTIVE_MISSION_CAP,
        }
    }

    pub fn with_cap(mut self, cap: usize) -> Self {
        self.cap = cap;
        self
    }

    pub fn cap(&self) -> usize {
        self.cap
    }

    /// Expire the oldest in-progress rows above the cap. Returns how many
    /// were expired.
    pub async fn execute(&self, user_id: UserId) -> Result<usize, RepoError> {
        let rows = self.progress.list_in_progress_oldest_first(user_id).await?;
        if rows.len() <= self.cap {
            return Ok(0);
        }

        let excess = rows.len() - self.cap;
        let mut expired = 0;
        for mut row in rows.into_iter().take(excess) {
            if row.expire() {
                self.progress.update(&row).await?;
                expired += 1;
            }
        }

        tracing::info!(user_id = %user_id, expired, "active-mission cap enforced");
        Ok(expired)
    }
}
