//! Repository port traits for database access.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use haulquest_domain::{
    GamificationProfile, Mission, MissionId, MissionProgress, Role, UserId,
};

use super::error::RepoError;
use super::types::UserAccount;

// =============================================================================
// Mission storage
// =============================================================================

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MissionRepo: Send + Sync {
    async fn get(&self, id: MissionId) -> Result<Option<Mission>, RepoError>;

    /// Insert unless a mission with the same rotation code already exists.
    /// Returns true when a row was actually written - the idempotence the
    /// weekly regeneration leans on.
    async fn insert_if_absent(&self, mission: &Mission) -> Result<bool, RepoError>;

    async fn list_active(&self) -> Result<Vec<Mission>, RepoError>;
    async fn list_active_for_role(&self, role: Role) -> Result<Vec<Mission>, RepoError>;

    /// Deactivate still-active missions whose window has fully elapsed.
    /// Returns the number of rows touched.
    async fn deactivate_ended(&self, now: DateTime<Utc>) -> Result<u64, RepoError>;
}

// =============================================================================
// Progress storage
// =============================================================================

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProgressRepo: Send + Sync {
    /// Insert unless the user already holds a row for this mission
    /// (any status). Returns true when a row was written.
    async fn insert_if_absent(&self, progress: &MissionProgress) -> Result<bool, RepoError>;

    async fn update(&self, progress: &MissionProgress) -> Result<(), RepoError>;

    /// A user's in-progress rows joined with their mission definitions.
    async fn list_in_progress_with_missions(
        &self,
        user_id: UserId,
    ) -> Result<Vec<(MissionProgress, Mission)>, RepoError>;

    /// A user's in-progress rows, oldest assignment first (FIFO order for
    /// cap eviction).
    async fn list_in_progress_oldest_first(
        &self,
        user_id: UserId,
    ) -> Result<Vec<MissionProgress>, RepoError>;

    async fn count_in_progress(&self, user_id: UserId) -> Result<u64, RepoError>;

    /// In-progress row counts grouped by user, for the sync sweep.
    async fn in_progress_counts_by_user(&self) -> Result<Vec<(UserId, u64)>, RepoError>;

    /// Expire in-progress rows whose mission was deactivated or whose
    /// window has closed. Returns the number of rows touched.
    async fn expire_for_closed_missions(&self, now: DateTime<Utc>) -> Result<u64, RepoError>;

    async fn expire_all_for_user(&self, user_id: UserId) -> Result<u64, RepoError>;
    async fn delete_all_for_user(&self, user_id: UserId) -> Result<u64, RepoError>;
}

// =============================================================================
// Profile storage
// =============================================================================

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProfileRepo: Send + Sync {
    async fn get(&self, user_id: UserId) -> Result<Option<GamificationProfile>, RepoError>;

    /// Insert unless the user already has a profile. Returns true when a
    /// row was written.
    async fn insert_if_absent(&self, profile: &GamificationProfile) -> Result<bool, RepoError>;

    /// Optimistic-concurrency write: succeeds (returns true) only when the
    /// stored version still matches `profile.version()`, bumping it by one.
    async fn update_versioned(&self, profile: &GamificationProfile) -> Result<bool, RepoError>;

    async fn list_user_ids(&self) -> Result<Vec<UserId>, RepoError>;
    async fn delete(&self, user_id: UserId) -> Result<(), RepoError>;
}

// =============================================================================
// User directory (read-only view of host-owned accounts)
// =============================================================================

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserDirectoryPort: Send + Sync {
    async fn list_active(&self) -> Result<Vec<UserAccount>, RepoError>;
    async fn get(&self, user_id: UserId) -> Result<Option<UserAccount>, RepoError>;
}
