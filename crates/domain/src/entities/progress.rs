//! Per-user mission progress and its state machine.
//!
//! `not_started -> in_progress -> {completed | expired}`. The terminal
//! states absorb: no write may leave them. Assignments are created
//! directly in `in_progress`; `not_started` is reserved for missions that
//! will one day require an explicit opt-in.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::entities::Mission;
use crate::error::DomainError;
use crate::ids::{MissionId, ProgressId, UserId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProgressStatus {
    NotStarted,
    InProgress,
    Completed,
    Expired,
}

impl ProgressStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Expired)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NotStarted => "not_started",
            Self::InProgress => "in_progress",
            Self::Completed => "completed",
            Self::Expired => "expired",
        }
    }
}

impl fmt::Display for ProgressStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ProgressStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "not_started" => Ok(Self::NotStarted),
            "in_progress" => Ok(Self::InProgress),
            "completed" => Ok(Self::Completed),
            "expired" => Ok(Self::Expired),
            _ => Err(DomainError::parse(format!("Unknown progress status: {}", s))),
        }
    }
}

/// Result of advancing a progress row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdvanceOutcome {
    /// Row was not in progress; nothing changed.
    Ignored,
    /// Progress moved but the target is still ahead.
    Advanced,
    /// The target was reached with this advance.
    Completed,
}

/// One user's tracking record for one mission.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MissionProgress {
    id: ProgressId,
    user_id: UserId,
    mission_id: MissionId,
    current_progress: f64,
    /// Copied from the mission at assignment so later target edits never
    /// move the goalposts on in-flight progress.
    target_progress: f64,
    status: ProgressStatus,
    started_at: DateTime<Utc>,
    completed_at: Option<DateTime<Utc>>,
}

impl MissionProgress {
    /// Assign a mission to a user, directly in progress.
    pub fn assign(user_id: UserId, mission: &Mission, now: DateTime<Utc>) -> Self {
        Self {
            id: ProgressId::new(),
            user_id,
            mission_id: mission.id(),
            current_progress: 0.0,
            target_progress: mission.target_value(),
            status: ProgressStatus::InProgress,
            started_at: now,
            completed_at: None,
        }
    }

    // === Accessors ===

    pub fn id(&self) -> ProgressId {
        self.id
    }

    pub fn user_id(&self) -> UserId {
        self.user_id
    }

    pub fn mission_id(&self) -> MissionId {
        self.mission_id
    }

    pub fn current_progress(&self) -> f64 {
        self.current_progress
    }

    pub fn target_progress(&self) -> f64 {
        self.target_progress
    }

    pub fn status(&self) -> ProgressStatus {
        self.status
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    pub fn completed_at(&self) -> Option<DateTime<Utc>> {
        self.completed_at
    }

    /// Rebuild a row from storage, re-clamping the invariant on the way
    /// in so a hand-edited row can't smuggle progress past its target.
    pub fn hydrate(
        id: ProgressId,
        user_id: UserId,
        mission_id: MissionId,
        current_progress: f64,
        target_progress: f64,
        status: ProgressStatus,
        started_at: DateTime<Utc>,
        completed_at: Option<DateTime<Utc>>,
    ) -> Self {
        Self {
            id,
            user_id,
            mission_id,
            current_progress: current_progress.min(target_progress).max(0.0),
            target_progress,
            status,
            started_at,
            completed_at,
        }
    }

    // === State transitions ===

    /// Advance toward the target, clamping at it. Terminal and
    /// not-yet-started rows are ignored.
    pub fn advance(&mut self, amount: f64, now: DateTime<Utc>) -> AdvanceOutcome {
        if self.status != ProgressStatus::InProgress {
            return AdvanceOutcome::Ignored;
        }
        self.current_progress = (self.current_progress + amount)
            .min(self.target_progress)
            .max(0.0);
        if self.current_progress >= self.target_progress {
            self.status = ProgressStatus::Completed;
            self.completed_at = Some(now);
            AdvanceOutcome::Completed
        } else {
            AdvanceOutcome::Advanced
        }
    }

    /// Expire the row. Returns false (and leaves the row untouched) when
    /// it is already terminal, so sweeps stay idempotent.
    pub fn expire(&mut self) -> bool {
        if self.status.is_terminal() {
            return false;
        }
        self.status = ProgressStatus::Expired;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{Cadence, MissionCategory, Role, TargetType};
    use chrono::TimeZone;

    fn test_mission() -> Mission {
        Mission::new(
            "wk_23_driver_0",
            "Steady Hauler",
            MissionCategory::Deliveries,
            TargetType::Count,
            3.0,
            Role::Driver,
            Cadence::Weekly,
            Utc.with_ymd_and_hms(2025, 6, 9, 0, 0, 0).unwrap(),
            Utc.with_ymd_and_hms(2025, 6, 15, 23, 59, 59).unwrap(),
        )
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 10, 9, 0, 0).unwrap()
    }

    #[test]
    fn test_assignment_starts_in_progress() {
        let progress = MissionProgress::assign(UserId::new(7), &test_mission(), now());
        assert_eq!(progress.status(), ProgressStatus::InProgress);
        assert_eq!(progress.current_progress(), 0.0);
        assert_eq!(progress.target_progress(), 3.0);
        assert!(progress.completed_at().is_none());
    }

    #[test]
    fn test_advance_completes_exactly_at_target() {
        let mut progress = MissionProgress::assign(UserId::new(7), &test_mission(), now());
        assert_eq!(progress.advance(1.0, now()), AdvanceOutcome::Advanced);
        assert_eq!(progress.advance(1.0, now()), AdvanceOutcome::Advanced);
        assert_eq!(progress.advance(1.0, now()), AdvanceOutcome::Completed);
        assert_eq!(progress.status(), ProgressStatus::Completed);
        assert_eq!(progress.completed_at(), Some(now()));
    }

    #[test]
    fn test_progress_clamps_at_target() {
        let mut progress = MissionProgress::assign(UserId::new(7), &test_mission(), now());
        assert_eq!(progress.advance(50.0, now()), AdvanceOutcome::Completed);
        assert_eq!(progress.current_progress(), 3.0);
    }

    #[test]
    fn test_terminal_states_absorb_advances() {
        let mut progress = MissionProgress::assign(UserId::new(7), &test_mission(), now());
        progress.advance(3.0, now());
        assert_eq!(progress.advance(1.0, now()), AdvanceOutcome::Ignored);
        assert_eq!(progress.current_progress(), 3.0);

        let mut expired = MissionProgress::assign(UserId::new(7), &test_mission(), now());
        assert!(expired.expire());
        assert_eq!(expired.advance(1.0, now()), AdvanceOutcome::Ignored);
    }

    #[test]
    fn test_expire_is_idempotent() {
        let mut progress = MissionProgress::assign(UserId::new(7), &test_mission(), now());
        assert!(progress.expire());
        assert!(!progress.expire());
        assert_eq!(progress.status(), ProgressStatus::Expired);
    }

    #[test]
    fn test_completed_rows_never_expire() {
        let mut progress = MissionProgress::assign(UserId::new(7), &test_mission(), now());
        progress.advance(3.0, now());
        assert!(!progress.expire());
        assert_eq!(progress.status(), ProgressStatus::Completed);
    }

    #[test]
    fn test_hydration_clamps_current_progress() {
        let progress = MissionProgress::hydrate(
            ProgressId::new(),
            UserId::new(7),
            MissionId::new(),
            99.0,
            3.0,
            ProgressStatus::InProgress,
            now(),
            None,
        );
        assert_eq!(progress.current_progress(), 3.0);
    }
}
