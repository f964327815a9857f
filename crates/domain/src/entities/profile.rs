//! Gamification profile - one per user, the XP/level/streak accumulator.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::catalog::MissionCategory;
use crate::ids::UserId;
use crate::leveling::{self, LevelState};

/// Free-form aggregate counters kept alongside the profile.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileStats {
    pub missions_completed: u32,
    pub completed_by_category: BTreeMap<MissionCategory, u32>,
}

impl ProfileStats {
    pub fn record_completion(&mut self, category: MissionCategory) {
        self.missions_completed += 1;
        *self.completed_by_category.entry(category).or_insert(0) += 1;
    }
}

/// One user's lifetime gamification state.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GamificationProfile {
    user_id: UserId,
    level: u32,
    current_xp: u32,
    xp_to_next_level: u32,
    /// Lifetime counter; never decreases.
    total_xp: u64,
    streak_days: u32,
    longest_streak: u32,
    last_activity_at: Option<DateTime<Utc>>,
    stats: ProfileStats,
    /// Optimistic-concurrency counter; bumped by the store on every write.
    version: i64,
}

impl GamificationProfile {
    /// A fresh level-1 profile.
    pub fn new(user_id: UserId) -> Self {
        let state = LevelState::new();
        Self {
            user_id,
            level: state.level,
            current_xp: state.current_xp,
            xp_to_next_level: state.xp_to_next_level,
            total_xp: state.total_xp,
            streak_days: 0,
            longest_streak: 0,
            last_activity_at: None,
            stats: ProfileStats::default(),
            version: 0,
        }
    }

    // === Accessors ===

    pub fn user_id(&self) -> UserId {
        self.user_id
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn current_xp(&self) -> u32 {
        self.current_xp
    }

    pub fn xp_to_next_level(&self) -> u32 {
        self.xp_to_next_level
    }

    pub fn total_xp(&self) -> u64 {
        self.total_xp
    }

    pub fn streak_days(&self) -> u32 {
        self.streak_days
    }

    pub fn longest_streak(&self) -> u32 {
        self.longest_streak
    }

    pub fn last_activity_at(&self) -> Option<DateTime<Utc>> {
        self.last_activity_at
    }

    pub fn stats(&self) -> &ProfileStats {
        &self.stats
    }

    pub fn version(&self) -> i64 {
        self.version
    }

    // === Builder Methods (hydration from storage) ===

    pub fn with_level_state(mut self, state: LevelState) -> Self {
        self.level = state.level;
        self.current_xp = state.current_xp;
        self.xp_to_next_level = state.xp_to_next_level;
        self.total_xp = state.total_xp;
        self
    }

    pub fn with_streaks(mut self, streak_days: u32, longest_streak: u32) -> Self {
        self.streak_days = streak_days;
        self.longest_streak = longest_streak;
        self
    }

    pub fn with_last_activity_at(mut self, at: Option<DateTime<Utc>>) -> Self {
        self.last_activity_at = at;
        self
    }

    pub fn with_stats(mut self, stats: ProfileStats) -> Self {
        self.stats = stats;
        self
    }

    pub fn with_version(mut self, version: i64) -> Self {
        self.version = version;
        self
    }

    // === Mutations ===

    /// The leveling fields as a detached state for the pure curve math.
    pub fn level_state(&self) -> LevelState {
        LevelState {
            level: self.level,
            current_xp: self.current_xp,
            xp_to_next_level: self.xp_to_next_level,
            total_xp: self.total_xp,
        }
    }

    /// Apply an XP delta through the leveling curve.
    pub fn apply_xp(&mut self, delta: u32) {
        let state = leveling::apply_xp(self.level_state(), delta);
        self.level = state.level;
        self.current_xp = state.current_xp;
        self.xp_to_next_level = state.xp_to_next_level;
        self.total_xp = state.total_xp;
    }

    /// Record one completed mission in the stats aggregate.
    pub fn record_completion(&mut self, category: MissionCategory) {
        self.stats.record_completion(category);
    }

    /// Touch the streak tracker: consecutive-calendar-day activity grows
    /// the streak, a same-day touch is a no-op, a gap resets to 1.
    pub fn touch_streak(&mut self, now: DateTime<Utc>) {
        let today = now.date_naive();
        match self.last_activity_at.map(|t| t.date_naive()) {
            Some(last) if last == today => {}
            Some(last) if today.pred_opt() == Some(last) => {
                self.streak_days += 1;
            }
            _ => {
                self.streak_days = 1;
            }
        }
        self.longest_streak = self.longest_streak.max(self.streak_days);
        self.last_activity_at = Some(now);
    }
}
