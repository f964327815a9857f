//! HaulQuest domain - pure types and logic for the mission/XP engine.
//!
//! Everything here is synchronous and I/O-free: the catalog, the
//! deterministic rotation selector, the leveling curve, the progress
//! state machine, and the event matching rules. The engine crate wraps
//! this in ports, storage, and scheduling.

pub mod calendar;
pub mod catalog;
pub mod entities;
pub mod error;
pub mod events;
pub mod ids;
pub mod leveling;
pub mod selection;

pub use catalog::{
    catalog, Audience, Cadence, MissionCategory, MissionTemplate, Reward, RewardType, Role,
    TargetType, CATALOG_VERSION,
};
pub use entities::{AdvanceOutcome, GamificationProfile, Mission, MissionProgress, ProfileStats, ProgressStatus};
pub use error::DomainError;
pub use events::{EventKind, MatchRule};
pub use ids::{MissionId, ProgressId, UserId};
pub use leveling::{apply_xp, xp_to_next_level, LevelState};
pub use selection::{select_missions, DAILY_MISSION_COUNT, WEEKLY_MISSION_COUNT};
