//! Port traits for infrastructure boundaries.
//!
//! These are the ONLY abstractions in the engine. Everything else is
//! concrete types. Ports exist for:
//! - Database access (could swap SQLite -> Postgres)
//! - The outbound realtime signal (host-owned transport)
//! - Clock (for testing window math and expiry)

mod error;
mod external;
mod repos;
pub mod types;

pub use error::{PublishError, RepoError};
pub use external::{
    ClockPort, MissionCompletedPayload, RealtimePort, MISSION_COMPLETED_TOPIC,
};
pub use repos::{MissionRepo, ProfileRepo, ProgressRepo, UserDirectoryPort};
pub use types::UserAccount;

#[cfg(test)]
pub use external::{MockClockPort, MockRealtimePort};
#[cfg(test)]
pub use repos::{MockMissionRepo, MockProfileRepo, MockProgressRepo, MockUserDirectoryPort};
