//! External service port traits (clock, realtime signal).

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::error::PublishError;

/// Topic the engine publishes completion signals on.
pub const MISSION_COMPLETED_TOPIC: &str = "gamification";

/// Time source, injected so window math and expiry are testable.
#[cfg_attr(test, mockall::automock)]
pub trait ClockPort: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Outbound realtime signal. The engine only needs a publish capability;
/// the host owns the actual transport.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RealtimePort: Send + Sync {
    async fn publish(
        &self,
        topic: &str,
        payload: serde_json::Value,
    ) -> Result<(), PublishError>;
}

/// Payload of the `mission_completed` signal.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MissionCompletedPayload {
    pub event_type: String,
    pub user_id: i64,
    pub completed_mission_names: Vec<String>,
    pub xp_earned: u32,
    pub new_level: u32,
    pub new_current_xp: u32,
}

impl MissionCompletedPayload {
    pub fn new(
        user_id: i64,
        completed_mission_names: Vec<String>,
        xp_earned: u32,
        new_level: u32,
        new_current_xp: u32,
    ) -> Self {
        Self {
            event_type: "mission_completed".to_string(),
            user_id,
            completed_mission_names,
            xp_earned,
            new_level,
            new_current_xp,
        }
    }
}
