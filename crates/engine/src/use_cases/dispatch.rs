//! Event-to-progress dispatch.
//!
//! One call advances every matching in-progress mission for the user,
//! settles the accumulated XP into the profile in a single
//! read-modify-write, and touches the streak tracker. Errors never leave
//! this module: a dispatch that cannot complete is logged and dropped, and
//! the business operation that produced the event is never affected.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use haulquest_domain::{
    AdvanceOutcome, EventKind, MatchRule, MissionCategory, UserId,
};

use crate::infrastructure::ports::{
    ClockPort, MissionCompletedPayload, ProfileRepo, ProgressRepo, RealtimePort, RepoError,
    MISSION_COMPLETED_TOPIC,
};

/// Attempts at the optimistic profile write before the dispatch is
/// dropped.
const XP_SETTLEMENT_ATTEMPTS: usize = 3;

/// One inbound business event.
#[derive(Debug, Clone)]
pub struct DispatchRequest {
    pub user_id: UserId,
    pub event: EventKind,
    pub value: f64,
    pub metadata: Option<serde_json::Value>,
}

impl DispatchRequest {
    pub fn new(user_id: UserId, event: EventKind) -> Self {
        Self {
            user_id,
            event,
            value: 1.0,
            metadata: None,
        }
    }

    pub fn with_value(mut self, value: f64) -> Self {
        self.value = value;
        self
    }

    pub fn with_metadata(mut self, metadata: serde_json::Value) -> Self {
        self.metadata = Some(metadata);
        self
    }
}

struct CompletedMission {
    name: String,
    category: MissionCategory,
    xp: u32,
}

pub struct ProcessEvent {
    progress: Arc<dyn ProgressRepo>,
    profiles: Arc<dyn ProfileRepo>,
    realtime: Arc<dyn RealtimePort>,
    clock: Arc<dyn ClockPort>,
}

impl ProcessEvent {
    pub fn new(
        progress: Arc<dyn ProgressRepo>,
        profiles: Arc<dyn ProfileRepo>,
        realtime: Arc<dyn RealtimePort>,
        clock: Arc<dyn ClockPort>,
    ) -> Self {
        Self {
            progress,
            profiles,
            realtime,
            clock,
        }
    }

    /// Process one event. Infallible by contract: every internal error is
    /// caught and logged here.
    pub async fn execute(&self, request: &DispatchRequest) {
        if let Err(e) = self.try_process(request).await {
            tracing::warn!(
                user_id = %request.user_id,
                event = %request.event,
                error = %e,
                "dispatch dropped"
            );
        }
    }

    async fn try_process(&self, request: &DispatchRequest) -> Result<(), RepoError> {
        // Unmapped events are a no-op, not an error.
        let Some(rule) = request.event.match_rule() else {
            tracing::debug!(event = %request.event, "ignoring unmapped event");
            return Ok(());
        };
        tracing::trace!(
            user_id = %request.user_id,
            event = %request.event,
            value = request.value,
            metadata = ?request.metadata,
            "processing dispatch"
        );

        let now = self.clock.now();
        let completed = self.advance_missions(request, &rule, now).await?;
        self.settle_profile(request.user_id, &completed, now).await
    }

    async fn advance_missions(
        &self,
        request: &DispatchRequest,
        rule: &MatchRule,
        now: DateTime<Utc>,
    ) -> Result<Vec<CompletedMission>, RepoError> {
        let rows = self
            .progress
            .list_in_progress_with_missions(request.user_id)
            .await?;

        let mut completed = Vec::new();
        for (mut row, mission) in rows {
            if !rule.accepts(mission.category(), mission.target_type()) {
                continue;
            }
            match row.advance(request.value, now) {
                AdvanceOutcome::Completed => {
                    self.progress.update(&row).await?;
                    tracing::debug!(
                        user_id = %request.user_id,
                        mission = mission.code(),
                        "mission completed"
                    );
                    completed.push(CompletedMission {
                        name: mission.name().to_string(),
                        category: mission.category(),
                        xp: mission.xp(),
                    });
                }
                AdvanceOutcome::Advanced => {
                    self.progress.update(&row).await?;
                }
                AdvanceOutcome::Ignored => {}
            }
        }
        Ok(completed)
    }

    /// One profile read-modify-write per dispatch: the streak touch always,
    /// plus XP and stats when missions completed. Guarded by the version
    /// column; a sustained conflict drops the write after logging.
    async fn settle_profile(
        &self,
        user_id: UserId,
        completed: &[CompletedMission],
        now: DateTime<Utc>,
    ) -> Result<(), RepoError> {
        let xp_earned: u32 = completed.iter().map(|c| c.xp).sum();

        for _ in 0..XP_SETTLEMENT_ATTEMPTS {
            let Some(mut profile) = self.profiles.get(user_id).await? else {
                if xp_earned > 0 {
                    tracing::warn!(
                        user_id = %user_id,
                        xp = xp_earned,
                        "profile missing; XP dropped until sync backfills it"
                    );
                }
                return Ok(());
            };

            profile.touch_streak(now);
            if xp_earned > 0 {
                profile.apply_xp(xp_earned);
                for mission in completed {
                    profile.record_completion(mission.category);
                }
            }

            if self.profiles.update_versioned(&profile).await? {
                if xp_earned > 0 {
                    self.publish_completions(user_id, completed, xp_earned, &profile)
                        .await;
                }
                return Ok(());
            }
            // Version conflict: another dispatch won the write; reload and retry.
        }

        tracing::warn!(
            user_id = %user_id,
            xp = xp_earned,
            "profile write kept conflicting; settlement dropped"
        );
        Ok(())
    }

    async fn publish_completions(
        &self,
        user_id: UserId,
        completed: &[CompletedMission],
        xp_earned: u32,
        profile: &haulquest_domain::GamificationProfile,
    ) {
        let payload = MissionCompletedPayload::new(
            user_id.as_i64(),
            completed.iter().map(|c| c.name.clone()).collect(),
            xp_earned,
            profile.level(),
            profile.current_xp(),
        );
        match serde_json::to_value(&payload) {
            Ok(json) => {
                if let Err(e) = self.realtime.publish(MISSION_COMPLETED_TOPIC, json).await {
                    tracing::warn!(user_id = %user_id, error = %e, "completion signal failed");
                }
            }
            Err(e) => {
                tracing::warn!(user_id = %user_id, error = %e, "completion payload failed to serialize");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::ports::{
        MockClockPort, MockProfileRepo, MockProgressRepo, MockRealtimePort,
    };
    use chrono::TimeZone;
    use haulquest_domain::{
        Cadence, GamificationProfile, Mission, MissionProgress, ProgressStatus, Role, TargetType,
    };

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 11, 12, 0, 0).unwrap()
    }

    fn fixed_clock() -> MockClockPort {
        let mut clock = MockClockPort::new();
        clock.expect_now().returning(now);
        clock
    }

    fn delivery_mission(target: f64, xp: u32) -> Mission {
        Mission::new(
            "wk_23_driver_0",
            "Steady Hauler",
            MissionCategory::Deliveries,
            TargetType::Count,
            target,
            Role::Driver,
            Cadence::Weekly,
            Utc.with_ymd_and_hms(2025, 6, 9, 0, 0, 0).unwrap(),
            Utc.with_ymd_and_hms(2025, 6, 15, 23, 59, 59).unwrap(),
        )
        .with_xp(xp)
    }

    fn row_for(user_id: UserId, mission: &Mission, current: f64) -> MissionProgress {
        MissionProgress::hydrate(
            haulquest_domain::ProgressId::new(),
            user_id,
            mission.id(),
            current,
            mission.target_value(),
            ProgressStatus::InProgress,
            now(),
            None,
        )
    }

    fn quiet_realtime() -> MockRealtimePort {
        let mut realtime = MockRealtimePort::new();
        realtime.expect_publish().returning(|_, _| Ok(()));
        realtime
    }

    #[tokio::test]
    async fn non_matching_events_leave_progress_untouched() {
        let user_id = UserId::new(7);
        let mission = delivery_mission(3.0, 250);
        let row = row_for(user_id, &mission, 1.0);

        let mut progress = MockProgressRepo::new();
        progress
            .expect_list_in_progress_with_missions()
            .returning(move |_| Ok(vec![(row.clone(), mission.clone())]));
        // No update expected: message_sent maps to social/count only.

        let mut profiles = MockProfileRepo::new();
        profiles
            .expect_get()
            .returning(|id| Ok(Some(GamificationProfile::new(id))));
        profiles.expect_update_versioned().returning(|_| Ok(true));

        let use_case = ProcessEvent::new(
            Arc::new(progress),
            Arc::new(profiles),
            Arc::new(quiet_realtime()),
            Arc::new(fixed_clock()),
        );
        use_case
            .execute(&DispatchRequest::new(user_id, EventKind::MessageSent))
            .await;
    }

    #[tokio::test]
    async fn completion_settles_xp_once_and_publishes() {
        let user_id = UserId::new(7);
        let mission = delivery_mission(3.0, 250);
        let row = row_for(user_id, &mission, 2.0);

        let mut progress = MockProgressRepo::new();
        progress
            .expect_list_in_progress_with_missions()
            .returning(move |_| Ok(vec![(row.clone(), mission.clone())]));
        progress.expect_update().times(1).returning(|row| {
            assert_eq!(row.status(), ProgressStatus::Completed);
            assert_eq!(row.current_progress(), 3.0);
            Ok(())
        });

        let mut profiles = MockProfileRepo::new();
        profiles
            .expect_get()
            .times(1)
            .returning(|id| Ok(Some(GamificationProfile::new(id))));
        profiles
            .expect_update_versioned()
            .times(1)
            .returning(|profile| {
                assert_eq!(profile.total_xp(), 250);
                assert_eq!(profile.stats().missions_completed, 1);
                assert_eq!(profile.streak_days(), 1);
                Ok(true)
            });

        let mut realtime = MockRealtimePort::new();
        realtime
            .expect_publish()
            .times(1)
            .returning(|topic, payload| {
                assert_eq!(topic, MISSION_COMPLETED_TOPIC);
                assert_eq!(payload["eventType"], "mission_completed");
                assert_eq!(payload["userId"], 7);
                assert_eq!(payload["xpEarned"], 250);
                assert_eq!(payload["completedMissionNames"][0], "Steady Hauler");
                Ok(())
            });

        let use_case = ProcessEvent::new(
            Arc::new(progress),
            Arc::new(profiles),
            Arc::new(realtime),
            Arc::new(fixed_clock()),
        );
        use_case
            .execute(&DispatchRequest::new(user_id, EventKind::LoadCompleted))
            .await;
    }

    #[tokio::test]
    async fn partial_progress_is_persisted_without_settlement() {
        let user_id = UserId::new(7);
        let mission = delivery_mission(3.0, 250);
        let row = row_for(user_id, &mission, 0.0);

        let mut progress = MockProgressRepo::new();
        progress
            .expect_list_in_progress_with_missions()
            .returning(move |_| Ok(vec![(row.clone(), mission.clone())]));
        progress.expect_update().times(1).returning(|row| {
            assert_eq!(row.status(), ProgressStatus::InProgress);
            assert_eq!(row.current_progress(), 1.0);
            Ok(())
        });

        let mut profiles = MockProfileRepo::new();
        profiles
            .expect_get()
            .returning(|id| Ok(Some(GamificationProfile::new(id))));
        // Streak touch still writes, but no XP lands.
        profiles
            .expect_update_versioned()
            .times(1)
            .returning(|profile| {
                assert_eq!(profile.total_xp(), 0);
                assert_eq!(profile.streak_days(), 1);
                Ok(true)
            });

        // No publish expected with zero XP.
        let realtime = MockRealtimePort::new();

        let use_case = ProcessEvent::new(
            Arc::new(progress),
            Arc::new(profiles),
            Arc::new(realtime),
            Arc::new(fixed_clock()),
        );
        use_case
            .execute(&DispatchRequest::new(user_id, EventKind::LoadCompleted))
            .await;
    }

    #[tokio::test]
    async fn missing_profile_drops_xp_without_failing() {
        let user_id = UserId::new(7);
        let mission = delivery_mission(1.0, 250);
        let row = row_for(user_id, &mission, 0.0);

        let mut progress = MockProgressRepo::new();
        progress
            .expect_list_in_progress_with_missions()
            .returning(move |_| Ok(vec![(row.clone(), mission.clone())]));
        progress.expect_update().returning(|_| Ok(()));

        let mut profiles = MockProfileRepo::new();
        profiles.expect_get().returning(|_| Ok(None));
        // No update_versioned, no publish.

        let use_case = ProcessEvent::new(
            Arc::new(progress),
            Arc::new(profiles),
            Arc::new(MockRealtimePort::new()),
            Arc::new(fixed_clock()),
        );
        use_case
            .execute(&DispatchRequest::new(user_id, EventKind::LoadCompleted))
            .await;
    }

    #[tokio::test]
    async fn version_conflicts_retry_and_then_drop() {
        let user_id = UserId::new(7);

        let mut progress = MockProgressRepo::new();
        progress
            .expect_list_in_progress_with_missions()
            .returning(|_| Ok(vec![]));

        let mut profiles = MockProfileRepo::new();
        profiles
            .expect_get()
            .times(XP_SETTLEMENT_ATTEMPTS)
            .returning(|id| Ok(Some(GamificationProfile::new(id))));
        profiles
            .expect_update_versioned()
            .times(XP_SETTLEMENT_ATTEMPTS)
            .returning(|_| Ok(false));

        let use_case = ProcessEvent::new(
            Arc::new(progress),
            Arc::new(profiles),
            Arc::new(MockRealtimePort::new()),
            Arc::new(fixed_clock()),
        );
        // Must not hang or panic.
        use_case
            .execute(&DispatchRequest::new(user_id, EventKind::LoadCompleted))
            .await;
    }

    #[tokio::test]
    async fn unknown_events_touch_nothing() {
        let progress = MockProgressRepo::new();
        let profiles = MockProfileRepo::new();
        // No expectations at all: any repo call would panic the test.

        let use_case = ProcessEvent::new(
            Arc::new(progress),
            Arc::new(profiles),
            Arc::new(MockRealtimePort::new()),
            Arc::new(fixed_clock()),
        );
        use_case
            .execute(&DispatchRequest::new(UserId::new(7), EventKind::Unknown))
            .await;
    }

    #[tokio::test]
    async fn repo_errors_are_contained() {
        let mut progress = MockProgressRepo::new();
        progress
            .expect_list_in_progress_with_missions()
            .returning(|_| Err(RepoError::database("progress.list", "connection refused")));

        let use_case = ProcessEvent::new(
            Arc::new(progress),
            Arc::new(MockProfileRepo::new()),
            Arc::new(MockRealtimePort::new()),
            Arc::new(fixed_clock()),
        );
        // Caller-facing contract: no panic, no error.
        use_case
            .execute(&DispatchRequest::new(UserId::new(7), EventKind::LoadCompleted))
            .await;
    }
}
