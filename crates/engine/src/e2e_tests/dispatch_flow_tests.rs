//! Dispatch flows end to end against a real store.

use haulquest_domain::{EventKind, Role, UserId};

use super::harness::{wednesday, TestHarness};
use crate::infrastructure::ports::ProfileRepo;
use crate::use_cases::DispatchRequest;

#[tokio::test]
async fn three_loads_complete_the_mission_and_settle_xp_once() {
    let harness = TestHarness::new().await;
    harness.seed_account(7, Role::Driver, true).await;
    harness
        .app
        .use_cases
        .profiles
        .execute(UserId::new(7))
        .await
        .expect("profile");

    let mission = harness.insert_delivery_mission("wk_23_driver_0", 3.0, 250).await;
    harness.assign(7, &mission, wednesday()).await;

    let mut signals = harness.realtime.subscribe();
    let dispatch = &harness.app.use_cases.dispatch;
    let request = DispatchRequest::new(UserId::new(7), EventKind::LoadCompleted);

    dispatch.execute(&request).await;
    dispatch.execute(&request).await;
    let (status, current) = harness.progress_state(7, &mission).await;
    assert_eq!(status, "in_progress");
    assert_eq!(current, 2.0);

    dispatch.execute(&request).await;
    let (status, current) = harness.progress_state(7, &mission).await;
    assert_eq!(status, "completed");
    assert_eq!(current, 3.0);

    let profile = harness
        .app
        .repositories
        .profile
        .get(UserId::new(7))
        .await
        .expect("get")
        .expect("profile exists");
    assert_eq!(profile.total_xp(), 250);
    assert_eq!(profile.current_xp(), 250);
    assert_eq!(profile.level(), 1);
    assert_eq!(profile.stats().missions_completed, 1);

    // Exactly one completion signal.
    let event = signals.try_recv().expect("one signal");
    assert_eq!(event.topic, "gamification");
    assert_eq!(event.payload["userId"], 7);
    assert_eq!(event.payload["xpEarned"], 250);
    assert_eq!(event.payload["newLevel"], 1);
    assert!(signals.try_recv().is_err(), "no duplicate signal");

    // A fourth event must not re-award the terminal mission.
    dispatch.execute(&request).await;
    let profile = harness
        .app
        .repositories
        .profile
        .get(UserId::new(7))
        .await
        .expect("get")
        .expect("profile exists");
    assert_eq!(profile.total_xp(), 250);
    assert!(signals.try_recv().is_err());
}

#[tokio::test]
async fn progress_never_exceeds_target() {
    let harness = TestHarness::new().await;
    harness.seed_account(7, Role::Driver, true).await;
    harness
        .app
        .use_cases
        .profiles
        .execute(UserId::new(7))
        .await
        .expect("profile");

    let mission = harness.insert_delivery_mission("wk_23_driver_0", 3.0, 100).await;
    harness.assign(7, &mission, wednesday()).await;

    let request =
        DispatchRequest::new(UserId::new(7), EventKind::LoadCompleted).with_value(50.0);
    harness.app.use_cases.dispatch.execute(&request).await;

    let (status, current) = harness.progress_state(7, &mission).await;
    assert_eq!(status, "completed");
    assert_eq!(current, 3.0, "progress clamps at the target");
}

#[tokio::test]
async fn non_matching_events_leave_the_mission_alone() {
    let harness = TestHarness::new().await;
    harness.seed_account(7, Role::Driver, true).await;
    harness
        .app
        .use_cases
        .profiles
        .execute(UserId::new(7))
        .await
        .expect("profile");

    let mission = harness.insert_delivery_mission("wk_23_driver_0", 3.0, 100).await;
    harness.assign(7, &mission, wednesday()).await;

    // Social/count event against a deliveries/count mission: no movement.
    harness
        .app
        .use_cases
        .dispatch
        .execute(&DispatchRequest::new(UserId::new(7), EventKind::MessageSent))
        .await;

    let (status, current) = harness.progress_state(7, &mission).await;
    assert_eq!(status, "in_progress");
    assert_eq!(current, 0.0);
}

#[tokio::test]
async fn xp_dropped_without_profile_until_backfill_repairs_it() {
    let harness = TestHarness::new().await;
    harness.seed_account(7, Role::Driver, true).await;
    // No profile yet.

    let first = harness.insert_delivery_mission("wk_23_driver_0", 1.0, 250).await;
    let second = harness.insert_delivery_mission("wk_23_driver_1", 2.0, 100).await;
    harness.assign(7, &first, wednesday()).await;
    harness.assign(7, &second, wednesday()).await;

    let request = DispatchRequest::new(UserId::new(7), EventKind::LoadCompleted);
    harness.app.use_cases.dispatch.execute(&request).await;

    // Mission completed, but there was nowhere to settle the XP.
    let (status, _) = harness.progress_state(7, &first).await;
    assert_eq!(status, "completed");
    assert_eq!(harness.count_rows("gamification_profiles").await, 0);

    // The sync sweep backfills the profile...
    harness.app.use_cases.sync.execute().await;
    assert_eq!(harness.count_rows("gamification_profiles").await, 1);

    // ...and the next completion settles normally. The earlier 250 XP
    // stays dropped by design.
    harness.app.use_cases.dispatch.execute(&request).await;
    let profile = harness
        .app
        .repositories
        .profile
        .get(UserId::new(7))
        .await
        .expect("get")
        .expect("profile");
    assert_eq!(profile.total_xp(), 100);
}

#[tokio::test]
async fn dispatch_through_the_queue_is_fire_and_forget() {
    let harness = TestHarness::new().await;
    harness.seed_account(7, Role::Driver, true).await;
    harness
        .app
        .use_cases
        .profiles
        .execute(UserId::new(7))
        .await
        .expect("profile");

    let mission = harness.insert_delivery_mission("wk_23_driver_0", 1.0, 50).await;
    harness.assign(7, &mission, wednesday()).await;

    let dispatcher = harness.app.dispatcher();
    dispatcher.dispatch(DispatchRequest::new(UserId::new(7), EventKind::LoadCompleted));
    // Shutdown drains the queue before returning.
    dispatcher.shutdown().await;

    let (status, _) = harness.progress_state(7, &mission).await;
    assert_eq!(status, "completed");
}

#[tokio::test]
async fn streak_grows_across_consecutive_days() {
    let harness = TestHarness::new().await;
    harness.seed_account(7, Role::Driver, true).await;
    harness
        .app
        .use_cases
        .profiles
        .execute(UserId::new(7))
        .await
        .expect("profile");

    let request = DispatchRequest::new(UserId::new(7), EventKind::MessageSent);
    harness.app.use_cases.dispatch.execute(&request).await;
    harness.clock.set(wednesday() + chrono::Duration::days(1));
    harness.app.use_cases.dispatch.execute(&request).await;
    harness.clock.set(wednesday() + chrono::Duration::days(2));
    harness.app.use_cases.dispatch.execute(&request).await;

    let profile = harness
        .app
        .repositories
        .profile
        .get(UserId::new(7))
        .await
        .expect("get")
        .expect("profile");
    assert_eq!(profile.streak_days(), 3);
    assert_eq!(profile.longest_streak(), 3);
}
