//! Lifecycle scheduler.
//!
//! An explicit object owning its timers and their shutdown, instead of
//! ambient module-level interval handles: the host starts it on the
//! primary replica and stops it for clean shutdown or in tests.
//!
//! Two loops on the same 6-hour interval, offset by different initial
//! delays: regeneration (rotation + assignment) and the system sync
//! sweep. Both jobs are idempotent, so a missed or duplicated firing
//! self-corrects on the next pass.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::use_cases::{AssignMissions, MaterializeMissions, SystemSync};

#[derive(Debug, Clone)]
pub struct SchedulerConfig {
    /// Warm-up before the first regeneration pass.
    pub regeneration_delay: Duration,
    /// Warm-up before the first sync pass; distinct from regeneration's
    /// so the two jobs never fire together at boot.
    pub sync_delay: Duration,
    /// Cadence of both loops after their first pass.
    pub interval: Duration,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            regeneration_delay: Duration::from_secs(10),
            sync_delay: Duration::from_secs(45),
            interval: Duration::from_secs(6 * 60 * 60),
        }
    }
}

pub struct Scheduler {
    rotation: Arc<MaterializeMissions>,
    assignment: Arc<AssignMissions>,
    sync: Arc<SystemSync>,
    config: SchedulerConfig,
    cancel: CancellationToken,
    handles: Vec<JoinHandle<()>>,
}

impl Scheduler {
    pub fn new(
        rotation: Arc<MaterializeMissions>,
        assignment: Arc<AssignMissions>,
        sync: Arc<SystemSync>,
        config: SchedulerConfig,
    ) -> Self {
        Self {
            rotation,
            assignment,
            sync,
            config,
            cancel: CancellationToken::new(),
            handles: Vec::new(),
        }
    }

    /// Spawn both loops. A second call while running is a no-op.
    pub fn start(&mut self) {
        if !self.handles.is_empty() {
            return;
        }

        let rotation = self.rotation.clone();
        let assignment = self.assignment.clone();
        self.handles.push(tokio::spawn(run_periodic(
            self.config.regeneration_delay,
            self.config.interval,
            self.cancel.clone(),
            move || {
                let rotation = rotation.clone();
                let assignment = assignment.clone();
                async move {
                    match rotation.materialize_week().await {
                        Ok(inserted) => {
                            tracing::info!(inserted, "weekly rotation pass finished")
                        }
                        Err(e) => tracing::warn!(error = %e, "weekly rotation pass skipped"),
                    }
                    match rotation.materialize_day().await {
                        Ok(inserted) => {
                            tracing::info!(inserted, "daily rotation pass finished")
                        }
                        Err(e) => tracing::warn!(error = %e, "daily rotation pass skipped"),
                    }
                    match assignment.execute_all().await {
                        Ok(assigned) => {
                            tracing::info!(assigned, "assignment pass finished")
                        }
                        Err(e) => tracing::warn!(error = %e, "assignment pass skipped"),
                    }
                }
            },
        )));

        let sync = self.sync.clone();
        self.handles.push(tokio::spawn(run_periodic(
            self.config.sync_delay,
            self.config.interval,
            self.cancel.clone(),
            move || {
                let sync = sync.clone();
                async move {
                    sync.execute().await;
                    tracing::info!("system sync pass finished");
                }
            },
        )));

        tracing::info!("lifecycle scheduler started");
    }

    /// Cancel both loops and wait for them to wind down.
    pub async fn stop(&mut self) {
        if self.handles.is_empty() {
            return;
        }
        self.cancel.cancel();
        for handle in self.handles.drain(..) {
            if let Err(e) = handle.await {
                tracing::warn!(error = %e, "scheduler loop ended abnormally");
            }
        }
        tracing::info!("lifecycle scheduler stopped");
    }
}

async fn run_periodic<F, Fut>(
    initial_delay: Duration,
    interval: Duration,
    cancel: CancellationToken,
    mut job: F,
) where
    F: FnMut() -> Fut,
    Fut: Future<Output = ()>,
{
    tokio::select! {
        _ = cancel.cancelled() => return,
        _ = tokio::time::sleep(initial_delay) => {}
    }
    loop {
        job().await;
        tokio::select! {
            _ = cancel.cancelled() => return,
            _ = tokio::time::sleep(interval) => {}
        }
    }
}
