//! Application state and composition.

use std::sync::Arc;

use crate::dispatcher::{Dispatcher, DEFAULT_QUEUE_CAPACITY};
use crate::infrastructure::{
    clock::SystemClock,
    persistence::SqliteRepositories,
    ports::{ClockPort, MissionRepo, ProfileRepo, ProgressRepo, RealtimePort, UserDirectoryPort},
};
use crate::scheduler::{Scheduler, SchedulerConfig};
use crate::use_cases::{
    AssignMissions, EnforceCap, EnsureProfile, MaterializeMissions, ProcessEvent, PurgeUser,
    SystemSync, ACTIVE_MISSION_CAP,
};

/// Engine-wide tunables.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    pub active_mission_cap: usize,
    pub dispatch_queue_capacity: usize,
    pub scheduler: SchedulerConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            active_mission_cap: ACTIVE_MISSION_CAP,
            dispatch_queue_capacity: DEFAULT_QUEUE_CAPACITY,
            scheduler: SchedulerConfig::default(),
        }
    }
}

/// Container for the repository ports.
pub struct Repositories {
    pub mission: Arc<dyn MissionRepo>,
    pub progress: Arc<dyn ProgressRepo>,
    pub profile: Arc<dyn ProfileRepo>,
    pub users: Arc<dyn UserDirectoryPort>,
}

/// Container for the use cases.
pub struct UseCases {
    pub rotation: Arc<MaterializeMissions>,
    pub assignment: Arc<AssignMissions>,
    pub dispatch: Arc<ProcessEvent>,
    pub cap: Arc<EnforceCap>,
    pub sync: Arc<SystemSync>,
    pub cleanup: Arc<PurgeUser>,
    pub profiles: Arc<EnsureProfile>,
}

/// Main application state: all ports and use cases wired up. The host
/// embeds this and pulls a [`Dispatcher`] and [`Scheduler`] off it.
pub struct App {
    pub repositories: Repositories,
    pub use_cases: UseCases,
    config: EngineConfig,
}

impl App {
    /// Wire the engine over SQLite adapters and the system clock.
    pub fn new(
        repos: SqliteRepositories,
        realtime: Arc<dyn RealtimePort>,
        config: EngineConfig,
    ) -> Self {
        Self::with_ports(
            repos.mission,
            repos.progress,
            repos.profile,
            repos.users,
            realtime,
            Arc::new(SystemClock::new()),
            config,
        )
    }

    /// Wire the engine over arbitrary port implementations (tests inject
    /// mocks and manual clocks here).
    pub fn with_ports(
        mission: Arc<dyn MissionRepo>,
        progress: Arc<dyn ProgressRepo>,
        profile: Arc<dyn ProfileRepo>,
        users: Arc<dyn UserDirectoryPort>,
        realtime: Arc<dyn RealtimePort>,
        clock: Arc<dyn ClockPort>,
        config: EngineConfig,
    ) -> Self {
        let rotation = Arc::new(MaterializeMissions::new(mission.clone(), clock.clone()));
        let assignment = Arc::new(
            AssignMissions::new(
                mission.clone(),
                progress.clone(),
                users.clone(),
                clock.clone(),
            )
            .with_cap(config.active_mission_cap),
        );
        let dispatch = Arc::new(ProcessEvent::new(
            progress.clone(),
            profile.clone(),
            realtime,
            clock.clone(),
        ));
        let cap = Arc::new(
            EnforceCap::new(progress.clone()).with_cap(config.active_mission_cap),
        );
        let sync = Arc::new(SystemSync::new(
            progress.clone(),
            profile.clone(),
            users.clone(),
            cap.clone(),
            clock,
        ));
        let cleanup = Arc::new(PurgeUser::new(progress.clone(), profile.clone()));
        let profiles = Arc::new(EnsureProfile::new(profile.clone()));

        Self {
            repositories: Repositories {
                mission,
                progress,
                profile,
                users,
            },
            use_cases: UseCases {
                rotation,
                assignment,
                dispatch,
                cap,
                sync,
                cleanup,
                profiles,
            },
            config,
        }
    }

    /// Start a dispatch worker bound to this app's event processor.
    pub fn dispatcher(&self) -> Dispatcher {
        Dispatcher::spawn(
            self.use_cases.dispatch.clone(),
            self.config.dispatch_queue_capacity,
        )
    }

    /// Build the lifecycle scheduler (not yet started).
    pub fn scheduler(&self) -> Scheduler {
        Scheduler::new(
            self.use_cases.rotation.clone(),
            self.use_cases.assignment.clone(),
            self.use_cases.sync.clone(),
            self.config.scheduler.clone(),
        )
    }
}
