//! HaulQuest Engine - main entry point.

use std::sync::Arc;
use std::time::Duration;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use haulquest_engine::infrastructure::persistence::SqliteRepositories;
use haulquest_engine::infrastructure::realtime::BroadcastRealtime;
use haulquest_engine::scheduler::SchedulerConfig;
use haulquest_engine::{App, EngineConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "haulquest_engine=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(
        catalog_version = haulquest_domain::CATALOG_VERSION,
        "Starting HaulQuest engine"
    );

    // Load configuration
    let db_path = std::env::var("HAULQUEST_DB").unwrap_or_else(|_| "haulquest.db".into());
    let queue_capacity: usize = std::env::var("DISPATCH_QUEUE_CAPACITY")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(haulquest_engine::dispatcher::DEFAULT_QUEUE_CAPACITY);
    let interval_secs: u64 = std::env::var("SCHEDULER_INTERVAL_SECS")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(6 * 60 * 60);
    let scheduler_enabled = std::env::var("SCHEDULER_ENABLED")
        .map(|v| !matches!(v.to_lowercase().as_str(), "0" | "false" | "off"))
        .unwrap_or(true);

    tracing::info!(db_path = %db_path, "connecting to mission store");
    let repos = SqliteRepositories::connect(&db_path).await?;

    let realtime = Arc::new(BroadcastRealtime::new(256));
    let config = EngineConfig {
        dispatch_queue_capacity: queue_capacity,
        scheduler: SchedulerConfig {
            interval: Duration::from_secs(interval_secs),
            ..SchedulerConfig::default()
        },
        ..EngineConfig::default()
    };

    let app = App::new(repos, realtime.clone(), config);
    let dispatcher = app.dispatcher();
    let mut scheduler = app.scheduler();

    if scheduler_enabled {
        scheduler.start();
    } else {
        // Non-primary replicas leave the lifecycle jobs to the primary.
        tracing::info!("scheduler disabled on this replica");
    }

    // Until the host bridges the hub to its own transport, surface
    // completion signals in the log.
    let mut signals = realtime.subscribe();
    tokio::spawn(async move {
        while let Ok(event) = signals.recv().await {
            tracing::info!(topic = %event.topic, payload = %event.payload, "realtime signal");
        }
    });

    tokio::signal::ctrl_c().await?;
    tracing::info!("shutting down");

    scheduler.stop().await;
    dispatcher.shutdown().await;
    Ok(())
}
