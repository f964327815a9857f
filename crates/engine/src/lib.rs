//! HaulQuest Engine library.
//!
//! Async services around the `haulquest-domain` core:
//!
//! - `infrastructure/` - port traits plus SQLite, clock, and realtime
//!   adapters
//! - `use_cases/` - rotation, assignment, dispatch, cap, sync, cleanup
//! - `dispatcher` - bounded fire-and-forget queue in front of dispatch
//! - `scheduler` - start/stop lifecycle timers
//! - `app` - application composition

pub mod app;
pub mod dispatcher;
pub mod infrastructure;
pub mod scheduler;
pub mod use_cases;

/// End-to-end tests against in-memory SQLite.
#[cfg(test)]
mod e2e_tests;

pub use app::{App, EngineConfig};
pub use dispatcher::Dispatcher;
pub use scheduler::{Scheduler, SchedulerConfig};
pub use use_cases::DispatchRequest;
