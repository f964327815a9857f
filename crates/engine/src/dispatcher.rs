//! Fire-and-forget dispatch front end.
//!
//! Business code calls [`Dispatcher::dispatch`] and moves on: the event
//! lands on a bounded queue and a single worker drains it. A full queue
//! sheds the event (logged) instead of applying backpressure to the
//! caller, and the queue depth is exposed for observability.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use tokio::sync::mpsc::{self, error::TrySendError};

use crate::use_cases::{DispatchRequest, ProcessEvent};

pub const DEFAULT_QUEUE_CAPACITY: usize = 1024;

pub struct Dispatcher {
    tx: mpsc::Sender<DispatchRequest>,
    depth: Arc<AtomicUsize>,
    worker: tokio::task::JoinHandle<()>,
}

impl Dispatcher {
    /// Start the worker and hand back the dispatch handle.
    pub fn spawn(process: Arc<ProcessEvent>, queue_capacity: usize) -> Self {
        let (tx, mut rx) = mpsc::channel::<DispatchRequest>(queue_capacity.max(1));
        let depth = Arc::new(AtomicUsize::new(0));

        let worker_depth = depth.clone();
        let worker = tokio::spawn(async move {
            while let Some(request) = rx.recv().await {
                worker_depth.fetch_sub(1, Ordering::Relaxed);
                process.execute(&request).await;
            }
            tracing::debug!("dispatch worker drained and stopped");
        });

        Self { tx, depth, worker }
    }

    /// Enqueue an event. Never blocks and never fails the caller; a full
    /// or stopped queue drops the event after logging.
    pub fn dispatch(&self, request: DispatchRequest) {
        match self.tx.try_send(request) {
            Ok(()) => {
                self.depth.fetch_add(1, Ordering::Relaxed);
            }
            Err(TrySendError::Full(request)) => {
                tracing::warn!(
                    user_id = %request.user_id,
                    event = %request.event,
                    "dispatch queue full; event dropped"
                );
            }
            Err(TrySendError::Closed(request)) => {
                tracing::warn!(
                    user_id = %request.user_id,
                    event = %request.event,
                    "dispatcher stopped; event dropped"
                );
            }
        }
    }

    /// Events queued but not yet processed. Approximate under races,
    /// which is fine for a gauge.
    pub fn depth(&self) -> usize {
        self.depth.load(Ordering::Relaxed)
    }

    /// Stop accepting events and wait for the queue to drain.
    pub async fn shutdown(self) {
        drop(self.tx);
        if let Err(e) = self.worker.await {
            tracing::warn!(error = %e, "dispatch worker ended abnormally");
        }
    }
}
