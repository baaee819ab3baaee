//! Bookkeeping for generation runs spawned by `/generate`.
//!
//! The handler hands a run to the registry and returns immediately; the
//! registry owns the task handle and cancellation token until the run ends
//! on its own or the server shuts down.

use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use crate::error::AppError;

struct RunEntry {
    cancel: CancellationToken,
    handle: Option<JoinHandle<()>>,
}

/// Live runs keyed by run id. Cheap to clone.
#[derive(Clone, Default)]
pub struct RunRegistry {
    runs: Arc<Mutex<HashMap<Uuid, RunEntry>>>,
}

impl RunRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Spawn the future built by `run` as a new tracked task.
    ///
    /// Fails with [`AppError::Conflict`] when another run is live and
    /// `allow_concurrent` is false. The run's entry is removed when the
    /// [`RunTicket`] handed to `run` is finished or dropped, so a run can
    /// free its slot before it closes its event stream.
    pub fn start<F, Fut>(
        &self,
        allow_concurrent: bool,
        cancel: CancellationToken,
        run: F,
    ) -> Result<Uuid, AppError>
    where
        F: FnOnce(RunTicket) -> Fut,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let id = Uuid::new_v4();
        {
            let mut runs = self.lock();
            if !allow_concurrent && !runs.is_empty() {
                return Err(AppError::Conflict(
                    "A generation run is already in progress".into(),
                ));
            }
            runs.insert(
                id,
                RunEntry {
                    cancel,
                    handle: None,
                },
            );
        }

        let future = run(RunTicket {
            registry: self.clone(),
            id,
        });

        // Spawned under the lock, so the entry is still present here unless
        // `run` gave its ticket back without awaiting anything.
        let mut runs = self.lock();
        let handle = tokio::spawn(future);
        if let Some(entry) = runs.get_mut(&id) {
            entry.handle = Some(handle);
        }

        tracing::info!(run_id = %id, active_runs = runs.len(), "Generation run started");
        Ok(id)
    }

    pub fn active_runs(&self) -> usize {
        self.lock().len()
    }

    /// Ask every live run to stop at its next pause.
    pub fn cancel_all(&self) {
        for entry in self.lock().values() {
            entry.cancel.cancel();
        }
    }

    /// Cancel every live run and wait up to `timeout` for them to stop.
    pub async fn shutdown(&self, timeout: Duration) {
        self.cancel_all();
        let handles: Vec<JoinHandle<()>> = self
            .lock()
            .values_mut()
            .filter_map(|entry| entry.handle.take())
            .collect();

        if handles.is_empty() {
            return;
        }
        tracing::info!(count = handles.len(), "Cancelling in-flight generation runs");

        let drained = tokio::time::timeout(timeout, join_all(handles)).await;
        if drained.is_err() {
            tracing::warn!(
                timeout_secs = timeout.as_secs(),
                "Generation runs did not stop before the shutdown timeout"
            );
        }
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<Uuid, RunEntry>> {
        // A panic while holding the lock leaves the map itself consistent.
        self.runs.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

/// Slot held by a live run; releasing it removes the run from the registry.
pub struct RunTicket {
    registry: RunRegistry,
    id: Uuid,
}

impl RunTicket {
    pub fn finish(self) {}
}

impl Drop for RunTicket {
    fn drop(&mut self) {
        self.registry.lock().remove(&self.id);
        tracing::debug!(run_id = %self.id, "Generation run released");
    }
}

async fn join_all(handles: Vec<JoinHandle<()>>) {
    for handle in handles {
        if let Err(e) = handle.await {
            tracing::warn!(error = %e, "Generation run task failed");
        }
    }
}
