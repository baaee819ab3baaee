//! The progress-reporting capability handed to a generation worker.

use std::sync::Mutex;

use crate::event::ProgressEvent;

/// Receives progress events from a worker.
///
/// `emit` is infallible from the worker's point of view: a sink that can
/// no longer deliver (peer gone, buffer closed) drops the event and logs.
/// No backpressure flows back to the producer.
pub trait ProgressSink: Send + Sync {
    fn emit(&self, event: ProgressEvent);
}

/// Writes every event to the `tracing` log. Used by headless runs.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl ProgressSink for TracingSink {
    fn emit(&self, event: ProgressEvent) {
        match event {
            ProgressEvent::Status { message } => tracing::info!("{message}"),
            ProgressEvent::Progress {
                image_id,
                image_type,
                success: true,
                ..
            } => tracing::info!(image_id, %image_type, "Image generated"),
            ProgressEvent::Progress {
                image_id,
                image_type,
                error,
                ..
            } => tracing::warn!(
                image_id,
                %image_type,
                error = error.as_deref().unwrap_or("Unknown error"),
                "Image failed",
            ),
            ProgressEvent::Complete { summary } => tracing::info!(
                headers = summary.headers_successful,
                headers_requested = summary.headers_requested,
                profiles = summary.profiles_successful,
                profiles_requested = summary.profiles_requested,
                success_rate = %summary.success_rate,
                "Generation complete",
            ),
            ProgressEvent::Error { message } => tracing::error!(error = %message, "Generation failed"),
        }
    }
}

/// Keeps every event in memory, in emission order.
#[derive(Debug, Default)]
pub struct MemorySink {
    events: Mutex<Vec<ProgressEvent>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of everything emitted so far.
    pub fn events(&self) -> Vec<ProgressEvent> {
        self.events
            .lock()
            .map(|events| events.clone())
            .unwrap_or_default()
    }
}

impl ProgressSink for MemorySink {
    fn emit(&self, event: ProgressEvent) {
        if let Ok(mut events) = self.events.lock() {
            events.push(event);
        }
    }
}
