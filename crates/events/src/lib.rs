//! Progress events and their delivery to a single HTTP stream.
//!
//! - [`ProgressEvent`]: the tagged union a generation run emits.
//! - [`ProgressSink`]: the capability a worker is handed to report progress.
//! - [`ProgressChannel`] / [`ProgressStream`]: ordered single-writer,
//!   single-reader conduit that frames events as Server-Sent Events.
//! - [`TracingSink`] / [`MemorySink`]: sinks for headless runs and tests.

pub mod channel;
pub mod event;
pub mod sink;
pub mod sse;

pub use channel::{ProgressChannel, ProgressStream};
pub use event::{CompletionSummary, ProgressEvent};
pub use sink::{MemorySink, ProgressSink, TracingSink};
