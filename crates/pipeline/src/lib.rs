//! Batch generation pipeline.
//!
//! [`GenerationWorker`] drives one run: it walks the plan category by
//! category in fixed-size batches, calls the image provider one prompt at
//! a time with fixed pauses in between, saves each image, snapshots
//! progress after every batch and writes a final report. Progress is
//! reported through an injected [`ProgressSink`](xgen_events::ProgressSink).

pub mod config;
pub mod error;
pub mod report;
pub mod worker;

pub use config::{OutputDirs, PacingConfig};
pub use error::PipelineError;
pub use worker::{GenerationWorker, ImageCounts};
