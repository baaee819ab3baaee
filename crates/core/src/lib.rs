//! Domain types for the placeholder-graphics batch generator.
//!
//! Everything in here is synchronous and I/O free: image categories,
//! run requests and plans, per-image results, the run statistics
//! accumulator, report documents and the prompt sources that feed a run.

pub mod category;
pub mod error;
pub mod naming;
pub mod prompts;
pub mod report;
pub mod request;
pub mod stats;
pub mod types;

pub use category::ImageCategory;
pub use error::CoreError;
pub use request::{GenerationPlan, GenerationRequest, GenerationResult};
pub use stats::{ErrorRecord, RunStatistics};
