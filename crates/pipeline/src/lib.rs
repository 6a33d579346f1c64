pub mod error;
pub mod metrics;
pub mod orchestrator;

pub use error::PipelineError;
pub use orchestrator::{Pipeline, PipelineOutcome, WrappedBundle};
