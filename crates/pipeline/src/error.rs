use std::time::Duration;

use artgen::GenerationError;
use collector::UpstreamError;
use db::DbError;
use thiserror::Error;

/// Everything a pipeline run can fail with, surfaced as one structured
/// failure at the orchestrator boundary.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("validation error: {0}")]
    Validation(String),
    #[error("a wrapped run for '{0}' is already in progress")]
    Busy(String),
    #[error("github upstream failure: {0}")]
    Upstream(#[from] UpstreamError),
    #[error("artifact generation failed for '{stat}': {source}")]
    Generation {
        stat: String,
        #[source]
        source: GenerationError,
    },
    #[error("persistence failure: {0}")]
    Persistence(#[from] DbError),
    #[error("pipeline run exceeded the {}s deadline", .0.as_secs())]
    Timeout(Duration),
}

impl PipelineError {
    /// Stable label for metrics and logs.
    pub fn reason(&self) -> &'static str {
        match self {
            PipelineError::Validation(_) => "validation",
            PipelineError::Busy(_) => "busy",
            PipelineError::Upstream(_) => "upstream",
            PipelineError::Generation { .. } => "generation",
            PipelineError::Persistence(_) => "persistence",
            PipelineError::Timeout(_) => "timeout",
        }
    }
}
