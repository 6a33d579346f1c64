use once_cell::sync::Lazy;
use prometheus::{
    register_histogram_vec, register_int_counter, register_int_counter_vec, HistogramVec,
    IntCounter, IntCounterVec,
};

pub static RUNS_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    register_int_counter_vec!(
        "pipeline_runs_total",
        "Pipeline runs grouped by terminal state (cache_hit/completed/<failure reason>)",
        &["outcome"]
    )
    .expect("pipeline runs total")
});

pub static STAGE_DURATION_SECONDS: Lazy<HistogramVec> = Lazy::new(|| {
    register_histogram_vec!(
        "pipeline_stage_duration_seconds",
        "Duration of pipeline stages grouped by stage (collect/derive/generate)",
        &["stage"],
        vec![0.1, 0.5, 1.0, 5.0, 15.0, 30.0, 60.0, 120.0, 300.0]
    )
    .expect("pipeline stage duration seconds")
});

pub static ARTIFACTS_GENERATED_TOTAL: Lazy<IntCounter> = Lazy::new(|| {
    register_int_counter!(
        "pipeline_artifacts_generated_total",
        "Stat-card artifacts generated and persisted"
    )
    .expect("pipeline artifacts generated total")
});
