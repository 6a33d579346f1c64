use once_cell::sync::Lazy;
use prometheus::{
    register_histogram_vec, register_int_counter, register_int_counter_vec, HistogramVec,
    IntCounter, IntCounterVec,
};

pub static STEP_REQUESTS_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    register_int_counter_vec!(
        "artgen_step_requests_total",
        "Artifact generation steps grouped by step (prompt/image/quote) and outcome",
        &["step", "outcome"]
    )
    .expect("artgen step requests total")
});

pub static STEP_LATENCY_SECONDS: Lazy<HistogramVec> = Lazy::new(|| {
    register_histogram_vec!(
        "artgen_step_latency_seconds",
        "Latency of artifact generation steps grouped by step",
        &["step"],
        vec![0.25, 0.5, 1.0, 2.0, 5.0, 10.0, 30.0, 60.0]
    )
    .expect("artgen step latency seconds")
});

pub static FALLBACK_COMPLETIONS_TOTAL: Lazy<IntCounter> = Lazy::new(|| {
    register_int_counter!(
        "artgen_fallback_completions_total",
        "Completions that succeeded only on the fallback model tier"
    )
    .expect("artgen fallback completions total")
});
