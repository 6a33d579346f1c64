use once_cell::sync::Lazy;
use prometheus::{
    register_histogram_vec, register_int_counter, register_int_counter_vec, HistogramVec,
    IntCounter, IntCounterVec,
};

pub static FETCH_REQUESTS_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    register_int_counter_vec!(
        "collector_fetch_requests_total",
        "Total number of collector operations grouped by operation and outcome",
        &["op", "outcome"]
    )
    .expect("collector fetch requests total")
});

pub static FETCH_LATENCY_SECONDS: Lazy<HistogramVec> = Lazy::new(|| {
    register_histogram_vec!(
        "collector_fetch_latency_seconds",
        "Latency of collector operations grouped by operation",
        &["op"],
        vec![0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.0, 5.0, 10.0]
    )
    .expect("collector fetch latency seconds")
});

pub static REPO_PAGES_TOTAL: Lazy<IntCounter> = Lazy::new(|| {
    register_int_counter!(
        "collector_repo_pages_total",
        "Repository pages requested across all collections"
    )
    .expect("collector repo pages total")
});

pub static REPOS_COLLECTED_TOTAL: Lazy<IntCounter> = Lazy::new(|| {
    register_int_counter!(
        "collector_repositories_collected_total",
        "Repositories returned across all collections"
    )
    .expect("collector repositories collected total")
});

pub static PAGINATION_OVERFLOWS_TOTAL: Lazy<IntCounter> = Lazy::new(|| {
    register_int_counter!(
        "collector_pagination_overflows_total",
        "Repository collections aborted by the page-count safety ceiling"
    )
    .expect("collector pagination overflows total")
});
