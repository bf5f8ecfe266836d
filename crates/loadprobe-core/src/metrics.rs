//! Central metrics registry and metric definitions
//!
//! Metrics are registered lazily in the default Prometheus registry on
//! first access using once_cell::Lazy.

use once_cell::sync::Lazy;
use prometheus::{
    register_histogram_vec, register_int_counter, register_int_counter_vec, HistogramVec,
    IntCounter, IntCounterVec,
};

// ===== API Request Metrics =====

/// Total number of API requests by method, endpoint, and status code
pub static API_REQUEST_COUNT: Lazy<IntCounterVec> = Lazy::new(|| {
    register_int_counter_vec!(
        "loadprobe_api_requests_total",
        "Total number of API requests",
        &["method", "endpoint", "status"]
    )
    .expect("Failed to register API request counter")
});

/// API request duration histogram
pub static API_REQUEST_DURATION: Lazy<HistogramVec> = Lazy::new(|| {
    register_histogram_vec!(
        "loadprobe_api_request_duration_seconds",
        "API request duration in seconds",
        &["method", "endpoint"],
        vec![0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0, 30.0]
    )
    .expect("Failed to register API request duration histogram")
});

// ===== Workload Metrics =====

/// Workload dispatches by kind and outcome (ok/error)
pub static WORKLOAD_RUNS: Lazy<IntCounterVec> = Lazy::new(|| {
    register_int_counter_vec!(
        "loadprobe_workload_runs_total",
        "Total number of workload dispatches",
        &["workload", "outcome"]
    )
    .expect("Failed to register workload runs counter")
});

/// Timed section of each dispatch, i.e. the value reported as durationMs
pub static WORKLOAD_DURATION: Lazy<HistogramVec> = Lazy::new(|| {
    register_histogram_vec!(
        "loadprobe_workload_duration_seconds",
        "Simulated workload duration in seconds",
        &["workload"],
        vec![0.0001, 0.001, 0.005, 0.01, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0, 60.0]
    )
    .expect("Failed to register workload duration histogram")
});

/// Temp files the I/O workload failed to delete
pub static TEMP_CLEANUP_FAILURES: Lazy<IntCounter> = Lazy::new(|| {
    register_int_counter!(
        "loadprobe_temp_cleanup_failures_total",
        "Number of I/O workload temp files that could not be removed"
    )
    .expect("Failed to register temp cleanup failure counter")
});
