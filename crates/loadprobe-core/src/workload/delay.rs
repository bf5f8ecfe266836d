use std::time::Duration;

/// Suspends the current task for `delay_ms` milliseconds.
///
/// Uses the tokio timer, so the worker thread stays free for other requests.
pub async fn run(delay_ms: u64) {
    tokio::time::sleep(Duration::from_millis(delay_ms)).await;
}
