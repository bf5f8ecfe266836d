//! Workload dispatcher and timer.
//!
//! Turns `(query, method)` into a [`ProbeResponse`]: parse parameters, time
//! the selected simulator, build the body. Blocking simulators run on the
//! tokio blocking pool so one slow request never stalls the others.

use crate::config::{Config, ProbeConfig};
use crate::error::ProbeResult;
use crate::metrics;
use crate::observer::{TracingObserver, WorkloadObserver};
use crate::params::{QueryParams, WorkloadKind, WorkloadRequest};
use crate::response::{ProbeResponse, ResponseBody};
use crate::workload::{cpu, delay, IoSimulator};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// Timing of one simulator call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WorkloadResult {
    pub elapsed: Duration,
    /// `elapsed` in milliseconds, rounded to two decimals
    pub duration_ms: f64,
}

impl WorkloadResult {
    fn from_elapsed(elapsed: Duration) -> Self {
        Self {
            elapsed,
            duration_ms: round_ms(elapsed),
        }
    }
}

fn round_ms(elapsed: Duration) -> f64 {
    (elapsed.as_secs_f64() * 1000.0 * 100.0).round() / 100.0
}

pub struct Dispatcher {
    message: String,
    runtime: String,
    io: IoSimulator,
}

impl Dispatcher {
    pub fn new(probe: &ProbeConfig, observer: Arc<dyn WorkloadObserver>) -> Self {
        let mut io = IoSimulator::new(observer);
        if let Some(dir) = &probe.temp_dir {
            io = io.with_dir(dir);
        }

        Self {
            message: probe.message.clone(),
            runtime: probe.runtime.clone(),
            io,
        }
    }

    /// Dispatcher with the default tracing observer.
    pub fn from_config(config: &Config) -> Self {
        Self::new(&config.probe, Arc::new(TracingObserver))
    }

    pub fn runtime(&self) -> &str {
        &self.runtime
    }

    /// Handles one request end to end.
    ///
    /// Parameter errors come back before any work starts; simulator errors
    /// come back after the timer stops. Both are for the host to map.
    pub async fn dispatch(&self, query: QueryParams, method: &str) -> ProbeResult<ProbeResponse> {
        let request = WorkloadRequest::from_query(&query)?;

        debug!(
            workload = %request.label,
            iterations = request.iterations,
            size_kb = request.size_kb,
            delay_ms = request.delay_ms,
            "Dispatching workload"
        );

        let outcome = self.execute(&request).await;
        let kind = request.workload.as_str();

        let result = match outcome {
            Ok(result) => {
                metrics::WORKLOAD_RUNS.with_label_values(&[kind, "ok"]).inc();
                metrics::WORKLOAD_DURATION
                    .with_label_values(&[kind])
                    .observe(result.elapsed.as_secs_f64());
                result
            }
            Err(e) => {
                metrics::WORKLOAD_RUNS.with_label_values(&[kind, "error"]).inc();
                warn!(workload = kind, error = %e, "Workload failed");
                return Err(e);
            }
        };

        info!(
            workload = %request.label,
            duration_ms = result.duration_ms,
            "Workload complete"
        );

        let body = ResponseBody::new(
            &self.message,
            &self.runtime,
            &request,
            result.duration_ms,
            query,
            method,
        );

        Ok(ProbeResponse::ok(body))
    }

    /// Runs the selected simulator (or nothing) between timer start and stop.
    ///
    /// A simulator whose size parameter is zero or negative is not invoked.
    pub async fn execute(&self, request: &WorkloadRequest) -> ProbeResult<WorkloadResult> {
        let start = Instant::now();

        match request.workload {
            WorkloadKind::Cpu if request.iterations > 0 => {
                let iterations = request.iterations as u64;
                tokio::task::spawn_blocking(move || cpu::run(iterations)).await?;
            }
            WorkloadKind::Io if request.size_kb > 0 => {
                let io = self.io.clone();
                let size_kb = request.size_kb as u64;
                tokio::task::spawn_blocking(move || io.run(size_kb)).await??;
            }
            WorkloadKind::Delay if request.delay_ms > 0 => {
                delay::run(request.delay_ms as u64).await;
            }
            _ => {}
        }

        Ok(WorkloadResult::from_elapsed(start.elapsed()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{ParamError, ProbeError};
    use std::io;
    use std::path::{Path, PathBuf};
    use std::sync::Mutex;
    use tempfile::TempDir;

    #[derive(Default)]
    struct RecordingObserver {
        failures: Mutex<Vec<PathBuf>>,
    }

    impl WorkloadObserver for RecordingObserver {
        fn cleanup_failed(&self, path: &Path, _error: &io::Error) {
            self.failures.lock().unwrap().push(path.to_path_buf());
        }
    }

    fn dispatcher_in(dir: &Path) -> Dispatcher {
        let probe = ProbeConfig {
            temp_dir: Some(dir.to_path_buf()),
            ..ProbeConfig::default()
        };
        Dispatcher::new(&probe, Arc::new(RecordingObserver::default()))
    }

    fn query(pairs: &[(&str, &str)]) -> QueryParams {
        pairs.iter().copied().collect()
    }

    #[test]
    fn test_round_ms() {
        assert_eq!(round_ms(Duration::from_micros(1234)), 1.23);
        assert_eq!(round_ms(Duration::from_micros(1236)), 1.24);
        assert_eq!(round_ms(Duration::from_millis(50)), 50.0);
        assert_eq!(round_ms(Duration::ZERO), 0.0);
    }

    #[tokio::test]
    async fn test_no_workload() {
        let dir = TempDir::new().unwrap();
        let dispatcher = dispatcher_in(dir.path());

        let response = dispatcher.dispatch(QueryParams::new(), "GET").await.unwrap();

        assert_eq!(response.status, 200);
        assert_eq!(response.body.workload, "none");
        assert!(response.body.duration_ms < 5.0);
        assert!(response.body.request_data.query.is_empty());
    }

    #[tokio::test]
    async fn test_cpu_workload() {
        let dir = TempDir::new().unwrap();
        let dispatcher = dispatcher_in(dir.path());

        let q = query(&[("workload", "cpu"), ("iterations", "1000")]);
        let response = dispatcher.dispatch(q.clone(), "POST").await.unwrap();

        assert_eq!(response.body.workload, "cpu");
        assert_eq!(response.body.iterations, 1000);
        assert!(response.body.duration_ms > 0.0);
        assert_eq!(response.body.request_data.query, q);
        assert_eq!(response.body.request_data.method, "POST");
    }

    #[tokio::test]
    async fn test_io_workload_cleans_up() {
        let dir = TempDir::new().unwrap();
        let dispatcher = dispatcher_in(dir.path());

        let q = query(&[("workload", "io"), ("sizeKb", "1")]);
        let response = dispatcher.dispatch(q, "GET").await.unwrap();

        assert_eq!(response.body.workload, "io");
        assert_eq!(response.body.size_kb, 1);
        assert!(response.body.duration_ms > 0.0);
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[tokio::test]
    async fn test_delay_workload() {
        let dir = TempDir::new().unwrap();
        let dispatcher = dispatcher_in(dir.path());

        let q = query(&[("workload", "delay"), ("delayMs", "50")]);
        let response = dispatcher.dispatch(q, "GET").await.unwrap();

        assert_eq!(response.body.workload, "delay");
        assert_eq!(response.body.delay_ms, 50);
        assert!(response.body.duration_ms >= 50.0);
    }

    #[tokio::test]
    async fn test_delay_without_duration_is_skipped() {
        let dir = TempDir::new().unwrap();
        let dispatcher = dispatcher_in(dir.path());

        let response = dispatcher
            .dispatch(query(&[("workload", "delay")]), "GET")
            .await
            .unwrap();

        assert_eq!(response.body.workload, "delay");
        assert_eq!(response.body.delay_ms, 0);
        assert!(response.body.duration_ms < 5.0);
    }

    #[tokio::test]
    async fn test_non_positive_sizes_run_nothing() {
        let dir = TempDir::new().unwrap();
        let dispatcher = dispatcher_in(dir.path());

        for pairs in [
            vec![("workload", "delay"), ("delayMs", "-5")],
            vec![("workload", "cpu"), ("iterations", "0")],
            vec![("workload", "io"), ("sizeKb", "0")],
            vec![("workload", "io"), ("sizeKb", "-3")],
            vec![("iterations", "0")],
        ] {
            let response = dispatcher.dispatch(query(&pairs), "GET").await.unwrap();
            assert_eq!(response.status, 200, "{pairs:?}");
            assert!(response.body.duration_ms < 5.0, "{pairs:?}");
        }

        let response = dispatcher
            .dispatch(query(&[("workload", "delay"), ("delayMs", "-5")]), "GET")
            .await
            .unwrap();
        assert_eq!(response.body.delay_ms, -5);
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);

        // sizeKb is not a cpu parameter
        let response = dispatcher
            .dispatch(
                query(&[("workload", "cpu"), ("iterations", "10"), ("sizeKb", "0")]),
                "GET",
            )
            .await
            .unwrap();
        assert_eq!(response.status, 200);
        assert_eq!(response.body.size_kb, 0);
    }

    #[tokio::test]
    async fn test_unknown_workload_runs_nothing() {
        let dir = TempDir::new().unwrap();
        let dispatcher = dispatcher_in(dir.path());

        let q = query(&[("workload", "Quantum"), ("delayMs", "5000")]);
        let response = dispatcher.dispatch(q, "GET").await.unwrap();

        assert_eq!(response.body.workload, "quantum");
        assert!(response.body.duration_ms < 1000.0);
    }

    #[tokio::test]
    async fn test_invalid_param_is_client_error() {
        let dir = TempDir::new().unwrap();
        let dispatcher = dispatcher_in(dir.path());

        let err = dispatcher
            .dispatch(query(&[("workload", "cpu"), ("iterations", "lots")]), "GET")
            .await
            .unwrap_err();

        assert!(err.is_client_error());
        assert!(matches!(
            err,
            ProbeError::InvalidParam(ParamError::Malformed {
                name: "iterations",
                ..
            })
        ));
    }

    #[tokio::test]
    async fn test_io_failure_propagates() {
        let dir = TempDir::new().unwrap();
        let dispatcher = dispatcher_in(&dir.path().join("missing"));

        let err = dispatcher
            .dispatch(query(&[("workload", "io"), ("sizeKb", "1")]), "GET")
            .await
            .unwrap_err();

        assert!(!err.is_client_error());
        assert!(matches!(err, ProbeError::Io { .. }));
    }

    #[tokio::test]
    async fn test_runtime_label_flows_to_headers() {
        let probe = ProbeConfig {
            runtime: "python".to_string(),
            message: "Python example function".to_string(),
            temp_dir: None,
        };
        let dispatcher = Dispatcher::new(&probe, Arc::new(TracingObserver));

        let response = dispatcher.dispatch(QueryParams::new(), "GET").await.unwrap();

        assert_eq!(dispatcher.runtime(), "python");
        assert_eq!(response.body.message, "Python example function");
        assert_eq!(response.header("x-runtime"), Some("python"));
    }
}
