//! Side-channel events raised by the simulators.
//!
//! Simulators never log directly; they report to a [`WorkloadObserver`]
//! handed to them at construction.

use crate::metrics;
use std::io;
use std::path::Path;
use tracing::warn;

pub trait WorkloadObserver: Send + Sync {
    /// A transient file could not be removed. The workload itself succeeded.
    fn cleanup_failed(&self, path: &Path, error: &io::Error);
}

/// Default observer: `warn!` plus the cleanup failure counter.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingObserver;

impl WorkloadObserver for TracingObserver {
    fn cleanup_failed(&self, path: &Path, error: &io::Error) {
        metrics::TEMP_CLEANUP_FAILURES.inc();
        warn!(path = %path.display(), error = %error, "Temp file cleanup failed");
    }
}
