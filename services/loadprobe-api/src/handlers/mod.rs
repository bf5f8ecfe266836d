//! HTTP handlers for REST API endpoints

pub mod health;
pub mod metrics;
pub mod probe;

pub use health::{health_handler, HealthResponse};
pub use metrics::metrics_handler;
pub use probe::{probe_handler, ApiError, ErrorResponse};
