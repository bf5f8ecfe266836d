//! Core workload simulation and timing for the loadprobe diagnostic endpoint.
//!
//! Host-agnostic: [`Dispatcher::dispatch`] takes query parameters and a method
//! string and returns a [`ProbeResponse`]. Transport lives in `loadprobe-api`.

pub mod config;
pub mod dispatcher;
pub mod error;
pub mod metrics;
pub mod observer;
pub mod params;
pub mod response;
pub mod workload;

pub use config::{Config, ConfigError, LoggingConfig, ProbeConfig, ServerConfig};
pub use dispatcher::{Dispatcher, WorkloadResult};
pub use error::{ParamError, ProbeError, ProbeResult};
pub use observer::{TracingObserver, WorkloadObserver};
pub use params::{QueryParams, WorkloadKind, WorkloadRequest};
pub use response::{ProbeResponse, RequestData, ResponseBody};
pub use workload::IoSimulator;
