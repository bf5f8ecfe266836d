//! API state management

use loadprobe_core::{Config, Dispatcher};
use std::sync::Arc;

/// Shared application state for the API server
#[derive(Clone)]
pub struct AppState {
    /// Workload dispatcher shared by all requests
    pub dispatcher: Arc<Dispatcher>,
}

impl AppState {
    pub fn new(dispatcher: Dispatcher) -> Self {
        Self {
            dispatcher: Arc::new(dispatcher),
        }
    }

    /// State with the default tracing observer.
    pub fn from_config(config: &Config) -> Self {
        Self::new(Dispatcher::from_config(config))
    }
}
