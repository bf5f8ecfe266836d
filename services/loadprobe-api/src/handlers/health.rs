//! Liveness endpoint.
//!
//! The probe holds no external dependencies, so alive means ready.

use crate::state::AppState;
use axum::{extract::State, response::IntoResponse, Json};
use serde::Serialize;
use tracing::debug;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub runtime: String,
}

pub async fn health_handler(State(state): State<AppState>) -> impl IntoResponse {
    debug!("Health check requested");

    Json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
        runtime: state.dispatcher.runtime().to_string(),
    })
}
