//! Probe endpoint: the host side of the dispatcher.

use crate::state::AppState;
use axum::{
    body::Body,
    extract::{Query, State},
    http::{Method, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use loadprobe_core::{ProbeError, ProbeResponse, QueryParams};
use serde::Serialize;
use tracing::{debug, error};

/// Error response
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// API error types
#[derive(Debug)]
pub enum ApiError {
    Validation(String),
    Internal(String),
}

impl From<ProbeError> for ApiError {
    fn from(err: ProbeError) -> Self {
        if err.is_client_error() {
            ApiError::Validation(err.to_string())
        } else {
            ApiError::Internal(err.to_string())
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::Validation(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::Internal(msg) => {
                error!("Internal error: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, msg)
            }
        };

        (status, Json(ErrorResponse { error: message })).into_response()
    }
}

/// Runs the requested workload and reports its timing.
///
/// Accepts any method; the method and every query pair are echoed back.
pub async fn probe_handler(
    State(state): State<AppState>,
    method: Method,
    Query(pairs): Query<Vec<(String, String)>>,
) -> Result<Response, ApiError> {
    let query: QueryParams = pairs.into_iter().collect();
    debug!(method = %method, params = query.len(), "Probe request");

    let response = state.dispatcher.dispatch(query, method.as_str()).await?;

    render(response)
}

fn render(response: ProbeResponse) -> Result<Response, ApiError> {
    let body = response
        .body_json()
        .map_err(|e| ApiError::Internal(format!("Failed to encode response: {}", e)))?;

    let status = StatusCode::from_u16(response.status)
        .map_err(|e| ApiError::Internal(format!("Invalid status code: {}", e)))?;

    let mut builder = Response::builder().status(status);
    for (name, value) in &response.headers {
        builder = builder.header(*name, value.as_str());
    }

    builder
        .body(Body::from(body))
        .map_err(|e| ApiError::Internal(format!("Failed to build response: {}", e)))
}
