//! Metrics middleware for tracking API requests
//!
//! Records request count and duration for every HTTP request.

use axum::{
    body::Body,
    extract::MatchedPath,
    http::{Request, Response},
    middleware::Next,
};
use loadprobe_core::metrics;
use std::time::Instant;

/// Middleware to track API request metrics
///
/// Labels by method, matched route (not raw URI, to keep cardinality bounded)
/// and status code.
pub async fn track_metrics(req: Request<Body>, next: Next) -> Response<Body> {
    let start = Instant::now();
    let method = req.method().clone();

    let path = req
        .extensions()
        .get::<MatchedPath>()
        .map(|p| p.as_str().to_owned())
        .unwrap_or_else(|| "unknown".to_string());

    let response = next.run(req).await;

    let duration = start.elapsed();
    let status = response.status().as_u16().to_string();

    metrics::API_REQUEST_COUNT
        .with_label_values(&[method.as_str(), &path, &status])
        .inc();

    metrics::API_REQUEST_DURATION
        .with_label_values(&[method.as_str(), &path])
        .observe(duration.as_secs_f64());

    response
}
