use crate::{
    handlers::{health_handler, metrics_handler, probe_handler},
    middleware::track_metrics,
    state::AppState,
};
use axum::{
    extract::Request,
    middleware,
    response::Response,
    routing::{any, get},
    Router,
};
use std::time::Duration;
use tower_http::trace::TraceLayer;
use tracing::{info, info_span, Span};
use uuid::Uuid;

/// Builds the router with the probe mounted at `probe_route`.
pub fn build_router(state: AppState, probe_route: &str) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/metrics", get(metrics_handler))
        // Every method is accepted and echoed back
        .route(probe_route, any(probe_handler))
        .with_state(state)
        // route_layer so MatchedPath is available for labels
        .route_layer(middleware::from_fn(track_metrics))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(request_span)
                .on_response(log_response),
        )
}

/// The query string is left out; it is echoed in the body already.
fn request_span(request: &Request) -> Span {
    info_span!(
        "request",
        id = %Uuid::new_v4(),
        method = %request.method(),
        path = request.uri().path(),
    )
}

fn log_response(response: &Response, latency: Duration, _span: &Span) {
    info!(
        status = response.status().as_u16(),
        latency_ms = latency.as_secs_f64() * 1000.0,
        "response sent"
    );
}
