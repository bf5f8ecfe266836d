pub mod handlers;
pub mod middleware;
pub mod rest;
pub mod state;
pub mod telemetry;

pub use rest::build_router;
pub use state::AppState;

use loadprobe_core::Config;
use thiserror::Error;
use tokio::net::TcpListener;
use tracing::info;

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("Failed to bind to {addr}: {source}")]
    Bind {
        addr: String,
        source: std::io::Error,
    },

    #[error("Server error: {0}")]
    Serve(#[source] std::io::Error),
}

/// Boots the probe HTTP server and runs it until Ctrl+C or SIGTERM.
pub async fn run_server(config: Config) -> Result<(), ServerError> {
    let addr = config.bind_address();
    let listener = TcpListener::bind(&addr)
        .await
        .map_err(|source| ServerError::Bind {
            addr: addr.clone(),
            source,
        })?;

    serve(listener, &config).await
}

/// Serves on an already bound listener.
pub async fn serve(listener: TcpListener, config: &Config) -> Result<(), ServerError> {
    let state = AppState::from_config(config);
    let app = build_router(state, &config.server.route);

    let local = listener.local_addr().map_err(ServerError::Serve)?;
    info!(
        "Starting probe server on {} (route {}, runtime {})",
        local, config.server.route, config.probe.runtime
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(ServerError::Serve)?;

    info!("Probe server shutdown complete");
    Ok(())
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install CTRL+C signal handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received CTRL+C signal, initiating graceful shutdown");
        }
        _ = terminate => {
            info!("Received SIGTERM signal, initiating graceful shutdown");
        }
    }
}
