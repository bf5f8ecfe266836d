//! Logging initialization.
//!
//! `RUST_LOG` takes precedence over the configured level when set.

use loadprobe_core::LoggingConfig;
use tracing_subscriber::EnvFilter;

pub type TelemetryError = Box<dyn std::error::Error + Send + Sync>;

/// Installs the global `tracing` subscriber in pretty or JSON format.
pub fn init_logging(config: &LoggingConfig) -> Result<(), TelemetryError> {
    let env_filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(&config.level)?,
    };

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(true)
        .with_line_number(true);

    if config.format == "json" {
        subscriber.json().try_init()
    } else {
        subscriber.try_init()
    }
}
