//! Tracing subscriber setup

use tracing_subscriber::{fmt, EnvFilter};

use triarb_core::{LogFormat, LoggingConfig};

/// Install the global subscriber. `RUST_LOG` wins over the `info` default.
pub fn init_logging(config: &LoggingConfig) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    match config.format {
        LogFormat::Text => fmt()
            .with_env_filter(filter)
            .with_target(true)
            .with_thread_ids(true)
            .with_file(true)
            .with_line_number(true)
            .init(),
        LogFormat::Json => fmt()
            .json()
            .with_env_filter(filter)
            .with_target(true)
            .with_current_span(false)
            .init(),
    }
}
