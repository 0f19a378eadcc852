//! Logging and tracing initialization.
//!
//! Logs go to stderr so command output on stdout stays clean.

use tracing_subscriber::EnvFilter;

use crate::config::LoggingConfig;

/// `RUST_LOG` wins; otherwise the configured level, falling back to `info`
/// when that level does not parse.
pub fn env_filter(config: &LoggingConfig) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.level))
        .unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Initialize the tracing subscriber with the given configuration.
///
/// Calling this more than once keeps the first subscriber.
pub fn init_logging(config: &LoggingConfig) {
    let builder = tracing_subscriber::fmt()
        .with_env_filter(env_filter(config))
        .with_writer(std::io::stderr);

    if config.json {
        builder.json().with_current_span(false).try_init().ok();
    } else {
        builder
            .with_target(true)
            .with_thread_ids(false)
            .with_file(false)
            .with_line_number(false)
            .try_init()
            .ok();
    }
}
