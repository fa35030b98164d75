//! Diagnostic logging.
//!
//! Uses `tracing` for structured logs. Logs go to stderr; stdout carries the
//! progress listing from [`crate::output`].

use crate::config::LoggingConfig;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Initialize the global subscriber.
///
/// `verbose` selects DEBUG instead of INFO, `json_format` selects JSON lines
/// instead of the human format. A set `RUST_LOG` overrides the level.
pub fn init(verbose: bool, json_format: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    // try_init: a second call (tests, embedding) keeps the first subscriber
    if json_format {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .try_init()
            .ok();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_writer(std::io::stderr),
            )
            .try_init()
            .ok();
    }
}

/// Initialize from the `[logging]` config section, with CLI overrides.
pub fn init_from_config(config: &LoggingConfig, verbose_override: bool, json_override: bool) {
    init(
        verbose_override || config.is_verbose(),
        json_override || config.is_json(),
    );
}
