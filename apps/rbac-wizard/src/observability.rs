//! Logging bootstrap.

use std::sync::OnceLock;

use tracing_subscriber::EnvFilter;

use crate::config::{LogFormat, LoggingConfig};

static LOG_INIT: OnceLock<()> = OnceLock::new();

const LEVELS: [&str; 6] = ["trace", "debug", "info", "warn", "error", "off"];

/// Normalized level directive; unrecognised values fall back to `info`.
#[must_use]
pub fn level_directive(level: &str) -> &'static str {
    let level = level.trim().to_ascii_lowercase();
    LEVELS
        .into_iter()
        .find(|known| *known == level)
        .unwrap_or("info")
}

/// Install the global subscriber. `RUST_LOG` takes precedence over the
/// configured level. Later calls are no-ops.
pub fn init_logging(config: &LoggingConfig) {
    LOG_INIT.get_or_init(|| {
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(level_directive(&config.level)));
        let builder = tracing_subscriber::fmt().with_env_filter(filter);
        let result = match config.format {
            LogFormat::Text => builder.try_init(),
            LogFormat::Json => builder.json().try_init(),
        };
        if let Err(e) = result {
            eprintln!("logging already initialized: {e}");
        }
    });
}
