//! Observability utilities.

use std::sync::OnceLock;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::types::{Config, ObservabilityConfig};

static TRACING_INIT: OnceLock<()> = OnceLock::new();

/// Initialize tracing subscriber once for the process.
///
/// Settings come from [`Config::from_env`], so `FDHANDLE_LOG_FORMAT=json`
/// switches to JSON output. Filter defaults to `info` if `RUST_LOG` is unset.
/// An unparsable environment falls back to the default observability settings.
pub fn init_tracing() {
    let config = Config::from_env().unwrap_or_else(|err| {
        eprintln!("ignoring environment config: {err}");
        Config::default()
    });
    init_tracing_with(&config.observability);
}

/// Initialize tracing from an explicit configuration. `RUST_LOG` still wins
/// over `log_level` when set. Only the first call in a process has effect.
pub fn init_tracing_with(config: &ObservabilityConfig) {
    TRACING_INIT.get_or_init(|| {
        let env_filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(&config.log_level));

        let result = if config.json_logs {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(fmt::layer().json())
                .try_init()
        } else {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(fmt::layer().compact())
                .try_init()
        };

        if let Err(err) = result {
            eprintln!("tracing init skipped: {err}");
        }
    });
}
