//! Logging setup.
//!
//! The widget only emits `tracing` events; hosts that already install a
//! subscriber can ignore this module.

use std::sync::Once;

use tracing_subscriber::{fmt, EnvFilter};

/// Output format for logs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    /// JSON format (for log aggregation).
    #[default]
    Json,
    /// Human-readable format (for development).
    Human,
}

static INIT: Once = Once::new();

/// Install a global stderr subscriber filtered by `RUST_LOG` (default `info`).
///
/// Only the first call has any effect.
pub fn init_logging(format: LogFormat) {
    INIT.call_once(|| {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
        let builder = fmt()
            .with_env_filter(filter)
            .with_target(false)
            .with_writer(std::io::stderr);
        let _ = match format {
            LogFormat::Json => builder.json().try_init(),
            LogFormat::Human => builder.compact().try_init(),
        };
    });
}

/// Like [`init_logging`], but writes through the test harness.
pub fn init_test_logging() {
    let _ = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}
