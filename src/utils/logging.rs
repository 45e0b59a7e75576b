//! Tracing subscriber setup

use tracing_subscriber::EnvFilter;

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Human readable, single line per event
    #[default]
    Pretty,
    /// One JSON object per event
    Json,
}

/// Initialize the global tracing subscriber
///
/// `RUST_LOG` takes precedence over `default_filter`. Calling this twice is
/// harmless: the second initialization is ignored.
pub fn init_tracing(default_filter: &str, format: LogFormat) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false);

    let _ = match format {
        LogFormat::Pretty => builder.try_init(),
        LogFormat::Json => builder.json().try_init(),
    };
}
