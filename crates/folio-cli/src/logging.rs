//! Diagnostic logging to stderr.

use tracing_subscriber::EnvFilter;

/// Variable holding the log filter (`EnvFilter` syntax).
pub const LOG_ENV: &str = "FOLIO_LOG";

/// Install the global subscriber. `FOLIO_LOG` overrides `default_level`.
/// Calling it twice keeps the first subscriber.
pub fn init(default_level: &str) {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(default_level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .try_init();
}
