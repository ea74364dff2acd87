// src/logging.rs

use tracing_subscriber::EnvFilter;

/// Installs the process-wide tracing subscriber.
///
/// Level comes from `RUST_LOG` (default `info`). Logs go to stderr so the
/// run summary on stdout stays clean. Safe to call more than once.
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}
