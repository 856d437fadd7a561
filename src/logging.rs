//! Tracing subscriber setup for the binary

use tracing_subscriber::EnvFilter;

/// `RUST_LOG` wins; otherwise `info`. Logs go to stderr so stdout stays JSON.
pub fn init() {
  let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
  let _ = tracing_subscriber::fmt()
    .with_env_filter(filter)
    .with_writer(std::io::stderr)
    .try_init();
}
