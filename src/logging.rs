//! Tracing subscriber setup for embedding applications.

use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::EnvFilter;

/// Initializes the tracing subscriber.
///
/// If `RUST_LOG` is set it takes precedence; otherwise `level` is applied to
/// this crate only. Call once from the embedding application.
pub fn init_logger(level: LevelFilter) {
    let filter = match std::env::var("RUST_LOG").ok() {
        Some(_) => {
            // RUST_LOG exists; use it.
            EnvFilter::from_default_env()
        }
        None => {
            // RUST_LOG does not exist; use default log level for this crate only.
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), level))
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
