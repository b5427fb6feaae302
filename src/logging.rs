use std::env;
use std::io::{self, IsTerminal};
use tracing_subscriber::EnvFilter;

/// Installs the global subscriber. Output goes to stderr so that stdout stays
/// reserved for command results.
pub fn setup_logging() {
    let is_terminal = io::stderr().is_terminal();
    let log_level = env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&log_level));

    if is_terminal {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_writer(io::stderr)
            .with_ansi(true)
            .with_target(true)
            .init();
    } else {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(env_filter)
            .with_writer(io::stderr)
            .with_ansi(false)
            .with_target(true)
            .init();
    }
    tracing::debug!("Logging initialized with level: {:?}", log_level);
}
