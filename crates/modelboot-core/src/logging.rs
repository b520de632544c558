//! Logging init: stderr with env-filter, stdout stays clean for the service.

use tracing_subscriber::EnvFilter;

/// Initialize structured logging to stderr.
///
/// The supervisor runs in the foreground and hands stdout to the spawned
/// service, so all of its own output goes to stderr. `RUST_LOG` overrides the
/// default filter.
pub fn init_logging() {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,modelboot_core=debug,modelboot_cli=debug"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();
}
