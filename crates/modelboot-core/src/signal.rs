//! OS signal handling for graceful shutdown.

/// Completes when the process receives a termination signal.
///
/// On Unix this listens for SIGINT and SIGTERM, with `ctrl_c` as a fallback;
/// elsewhere only `ctrl_c` is awaited. Each call installs fresh listeners,
/// so it can be awaited once per supervisor phase.
#[cfg(unix)]
pub async fn wait_for_shutdown() -> std::io::Result<()> {
    use tokio::signal::unix::{signal, SignalKind};

    let mut sigint = signal(SignalKind::interrupt())?;
    let mut sigterm = signal(SignalKind::terminate())?;

    tokio::select! {
        _ = tokio::signal::ctrl_c() => {},
        _ = sigint.recv() => {},
        _ = sigterm.recv() => {},
    }
    Ok(())
}

#[cfg(not(unix))]
pub async fn wait_for_shutdown() -> std::io::Result<()> {
    tokio::signal::ctrl_c().await
}
