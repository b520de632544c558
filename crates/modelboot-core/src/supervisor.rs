//! Supervisor: best-effort model prefetch, then unconditional service handoff.

use std::future::Future;
use std::io;
use std::sync::Arc;

use thiserror::Error;
use tokio::process::Command;
use tracing::{info, warn};

use crate::cache::CachePaths;
use crate::fetch::ModelFetcher;
use crate::retry::{acquire, BackoffPolicy};
use crate::signal;

/// Command line of the supervised service process.
#[derive(Debug, Clone)]
pub struct ServerCommand {
    pub program: String,
    pub args: Vec<String>,
}

/// Terminal state of one supervisor invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The service exited on its own with this code.
    Exited(i32),
    /// The supervisor was interrupted (or the service was signal-terminated);
    /// a graceful stop, not a failure.
    Interrupted,
}

impl Outcome {
    /// Process exit code to report: the service's own code, or 0 for a
    /// graceful stop.
    pub fn exit_code(&self) -> i32 {
        match self {
            Outcome::Exited(code) => *code,
            Outcome::Interrupted => 0,
        }
    }
}

/// Fatal launch-layer failures. Prefetch failures never appear here.
#[derive(Debug, Error)]
pub enum LaunchError {
    #[error("failed to start {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },
    #[error("failed while waiting for {program}: {source}")]
    Wait {
        program: String,
        #[source]
        source: io::Error,
    },
}

/// Resolves when a shutdown signal arrives. If the listeners cannot be
/// installed, the failure is logged and the future never resolves: a healthy
/// child must not be abandoned just because signal setup failed.
async fn shutdown_or_never<F>(wait: F)
where
    F: Future<Output = io::Result<()>>,
{
    if let Err(err) = wait.await {
        warn!("could not listen for shutdown signals: {}", err);
        std::future::pending::<()>().await;
    }
}

/// Prefetch the model (best effort), then spawn the service and wait for it.
///
/// The prefetch outcome is logged but never gates the launch: the service
/// has its own on-demand download. Only a spawn failure or an error while
/// waiting is fatal; an interrupt in either phase is a graceful stop.
pub async fn supervise(
    policy: BackoffPolicy,
    cache: &CachePaths,
    command: &ServerCommand,
    fetcher: Arc<dyn ModelFetcher>,
) -> Result<Outcome, LaunchError> {
    if let Err(err) = cache.ensure_dirs() {
        // The fetch will fail and be absorbed too; the service may still
        // come up with its own cache handling.
        warn!("could not prepare cache directories: {}", err);
    }

    // The backoff sleeps are blocking, so the loop runs on a blocking task
    // and is raced against the shutdown signal. If the signal wins, the
    // abandoned loop may still be sleeping; the process exits before that
    // matters.
    let prefetch = tokio::task::spawn_blocking({
        let fetcher = Arc::clone(&fetcher);
        move || acquire(&policy, fetcher.as_ref())
    });

    let acquired = tokio::select! {
        res = prefetch => res.unwrap_or_else(|err| {
            warn!("prefetch task failed: {}", err);
            false
        }),
        _ = shutdown_or_never(signal::wait_for_shutdown()) => {
            info!("interrupted during prefetch; launching service anyway");
            false
        }
    };

    if acquired {
        info!("model ready before launch");
    } else {
        info!("launching service without a prefetched model");
    }

    let mut child = Command::new(&command.program)
        .args(&command.args)
        .envs(cache.env_vars())
        .spawn()
        .map_err(|source| LaunchError::Spawn {
            program: command.program.clone(),
            source,
        })?;

    info!("started {} (pid {:?})", command.program, child.id());

    tokio::select! {
        status = child.wait() => {
            let status = status.map_err(|source| LaunchError::Wait {
                program: command.program.clone(),
                source,
            })?;
            match status.code() {
                Some(code) => {
                    if code == 0 {
                        info!("{} exited cleanly", command.program);
                    } else {
                        warn!("{} exited with code {}", command.program, code);
                    }
                    Ok(Outcome::Exited(code))
                }
                // Killed by a signal (e.g. terminal Ctrl-C reaching the whole
                // process group before our listener fires).
                None => Ok(Outcome::Interrupted),
            }
        }
        _ = shutdown_or_never(signal::wait_for_shutdown()) => {
            info!("interrupt received; shutting down");
            Ok(Outcome::Interrupted)
        }
    }
}
