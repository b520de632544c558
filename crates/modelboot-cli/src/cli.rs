use anyhow::Result;
use clap::Parser;
use std::sync::Arc;

use modelboot_core::cache::CachePaths;
use modelboot_core::config;
use modelboot_core::fetch::HubFetcher;
use modelboot_core::supervisor::{self, Outcome};

/// Exit code when the supervisor itself fails: the service binary could not
/// be started, or startup (config, cache resolution) failed before the
/// launch. Distinct from the graceful paths; a nonzero exit from the service
/// itself is propagated unchanged instead.
pub const STARTUP_FAILURE_EXIT: i32 = 2;

/// Bootstrap supervisor for the transcription server.
///
/// Takes no arguments: the model, retry policy, and service command come
/// from the config file.
#[derive(Debug, Parser)]
#[command(name = "modelboot")]
#[command(about = "Prefetch the VAD model, then launch the transcription server", long_about = None)]
#[command(version)]
pub struct Cli {}

pub async fn run_from_args() -> i32 {
    let _cli = Cli::parse();

    match run().await {
        Ok(code) => code,
        Err(err) => {
            eprintln!("modelboot error: {:#}", err);
            STARTUP_FAILURE_EXIT
        }
    }
}

async fn run() -> Result<i32> {
    let cfg = config::load_or_init()?;
    tracing::debug!("loaded config: {:?}", cfg);

    let cache = CachePaths::resolve(&cfg.cache)?;
    let fetcher = Arc::new(HubFetcher::new(&cfg.model, &cache));
    let command = cfg.server.command();

    let outcome = supervisor::supervise(cfg.retry.policy(), &cache, &command, fetcher).await?;
    if outcome == Outcome::Interrupted {
        tracing::info!("service stopped");
    }
    Ok(outcome.exit_code())
}
