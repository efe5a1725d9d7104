#![doc = include_str!("../README.md")]

mod cli;

use std::io::{self, Write};

use anyhow::{Context, anyhow, bail};
use clap::Parser;
use cli::config::{CliArgs, IdLayout, MintConfig};
use cli::telemetry::init_telemetry;
use ridgen::{IdGenerator, LockGenerator, Minter, MonotonicClock, ResourceTag};
use tokio::signal;
use tokio_util::sync::CancellationToken;

// Using mimalloc for better performance under contention, especially in musl
// environments.
#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

type Generator = LockGenerator<IdLayout, MonotonicClock>;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load from .env
    let _ = dotenvy::dotenv();
    let args = CliArgs::parse();
    let config = MintConfig::try_from(args)?;

    init_telemetry(config.json)?;
    log_startup_info(&config);

    let generator: Generator = LockGenerator::new(config.generator, MonotonicClock::default());
    if let Some(e) = generator.fatal_error() {
        bail!("id generator is unavailable: {e}");
    }
    let minter = Minter::new(generator, config.options.clone(), config.policy);

    let cancel = CancellationToken::new();
    tokio::spawn(shutdown_signal(cancel.clone()));

    let run = mint_all(&minter, &config.tag, config.count, &cancel);
    let minted = match config.deadline {
        Some(deadline) => tokio::time::timeout(deadline, run)
            .await
            .map_err(|_| anyhow!("deadline of {deadline:?} exceeded"))??,
        None => run.await?,
    };

    tracing::info!(minted, "done");
    Ok(())
}

/// Mints `count` identifiers, writing one per line to stdout as they are
/// produced. Returns how many were written.
async fn mint_all(
    minter: &Minter<Generator, IdLayout>,
    tag: &ResourceTag,
    count: usize,
    cancel: &CancellationToken,
) -> anyhow::Result<usize> {
    let mut stdout = io::stdout().lock();
    for minted in 0..count {
        let id = minter
            .mint(tag, cancel)
            .await
            .with_context(|| format!("failed to mint identifier #{}", minted + 1))?;
        writeln!(stdout, "{id}")?;
    }
    stdout.flush()?;
    Ok(count)
}

fn log_startup_info(config: &MintConfig) {
    if cfg!(debug_assertions) {
        tracing::info!("Minting with full config: {:#?}", config);
    } else {
        tracing::info!(
            machine_id = config.generator.machine_id(),
            tag = %config.tag,
            count = config.count,
            "Minting identifiers"
        );
    }
}

async fn shutdown_signal(cancel: CancellationToken) {
    if let Err(e) = signal::ctrl_c().await {
        tracing::error!("Failed to install Ctrl+C handler: {e}");
        return;
    }
    tracing::info!("Received Ctrl+C signal, cancelling");
    cancel.cancel();
}
