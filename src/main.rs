// Quantum Rate Limit - Command Line Entry Point
//
// Small driver around the library:
// - show-config: print the effective configuration
// - simulate: hammer a limiter with concurrent workers and report grants

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use quantum_ratelimit::config::Config;
use quantum_ratelimit::logging::init_tracing;
use quantum_ratelimit::rate_limit::LimiterStats;
use rand::Rng;
use serde::Serialize;
use std::path::PathBuf;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinSet;
use tracing::{debug, info};

/// ratelimit: token bucket rate limiter toolkit
#[derive(Parser, Debug)]
#[command(name = "ratelimit")]
#[command(version)]
#[command(about = "Token bucket rate limiter with hourly-rate replenishment", long_about = None)]
struct Args {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Path to a TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Print the effective configuration as JSON
    ShowConfig,
    /// Drive a limiter with concurrent workers and report the grants
    Simulate {
        /// Number of concurrent workers
        #[arg(long, default_value_t = 4)]
        workers: usize,

        /// Take calls issued by each worker
        #[arg(long, default_value_t = 25)]
        requests: usize,

        /// Upper bound for the random size of each take
        #[arg(long, default_value_t = 10)]
        max_tokens: i64,

        /// Pause between calls of one worker
        #[arg(long, default_value_t = 0)]
        pause_ms: u64,
    },
}

#[derive(Debug, Serialize)]
struct SimulationReport {
    workers: usize,
    requests_per_worker: usize,
    requested: i64,
    granted: i64,
    stats: LimiterStats,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => Config::load_from_path(path)?,
        None => Config::from_env()?,
    };

    init_tracing(&config.logging, args.verbose)?;

    match args.command {
        Some(Commands::ShowConfig) => {
            println!("{}", serde_json::to_string_pretty(&config)?);
        }
        Some(Commands::Simulate {
            workers,
            requests,
            max_tokens,
            pause_ms,
        }) => {
            let report = simulate(&config, workers, requests, max_tokens, pause_ms).await?;
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        None => {
            info!("No command specified. Use \"ratelimit --help\" for usage.");
        }
    }

    Ok(())
}

async fn simulate(
    config: &Config,
    workers: usize,
    requests: usize,
    max_tokens: i64,
    pause_ms: u64,
) -> Result<SimulationReport> {
    anyhow::ensure!(max_tokens > 0, "--max-tokens must be greater than zero");

    let limiter = Arc::new(
        config
            .limiter
            .build()
            .context("Failed to build limiter from configuration")?,
    );
    let requested = Arc::new(AtomicI64::new(0));
    let granted = Arc::new(AtomicI64::new(0));

    info!(
        workers,
        requests,
        interval = config.limiter.interval_secs,
        quantum = config.limiter.quantum,
        "Starting simulation"
    );

    let mut tasks = JoinSet::new();
    for worker in 0..workers {
        let limiter = Arc::clone(&limiter);
        let requested = Arc::clone(&requested);
        let granted = Arc::clone(&granted);

        tasks.spawn(async move {
            for _ in 0..requests {
                let n = rand::rng().random_range(1..=max_tokens);
                let got = limiter.take(n);
                requested.fetch_add(n, Ordering::SeqCst);
                granted.fetch_add(got, Ordering::SeqCst);

                if got < n {
                    debug!(worker, requested = n, granted = got, "Worker throttled");
                }
                if pause_ms > 0 {
                    tokio::time::sleep(Duration::from_millis(pause_ms)).await;
                }
            }
        });
    }

    while let Some(result) = tasks.join_next().await {
        result.context("Simulation worker failed")?;
    }

    Ok(SimulationReport {
        workers,
        requests_per_worker: requests,
        requested: requested.load(Ordering::SeqCst),
        granted: granted.load(Ordering::SeqCst),
        stats: limiter.stats(),
    })
}
