// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025-2026 natyamatsya contributors
//
// Dining philosophers demo over the resource ring.
//
// Usage:
//   demo_dining [--config <file>] [--philosophers N] [--quota N]
//               [--tick-ms MS] [-v]
//
// Each philosopher thinks, picks up the left chopstick, tries the right
// one (putting the left back if it is taken), eats, and puts both down,
// until it has eaten `quota` times.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use libcoord::harness::run_table;
use libcoord::Config;

#[derive(Parser, Debug)]
#[command(name = "demo_dining", about = "Dining philosophers demo")]
struct Cli {
    /// TOML configuration file
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Number of philosophers (and chopsticks)
    #[arg(long)]
    philosophers: Option<usize>,

    /// Meals each philosopher eats before leaving
    #[arg(long)]
    quota: Option<usize>,

    /// Pacing tick in milliseconds (0 = no sleeping)
    #[arg(long)]
    tick_ms: Option<u64>,

    /// Enable debug output
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let mut config = match &cli.config {
        Some(path) => Config::load(path).with_context(|| format!("loading {}", path.display()))?,
        None => Config::default(),
    };
    if let Some(v) = cli.philosophers {
        config.table.worker_count = v;
    }
    if let Some(v) = cli.quota {
        config.table.per_worker_round_quota = v;
    }
    if let Some(v) = cli.tick_ms {
        config.pacing.tick_ms = v;
    }

    let report = run_table(&config.table, config.pacing.pacing())?;
    println!(
        "end: {} meals, {} back-offs",
        report.eat_events(),
        report.backoffs.iter().sum::<usize>()
    );
    Ok(())
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_names(true)
        .init();
}
