// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025-2026 natyamatsya contributors
//
// Producer/consumer demo over the bounded channel.
//
// Usage:
//   demo_prod_cons [--config <file>] [--capacity N] [--producers N]
//                  [--consumers N] [--quota N] [--tick-ms MS] [-v]
//
// Every producer emits `quota` random values in 1..=10, pausing 1..=5 ticks
// before each. Once all producers are done the consumers drain the buffer
// and the program exits.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use libcoord::harness::run_channel;
use libcoord::Config;

#[derive(Parser, Debug)]
#[command(name = "demo_prod_cons", about = "Bounded channel producer/consumer demo")]
struct Cli {
    /// TOML configuration file
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Ring slots (one is kept empty)
    #[arg(long)]
    capacity: Option<usize>,

    /// Number of producer threads
    #[arg(long)]
    producers: Option<usize>,

    /// Number of consumer threads
    #[arg(long)]
    consumers: Option<usize>,

    /// Items each producer emits
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
    let ch = &mut config.channel;
    if let Some(v) = cli.capacity {
        ch.capacity = v;
    }
    if let Some(v) = cli.producers {
        ch.producer_count = v;
    }
    if let Some(v) = cli.consumers {
        ch.consumer_count = v;
    }
    if let Some(v) = cli.quota {
        ch.per_producer_quota = v;
    }
    if let Some(v) = cli.tick_ms {
        config.pacing.tick_ms = v;
    }

    println!("start");
    let report = run_channel(&config.channel, config.pacing.pacing())?;
    println!(
        "end: {} produced, {} consumed, {} left",
        report.produced_values.len(),
        report.consume_events(),
        report.remaining
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
