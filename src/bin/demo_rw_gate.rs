// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025-2026 natyamatsya contributors
//
// Reader/writer demo over the writer-preferring gate.
//
// Usage:
//   demo_rw_gate [--config <file>] [--readers N] [--writers N]
//                [--tick-ms MS] [--duration-secs S] [-v]
//
// Readers print the shared value, writers overwrite it with a random value
// in 1..=100. Without --duration-secs the service runs until killed.

use std::path::PathBuf;
use std::thread;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use libcoord::harness::GateService;
use libcoord::Config;

#[derive(Parser, Debug)]
#[command(name = "demo_rw_gate", about = "Reader/writer gate demo")]
struct Cli {
    /// TOML configuration file
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Number of reader threads
    #[arg(long)]
    readers: Option<usize>,

    /// Number of writer threads
    #[arg(long)]
    writers: Option<usize>,

    /// Pacing tick in milliseconds (0 = no sleeping)
    #[arg(long)]
    tick_ms: Option<u64>,

    /// Stop the service after this many seconds instead of running forever
    #[arg(long)]
    duration_secs: Option<u64>,

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
    if let Some(v) = cli.readers {
        config.gate.reader_count = v;
    }
    if let Some(v) = cli.writers {
        config.gate.writer_count = v;
    }
    if let Some(v) = cli.tick_ms {
        config.pacing.tick_ms = v;
    }

    println!("start");
    let service = GateService::start(&config.gate, config.pacing.pacing())?;

    let report = match cli.duration_secs {
        Some(secs) => {
            thread::sleep(Duration::from_secs(secs));
            service.stop()?
        }
        None => service.join_forever()?,
    };
    println!(
        "end: {} reads, {} writes, final value {}",
        report.reads.iter().sum::<usize>(),
        report.writes.iter().sum::<usize>(),
        report.final_value
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
