// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025-2026 natyamatsya contributors

use std::sync::Arc;

use super::{join_all, spawn_worker, Worker};
use crate::config::ChannelConfig;
use crate::{BoundedChannel, Jitter, Pacing, Role, RunError, WorkerId};

const PRODUCER_SEED_OFFSET: usize = 1 << 16;

/// What a full producer/consumer run did.
#[derive(Debug, Clone, Default)]
pub struct ChannelReport {
    /// Items emitted, indexed by producer.
    pub produced: Vec<usize>,
    /// Items taken, indexed by consumer.
    pub consumed: Vec<usize>,
    /// Every value produced, in no particular order.
    pub produced_values: Vec<u32>,
    /// Every value consumed, in no particular order.
    pub consumed_values: Vec<u32>,
    /// Items still buffered after all consumers exited.
    pub remaining: usize,
}

impl ChannelReport {
    pub fn consume_events(&self) -> usize {
        self.consumed.iter().sum()
    }
}

/// Run the bounded channel protocol to completion.
///
/// Consumers start first, then producers. Once every producer has met its
/// quota and been joined, shutdown is signalled and consumers drain and
/// exit.
pub fn run_channel(config: &ChannelConfig, pacing: Pacing) -> Result<ChannelReport, RunError> {
    config.validate()?;
    let chan = Arc::new(BoundedChannel::<u32>::new(config.capacity));
    let quota = config.per_producer_quota;

    tracing::info!(
        capacity = config.capacity,
        producers = config.producer_count,
        consumers = config.consumer_count,
        quota,
        "starting producer/consumer run"
    );

    let mut consumers = Vec::with_capacity(config.consumer_count);
    let mut producers = Vec::with_capacity(config.producer_count);
    let spawned = spawn_workers(&chan, config, pacing, &mut consumers, &mut producers);

    // Whatever was spawned is joined and released, even on failure.
    let produced = join_all(producers);
    chan.signal_shutdown();
    let consumed = join_all(consumers);
    spawned?;
    let produced_values = produced?;
    let consumed_values = consumed?;

    let report = ChannelReport {
        produced: produced_values.iter().map(Vec::len).collect(),
        consumed: consumed_values.iter().map(Vec::len).collect(),
        produced_values: produced_values.into_iter().flatten().collect(),
        consumed_values: consumed_values.into_iter().flatten().collect(),
        remaining: chan.len(),
    };
    tracing::info!(
        consumed = report.consume_events(),
        remaining = report.remaining,
        "producer/consumer run finished"
    );
    Ok(report)
}

/// Spawn the consumers, then the producers. Stops at the first spawn
/// failure, leaving the workers spawned so far in the vectors.
fn spawn_workers(
    chan: &Arc<BoundedChannel<u32>>,
    config: &ChannelConfig,
    pacing: Pacing,
    consumers: &mut Vec<Worker<Vec<u32>>>,
    producers: &mut Vec<Worker<Vec<u32>>>,
) -> Result<(), RunError> {
    let quota = config.per_producer_quota;
    for i in 0..config.consumer_count {
        let id = WorkerId(i);
        let mut consumer = chan.consumer(id);
        consumers.push(spawn_worker(Role::Consumer, id, move || {
            let mut jitter = Jitter::from_clock(id);
            let mut taken = Vec::new();
            loop {
                pacing.pause(&mut jitter);
                let Some((pos, value)) = consumer.consume() else {
                    break;
                };
                tracing::info!(consumer = %id, value, pos, "consuming");
                taken.push(value);
            }
            tracing::info!(consumer = %id, consumed = consumer.consumed(), "consumer finished");
            taken
        })?);
    }

    for i in 0..config.producer_count {
        let id = WorkerId(i);
        let mut producer = chan.producer(id);
        producers.push(spawn_worker(Role::Producer, id, move || {
            // Offset from the consumer seeds so the two groups do not mirror.
            let mut jitter = Jitter::from_clock(WorkerId(i + PRODUCER_SEED_OFFSET));
            let mut made = Vec::with_capacity(quota);
            while producer.produced() < quota {
                pacing.pause(&mut jitter);
                let value = jitter.one_to(10);
                let pos = producer.produce(value);
                tracing::info!(
                    producer = %id,
                    value,
                    pos,
                    produced = producer.produced(),
                    quota,
                    "producing"
                );
                made.push(value);
            }
            tracing::info!(producer = %id, "producer finished");
            made
        })?);
    }
    Ok(())
}
