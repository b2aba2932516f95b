// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025-2026 natyamatsya contributors

use std::sync::Arc;

use super::{join_all, spawn_worker, Worker};
use crate::config::GateConfig;
use crate::{Jitter, Pacing, Role, RunError, RwGate, WorkerId};

const WRITER_SEED_OFFSET: usize = 1 << 16;

/// What a reader/writer service did between `start` and `stop`.
#[derive(Debug, Clone, Default)]
pub struct GateReport {
    /// Completed reads, indexed by reader.
    pub reads: Vec<usize>,
    /// Completed writes, indexed by writer.
    pub writes: Vec<usize>,
    /// Value left in the cell.
    pub final_value: u32,
}

/// A running reader/writer service. It has no natural end: readers and
/// writers loop until [`stop`](Self::stop) shuts the gate.
pub struct GateService {
    gate: Arc<RwGate<u32>>,
    readers: Vec<Worker<usize>>,
    writers: Vec<Worker<usize>>,
}

impl GateService {
    /// Spawn the writers, then the readers, around a cell holding 0.
    pub fn start(config: &GateConfig, pacing: Pacing) -> Result<Self, RunError> {
        config.validate()?;
        let gate = Arc::new(RwGate::new(0u32));

        tracing::info!(
            readers = config.reader_count,
            writers = config.writer_count,
            "starting reader/writer service"
        );

        let mut service = Self {
            gate,
            readers: Vec::with_capacity(config.reader_count),
            writers: Vec::with_capacity(config.writer_count),
        };
        let spawned = spawn_workers(
            &service.gate,
            config,
            pacing,
            &mut service.writers,
            &mut service.readers,
        );
        if let Err(err) = spawned {
            // Release whatever did start before reporting the failure.
            service.stop().ok();
            return Err(err);
        }
        Ok(service)
    }

    pub fn gate(&self) -> &Arc<RwGate<u32>> {
        &self.gate
    }

    /// Block on the workers without ever shutting the gate. Never returns
    /// `Ok`; an error means a worker panicked.
    pub fn join_forever(self) -> Result<GateReport, RunError> {
        let reads = join_all(self.readers);
        let writes = join_all(self.writers);
        let (reads, writes) = (reads?, writes?);
        Ok(GateReport {
            reads,
            writes,
            final_value: self.gate.update(|v| *v),
        })
    }

    /// Shut the gate down and join every worker.
    pub fn stop(self) -> Result<GateReport, RunError> {
        self.gate.shutdown();
        let writes = join_all(self.writers);
        let reads = join_all(self.readers);
        let (writes, reads) = (writes?, reads?);
        // Readers are no longer admitted; look at the cell from the writer side.
        let final_value = self.gate.update(|v| *v);
        tracing::info!(
            reads = reads.iter().sum::<usize>(),
            writes = writes.iter().sum::<usize>(),
            final_value,
            "reader/writer service stopped"
        );
        Ok(GateReport {
            reads,
            writes,
            final_value,
        })
    }
}

/// Spawn the writers, then the readers. Stops at the first spawn failure,
/// leaving the workers spawned so far in the vectors.
fn spawn_workers(
    gate: &Arc<RwGate<u32>>,
    config: &GateConfig,
    pacing: Pacing,
    writers: &mut Vec<Worker<usize>>,
    readers: &mut Vec<Worker<usize>>,
) -> Result<(), RunError> {
    for i in 0..config.writer_count {
        let id = WorkerId(i);
        let gate = Arc::clone(gate);
        writers.push(spawn_worker(Role::Writer, id, move || {
            let mut jitter = Jitter::from_clock(WorkerId(i + WRITER_SEED_OFFSET));
            let mut writes = 0usize;
            loop {
                pacing.pause(&mut jitter);
                if gate.is_shut_down() {
                    break;
                }
                let value = jitter.one_to(100);
                gate.write(value);
                tracing::info!(writer = %id, value, "writing");
                writes += 1;
            }
            tracing::info!(writer = %id, writes, "writer stopped");
            writes
        })?);
    }

    for i in 0..config.reader_count {
        let id = WorkerId(i);
        let gate = Arc::clone(gate);
        readers.push(spawn_worker(Role::Reader, id, move || {
            let mut jitter = Jitter::from_clock(id);
            let mut reads = 0usize;
            loop {
                pacing.pause(&mut jitter);
                let Some(value) = gate.read(|v| *v) else {
                    break;
                };
                tracing::info!(reader = %id, value, "reading");
                reads += 1;
            }
            tracing::info!(reader = %id, reads, "reader stopped");
            reads
        })?);
    }
    Ok(())
}
