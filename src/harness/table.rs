// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025-2026 natyamatsya contributors

use std::sync::Arc;

use super::{join_all, spawn_worker};
use crate::config::TableConfig;
use crate::{Jitter, PairWorker, Pacing, ResourceRing, Role, RunError, WorkerId};

/// What a full resource-ring run did.
#[derive(Debug, Clone, Default)]
pub struct TableReport {
    /// Rounds completed, indexed by worker.
    pub rounds: Vec<usize>,
    /// Back-offs (right resource busy), indexed by worker.
    pub backoffs: Vec<usize>,
}

impl TableReport {
    pub fn eat_events(&self) -> usize {
        self.rounds.iter().sum()
    }
}

/// Run every worker of the ring until each has met its round quota.
pub fn run_table(config: &TableConfig, pacing: Pacing) -> Result<TableReport, RunError> {
    config.validate()?;
    let ring = Arc::new(ResourceRing::new(config.worker_count));
    let quota = config.per_worker_round_quota;

    tracing::info!(workers = config.worker_count, quota, "dinner is served");

    let mut workers = Vec::with_capacity(config.worker_count);
    for i in 0..config.worker_count {
        let id = WorkerId(i);
        let ring = Arc::clone(&ring);
        let spawned = spawn_worker(Role::Philosopher, id, move || {
            let mut worker = PairWorker::new(id, quota, Jitter::from_clock(id));
            worker.run(&ring, &pacing, |id, round| {
                tracing::info!(philosopher = %id, round, "eating");
            });
            tracing::info!(
                philosopher = %id,
                backoffs = worker.backoffs(),
                "philosopher is satisfied"
            );
            (worker.completed(), worker.backoffs())
        });
        match spawned {
            Ok(worker) => workers.push(worker),
            Err(err) => {
                // The ones already seated still finish their quota.
                join_all(workers).ok();
                return Err(err);
            }
        }
    }

    let (rounds, backoffs) = join_all(workers)?.into_iter().unzip();
    let report = TableReport { rounds, backoffs };
    tracing::info!(eat_events = report.eat_events(), "dinner finished");
    Ok(report)
}
