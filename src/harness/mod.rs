// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025-2026 natyamatsya contributors
//
// Coordinators that run each protocol end to end: spawn one named thread
// per worker, pace and narrate their actions, join them according to the
// protocol's termination rule, and hand back a report.

use std::thread::{self, JoinHandle};

use crate::{Role, RunError, WorkerId};

mod channel;
pub use channel::{run_channel, ChannelReport};

mod gate;
pub use gate::{GateReport, GateService};

mod table;
pub use table::{run_table, TableReport};

/// A spawned worker together with who it is, for error reporting on join.
pub(crate) struct Worker<T> {
    role: Role,
    id: WorkerId,
    handle: JoinHandle<T>,
}

pub(crate) fn spawn_worker<T, F>(role: Role, id: WorkerId, f: F) -> Result<Worker<T>, RunError>
where
    F: FnOnce() -> T + Send + 'static,
    T: Send + 'static,
{
    let handle = thread::Builder::new()
        .name(format!("{role}-{id}"))
        .spawn(f)
        .map_err(|source| RunError::Spawn {
            role,
            index: id.index(),
            source,
        })?;
    Ok(Worker { role, id, handle })
}

impl<T> Worker<T> {
    pub(crate) fn join(self) -> Result<T, RunError> {
        self.handle.join().map_err(|_| RunError::WorkerPanicked {
            role: self.role,
            index: self.id.index(),
        })
    }
}

/// Join every worker, even after one has failed, and report the first
/// failure.
pub(crate) fn join_all<T>(workers: Vec<Worker<T>>) -> Result<Vec<T>, RunError> {
    let mut results = Vec::with_capacity(workers.len());
    let mut first_err = None;
    for worker in workers {
        match worker.join() {
            Ok(value) => results.push(value),
            Err(err) => {
                tracing::error!(error = %err, "worker failed");
                first_err.get_or_insert(err);
            }
        }
    }
    match first_err {
        Some(err) => Err(err),
        None => Ok(results),
    }
}
