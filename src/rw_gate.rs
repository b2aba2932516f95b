// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025-2026 natyamatsya contributors
//
// Writer-preferring reader/writer gate over a single shared cell.
//
// Three pieces of state, each under its own lock:
//   - gate:    `writers_pending`, the number of writers waiting or writing.
//              New readers wait at the gate while it is non-zero.
//   - readers: `active_readers`. The first reader in acquires `door`, the
//              last reader out releases it.
//   - door:    the write-exclusion lock. Writers hold it for the write.
//
// A writer's arrival (incrementing `writers_pending`) closes the gate to
// new readers immediately, but it never preempts readers already past the
// gate: it waits on `door` for them to leave. The last writer to drain
// broadcasts so every reader parked at the gate re-checks.

use std::cell::UnsafeCell;
use std::ops::Deref;

use parking_lot::Mutex;

use crate::{ExclusionLock, ScopedAccess, Waiter};

struct GateState {
    writers_pending: usize,
}

/// Point-in-time view of the gate counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GateSnapshot {
    pub active_readers: usize,
    pub writers_pending: usize,
    pub shut_down: bool,
}

/// A shared cell with many-readers / one-writer access and writer priority
/// over newly arriving readers.
pub struct RwGate<T> {
    gate: Mutex<GateState>,
    drained: Waiter, // readers park here while writers are pending
    readers: Mutex<usize>,
    door: ExclusionLock,
    cell: UnsafeCell<T>,
}

// Safety: `cell` is only read while `door` is held on behalf of the active
// readers, and only written while `door` is held by exactly one writer.
unsafe impl<T: Send> Send for RwGate<T> {}
unsafe impl<T: Send + Sync> Sync for RwGate<T> {}

impl<T> RwGate<T> {
    pub fn new(initial: T) -> Self {
        Self {
            gate: Mutex::new(GateState { writers_pending: 0 }),
            drained: Waiter::new(),
            readers: Mutex::new(0),
            door: ExclusionLock::new(),
            cell: UnsafeCell::new(initial),
        }
    }

    /// Enter the read section.
    ///
    /// Waits while any writer is pending, then joins the active readers
    /// (closing the door on writers if first in). Returns `None` once the
    /// gate has been shut down. Dropping the guard is `end_read`.
    pub fn begin_read(&self) -> Option<ReadGuard<'_, T>> {
        {
            let mut gate = self.gate.lock();
            if !self.drained.wait_while(&mut gate, |g| g.writers_pending > 0) {
                return None;
            }
        }

        let mut active = self.readers.lock();
        *active += 1;
        if *active == 1 {
            self.door.lock();
        }
        Some(ReadGuard { gate: self })
    }

    fn end_read(&self) {
        let mut active = self.readers.lock();
        *active -= 1;
        if *active == 0 {
            self.door.unlock();
        }
    }

    /// Run `f` inside a read section. `None` if the gate is shut down.
    pub fn read<R>(&self, f: impl FnOnce(&T) -> R) -> Option<R> {
        let guard = self.begin_read()?;
        Some(f(&guard))
    }

    /// Replace the cell's value, returning the previous one.
    pub fn write(&self, new_value: T) -> T {
        self.update(|cell| std::mem::replace(cell, new_value))
    }

    /// Run `f` with exclusive access to the cell.
    ///
    /// Announces the writer (blocking new readers), waits for the readers
    /// already inside to leave, writes, then withdraws the announcement.
    /// The last pending writer wakes every reader parked at the gate. The
    /// announcement is withdrawn even if `f` panics.
    pub fn update<R>(&self, f: impl FnOnce(&mut T) -> R) -> R {
        self.gate.lock().writers_pending += 1;
        let _pending = PendingWriter { gate: self };

        // Dropped before `_pending`: the door opens, then the gate.
        let _access = ScopedAccess::new(&self.door);
        // Safety: `door` is held; no reader is inside and no other
        // writer can be.
        f(unsafe { &mut *self.cell.get() })
    }

    fn end_write(&self) {
        let mut gate = self.gate.lock();
        gate.writers_pending -= 1;
        if gate.writers_pending == 0 {
            let woken = self.drained.broadcast();
            tracing::trace!(woken, "writers drained, gate reopened");
        }
    }

    /// Stop admitting readers and wake those parked at the gate.
    ///
    /// The quit flag is published under the gate lock the readers re-check
    /// under. Readers already inside and writers already queued finish
    /// normally.
    pub fn shutdown(&self) {
        let gate = self.gate.lock();
        let woken = self.drained.quit_waiting(&gate);
        tracing::debug!(woken, pending = gate.writers_pending, "gate shut down");
    }

    pub fn is_shut_down(&self) -> bool {
        self.drained.is_quit()
    }

    pub fn snapshot(&self) -> GateSnapshot {
        let writers_pending = self.gate.lock().writers_pending;
        let active_readers = *self.readers.lock();
        GateSnapshot {
            active_readers,
            writers_pending,
            shut_down: self.is_shut_down(),
        }
    }

    /// Consume the gate and return the cell's final value.
    pub fn into_inner(self) -> T {
        self.cell.into_inner()
    }
}

/// An admitted reader. Dereferences to the shared cell; dropping it leaves
/// the read section.
pub struct ReadGuard<'a, T> {
    gate: &'a RwGate<T>,
}

impl<T> Deref for ReadGuard<'_, T> {
    type Target = T;

    fn deref(&self) -> &T {
        // Safety: the door is held for the active readers while any
        // ReadGuard is alive, so no writer can be touching the cell.
        unsafe { &*self.gate.cell.get() }
    }
}

impl<T> Drop for ReadGuard<'_, T> {
    fn drop(&mut self) {
        self.gate.end_read();
    }
}

/// A writer's announcement at the gate, withdrawn on drop.
struct PendingWriter<'a, T> {
    gate: &'a RwGate<T>,
}

impl<T> Drop for PendingWriter<'_, T> {
    fn drop(&mut self) {
        self.gate.end_write();
    }
}
