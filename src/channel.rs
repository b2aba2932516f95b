// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025-2026 natyamatsya contributors
//
// Bounded multi-producer / multi-consumer channel over a circular buffer,
// with a coordinated two-phase shutdown.
//
// All state (ring indices, slots, shutdown flag) sits behind one mutex.
// Producers park on `not_full` while the ring is full, consumers park on
// `not_empty` while it is empty and shutdown has not been signalled.
//
// Shutdown protocol:
//   1. every producer reaches its quota and stops;
//   2. the coordinator joins them and calls `signal_shutdown`, which sets
//      the flag and broadcasts `not_empty` in the same critical section;
//   3. consumers drain whatever is still buffered (emptiness is checked
//      before the flag) and then exit.

use std::sync::Arc;

use parking_lot::Mutex;

use crate::circ::Ring;
use crate::{Waiter, WorkerId};

struct ChanState<T> {
    ring: Ring<T>,
    shutdown: bool,
}

/// Fixed-capacity FIFO shared by producer and consumer workers.
pub struct BoundedChannel<T> {
    state: Mutex<ChanState<T>>,
    not_full: Waiter,  // producers block here when the ring is full
    not_empty: Waiter, // consumers block here when the ring is empty
}

impl<T: Send> BoundedChannel<T> {
    /// Create a channel over a ring of `capacity` slots (`capacity - 1`
    /// usable).
    ///
    /// # Panics
    /// If `capacity < 2`.
    pub fn new(capacity: usize) -> Self {
        Self {
            state: Mutex::new(ChanState {
                ring: Ring::new(capacity),
                shutdown: false,
            }),
            not_full: Waiter::new(),
            not_empty: Waiter::new(),
        }
    }

    /// Write `value` into the next slot, blocking while the ring is full.
    /// Wakes one blocked consumer. Returns the slot position written.
    pub fn produce(&self, worker: WorkerId, value: T) -> usize {
        let mut state = self.state.lock();
        debug_assert!(!state.shutdown, "produce after shutdown");
        self.not_full.wait_while(&mut state, |s| s.ring.is_full());
        let pos = state.ring.push(value);
        tracing::trace!(producer = %worker, pos, "slot written");
        self.not_empty.notify();
        pos
    }

    /// Take the oldest value, blocking while the ring is empty.
    ///
    /// Returns `None` once shutdown has been signalled and nothing is left
    /// to drain; the calling worker should exit. Otherwise wakes one
    /// blocked producer and returns `(position, value)`.
    pub fn consume(&self, worker: WorkerId) -> Option<(usize, T)> {
        let mut state = self.state.lock();
        self.not_empty
            .wait_while(&mut state, |s| s.ring.is_empty() && !s.shutdown);
        if state.ring.is_empty() {
            tracing::trace!(consumer = %worker, "shutdown observed on empty ring");
            return None;
        }
        let (pos, value) = state.ring.pop();
        tracing::trace!(consumer = %worker, pos, "slot read");
        self.not_full.notify();
        Some((pos, value))
    }

    /// Mark production finished and release every parked consumer.
    ///
    /// Setting the flag and broadcasting happen under the state mutex, so a
    /// consumer between its emptiness check and its wait cannot miss the
    /// wake. Returns `true` on the call that actually set the flag.
    pub fn signal_shutdown(&self) -> bool {
        let mut state = self.state.lock();
        if state.shutdown {
            tracing::warn!("shutdown already signalled");
            return false;
        }
        state.shutdown = true;
        let woken = self.not_empty.broadcast();
        tracing::debug!(buffered = state.ring.len(), woken, "channel shutdown signalled");
        true
    }

    pub fn is_shutdown(&self) -> bool {
        self.state.lock().shutdown
    }

    /// Items currently buffered.
    pub fn len(&self) -> usize {
        self.state.lock().ring.len()
    }

    pub fn is_empty(&self) -> bool {
        self.state.lock().ring.is_empty()
    }

    /// Slot count `C`.
    pub fn capacity(&self) -> usize {
        self.state.lock().ring.slots()
    }

    /// Items that fit at once, `C - 1`.
    pub fn usable(&self) -> usize {
        self.state.lock().ring.usable()
    }

    /// Current `(write_index, read_index)`.
    pub fn indices(&self) -> (usize, usize) {
        let state = self.state.lock();
        (state.ring.write_index(), state.ring.read_index())
    }

    /// Handle for producer `id`.
    pub fn producer(self: &Arc<Self>, id: WorkerId) -> Producer<T> {
        Producer {
            chan: Arc::clone(self),
            id,
            produced: 0,
        }
    }

    /// Handle for consumer `id`.
    pub fn consumer(self: &Arc<Self>, id: WorkerId) -> Consumer<T> {
        Consumer {
            chan: Arc::clone(self),
            id,
            consumed: 0,
        }
    }
}

// ---------------------------------------------------------------------------
// Worker handles
// ---------------------------------------------------------------------------

/// A producer's view of the channel. Owns its own production count.
pub struct Producer<T> {
    chan: Arc<BoundedChannel<T>>,
    id: WorkerId,
    produced: usize,
}

impl<T: Send> Producer<T> {
    pub fn id(&self) -> WorkerId {
        self.id
    }

    /// Items this producer has emitted so far.
    pub fn produced(&self) -> usize {
        self.produced
    }

    /// See [`BoundedChannel::produce`].
    pub fn produce(&mut self, value: T) -> usize {
        let pos = self.chan.produce(self.id, value);
        self.produced += 1;
        pos
    }
}

/// A consumer's view of the channel.
pub struct Consumer<T> {
    chan: Arc<BoundedChannel<T>>,
    id: WorkerId,
    consumed: usize,
}

impl<T: Send> Consumer<T> {
    pub fn id(&self) -> WorkerId {
        self.id
    }

    pub fn consumed(&self) -> usize {
        self.consumed
    }

    /// See [`BoundedChannel::consume`].
    pub fn consume(&mut self) -> Option<(usize, T)> {
        let item = self.chan.consume(self.id)?;
        self.consumed += 1;
        Some(item)
    }
}
