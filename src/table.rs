// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025-2026 natyamatsya contributors
//
// Pairwise resource acquisition around a ring of workers ("dining
// philosophers") with release-on-partial-failure deadlock avoidance.
//
// Worker `i` needs resource `i` (left) and resource `(i + 1) % k` (right).
// The left resource is acquired blocking; the right one is only tried. If
// it is taken, the left one is handed back before the worker goes back to
// thinking, so no worker ever waits while holding part of its pair and
// circular wait cannot form. The price is possible livelock under an
// adversarial schedule; progress is not guaranteed starvation-free.
//
// All resource flags share one mutex. Each resource has its own waiter,
// parked on only by the worker whose left resource it is.

use parking_lot::Mutex;

use crate::pacing::{Jitter, Pacing};
use crate::{Waiter, WorkerId};

struct Holders {
    holder: Vec<Option<WorkerId>>,
}

impl Holders {
    fn claim(&mut self, resource: usize, worker: WorkerId) -> bool {
        let slot = &mut self.holder[resource];
        if slot.is_some() {
            return false;
        }
        *slot = Some(worker);
        true
    }

    fn release(&mut self, resource: usize, worker: WorkerId) {
        let slot = &mut self.holder[resource];
        assert_eq!(
            *slot,
            Some(worker),
            "worker {worker} released resource {resource} it does not hold"
        );
        *slot = None;
    }
}

/// `k` binary resources arranged in a cycle.
pub struct ResourceRing {
    state: Mutex<Holders>,
    freed: Box<[Waiter]>,
}

impl ResourceRing {
    /// Create `k` available resources.
    ///
    /// # Panics
    /// If `k < 2`.
    pub fn new(k: usize) -> Self {
        assert!(k >= 2, "a resource ring needs at least 2 workers, got {k}");
        Self {
            state: Mutex::new(Holders {
                holder: vec![None; k],
            }),
            freed: (0..k).map(|_| Waiter::new()).collect(),
        }
    }

    /// Number of resources (and workers).
    pub fn len(&self) -> usize {
        self.freed.len()
    }

    pub fn is_empty(&self) -> bool {
        self.freed.is_empty()
    }

    /// # Panics
    /// If `worker` is not seated at this ring.
    pub fn left_of(&self, worker: WorkerId) -> usize {
        self.seat(worker)
    }

    /// # Panics
    /// If `worker` is not seated at this ring.
    pub fn right_of(&self, worker: WorkerId) -> usize {
        (self.seat(worker) + 1) % self.len()
    }

    fn seat(&self, worker: WorkerId) -> usize {
        assert!(
            worker.index() < self.len(),
            "worker {worker} is not seated at a ring of {}",
            self.len()
        );
        worker.index()
    }

    /// Who holds `resource` right now, if anyone.
    pub fn holder(&self, resource: usize) -> Option<WorkerId> {
        self.state.lock().holder[resource]
    }

    /// Block until the worker's left resource is free, then claim it.
    /// The worker holds nothing while it waits.
    pub fn acquire_left(&self, worker: WorkerId) {
        let left = self.left_of(worker);
        let mut state = self.state.lock();
        while !state.claim(left, worker) {
            self.freed[left].wait(&mut state);
        }
    }

    /// Try to claim the worker's right resource without blocking.
    ///
    /// On failure the left resource (which the worker must hold) is
    /// released before returning `false`.
    pub fn acquire_right(&self, worker: WorkerId) -> bool {
        let (left, right) = (self.left_of(worker), self.right_of(worker));
        let mut state = self.state.lock();
        if state.claim(right, worker) {
            return true;
        }
        state.release(left, worker);
        self.freed[left].notify();
        tracing::trace!(worker = %worker, right, "right resource busy, backing off");
        false
    }

    /// Release `resource` and wake the worker whose left resource it is.
    ///
    /// # Panics
    /// If `worker` does not hold `resource`.
    pub fn release(&self, worker: WorkerId, resource: usize) {
        let mut state = self.state.lock();
        state.release(resource, worker);
        self.freed[resource].notify();
    }
}

// ---------------------------------------------------------------------------
// Per-worker state machine
// ---------------------------------------------------------------------------

/// Where a [`PairWorker`] is in its cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkerState {
    Thinking,
    AcquireLeft,
    AcquireRight,
    Eating,
    Release,
    Done,
}

/// One worker of the ring with a fixed round quota.
pub struct PairWorker {
    id: WorkerId,
    quota: usize,
    completed: usize,
    backoffs: usize,
    state: WorkerState,
    jitter: Jitter,
}

impl PairWorker {
    /// A worker that will complete `quota` rounds. A zero quota starts
    /// (and stays) `Done`.
    pub fn new(id: WorkerId, quota: usize, jitter: Jitter) -> Self {
        Self {
            id,
            quota,
            completed: 0,
            backoffs: 0,
            state: if quota == 0 {
                WorkerState::Done
            } else {
                WorkerState::Thinking
            },
            jitter,
        }
    }

    pub fn id(&self) -> WorkerId {
        self.id
    }

    pub fn state(&self) -> WorkerState {
        self.state
    }

    /// Rounds completed so far.
    pub fn completed(&self) -> usize {
        self.completed
    }

    /// Times the worker gave its left resource back because the right one
    /// was taken.
    pub fn backoffs(&self) -> usize {
        self.backoffs
    }

    /// Perform the current state's action and move to the next state.
    /// Returns the new state.
    pub fn step(&mut self, ring: &ResourceRing, pacing: &Pacing) -> WorkerState {
        self.state = match self.state {
            WorkerState::Thinking => {
                pacing.pause(&mut self.jitter);
                WorkerState::AcquireLeft
            }
            WorkerState::AcquireLeft => {
                ring.acquire_left(self.id);
                WorkerState::AcquireRight
            }
            WorkerState::AcquireRight => {
                if ring.acquire_right(self.id) {
                    WorkerState::Eating
                } else {
                    self.backoffs += 1;
                    WorkerState::Thinking
                }
            }
            WorkerState::Eating => {
                self.completed += 1;
                WorkerState::Release
            }
            WorkerState::Release => {
                ring.release(self.id, ring.left_of(self.id));
                ring.release(self.id, ring.right_of(self.id));
                if self.completed >= self.quota {
                    WorkerState::Done
                } else {
                    WorkerState::Thinking
                }
            }
            WorkerState::Done => WorkerState::Done,
        };
        self.state
    }

    /// Drive the worker until it reaches its quota.
    ///
    /// `on_eat` runs while both resources are held, with the round number
    /// just completed (1-based).
    pub fn run<F>(&mut self, ring: &ResourceRing, pacing: &Pacing, mut on_eat: F) -> usize
    where
        F: FnMut(WorkerId, usize),
    {
        while self.state != WorkerState::Done {
            if self.step(ring, pacing) == WorkerState::Release {
                on_eat(self.id, self.completed);
            }
        }
        self.completed
    }
}
