// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025-2026 natyamatsya contributors
//
// Condition variable + quit flag used by every protocol in the crate to
// park workers until a predicate over shared state changes.

use std::sync::atomic::{AtomicBool, Ordering};

use parking_lot::{Condvar, MutexGuard};

/// A condition variable paired with a quit flag.
///
/// The state a `Waiter` guards lives in the caller's `parking_lot::Mutex`;
/// every wait is a predicate loop re-checked under that mutex, so spurious
/// wakes and signal/re-acquire races are harmless. A given `Waiter` must
/// always be used with the same mutex.
pub struct Waiter {
    cond: Condvar,
    quit: AtomicBool,
}

impl Waiter {
    pub const fn new() -> Self {
        Self {
            cond: Condvar::new(),
            quit: AtomicBool::new(false),
        }
    }

    /// Block while `pred` holds and quit has not been signalled.
    ///
    /// Returns `true` when the predicate cleared, `false` when the wait
    /// ended because of [`quit_waiting`](Self::quit_waiting).
    pub fn wait_while<T, F>(&self, guard: &mut MutexGuard<'_, T>, mut pred: F) -> bool
    where
        F: FnMut(&mut T) -> bool,
    {
        loop {
            if self.is_quit() {
                return false;
            }
            if !pred(&mut **guard) {
                return true;
            }
            self.cond.wait(guard);
        }
    }

    /// A single wait step, for callers whose predicate has side effects
    /// (e.g. claim-if-free) and therefore write the loop themselves.
    /// Returns `false` if quit was already signalled.
    pub fn wait<T>(&self, guard: &mut MutexGuard<'_, T>) -> bool {
        if self.is_quit() {
            return false;
        }
        self.cond.wait(guard);
        !self.is_quit()
    }

    /// Wake at least one waiter. Call with the guarding mutex held.
    pub fn notify(&self) -> bool {
        self.cond.notify_one()
    }

    /// Wake all waiters. Call with the guarding mutex held.
    pub fn broadcast(&self) -> usize {
        self.cond.notify_all()
    }

    /// Signal quit and wake every waiter.
    ///
    /// The guard is the witness that the caller holds the mutex waiters
    /// re-check under: a waiter is either before its predicate check (and
    /// will see the flag) or parked (and will get the broadcast).
    pub fn quit_waiting<T>(&self, _held: &MutexGuard<'_, T>) -> usize {
        self.quit.store(true, Ordering::Release);
        self.cond.notify_all()
    }

    pub fn is_quit(&self) -> bool {
        self.quit.load(Ordering::Acquire)
    }
}

impl Default for Waiter {
    fn default() -> Self {
        Self::new()
    }
}
