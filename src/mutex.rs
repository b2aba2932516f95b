// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025-2026 natyamatsya contributors
//
// Binary exclusion lock with explicit lock/unlock.
// Unlike a guard-based mutex, the thread that releases it need not be the
// one that acquired it: the reader/writer gate relies on this ("first
// reader in closes the door, last reader out opens it").

use parking_lot::Mutex;

use crate::Waiter;

/// A binary, non-owning exclusion lock.
///
/// Built from a `parking_lot::Mutex<bool>` (held flag) and a [`Waiter`]
/// that parks contenders until the flag clears.
pub struct ExclusionLock {
    held: Mutex<bool>,
    released: Waiter,
}

impl ExclusionLock {
    /// Create a new, released lock.
    pub const fn new() -> Self {
        Self {
            held: Mutex::new(false),
            released: Waiter::new(),
        }
    }

    /// Acquire the lock, blocking while it is held by anyone.
    pub fn lock(&self) {
        let mut held = self.held.lock();
        self.released.wait_while(&mut held, |h| *h);
        *held = true;
    }

    /// Try to acquire the lock without blocking.
    /// Returns `true` if the lock was acquired.
    pub fn try_lock(&self) -> bool {
        let mut held = self.held.lock();
        if *held {
            return false;
        }
        *held = true;
        true
    }

    /// Release the lock. May be called from any thread.
    ///
    /// # Panics
    /// If the lock is not held.
    pub fn unlock(&self) {
        let mut held = self.held.lock();
        assert!(*held, "unlock of an exclusion lock that is not held");
        *held = false;
        self.released.notify();
    }

    pub fn is_locked(&self) -> bool {
        *self.held.lock()
    }
}

impl Default for ExclusionLock {
    fn default() -> Self {
        Self::new()
    }
}
