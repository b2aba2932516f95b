// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025-2026 natyamatsya contributors
//
// RAII guard that holds an ExclusionLock for the lifetime of an access.

use crate::ExclusionLock;

/// RAII guard: locks on construction, unlocks on drop.
pub struct ScopedAccess<'a> {
    lock: &'a ExclusionLock,
}

impl<'a> ScopedAccess<'a> {
    /// Create a new scoped access guard. Blocks until `lock` is acquired.
    pub fn new(lock: &'a ExclusionLock) -> Self {
        lock.lock();
        Self { lock }
    }

    /// Non-blocking variant; `None` if the lock is currently held.
    pub fn try_new(lock: &'a ExclusionLock) -> Option<Self> {
        lock.try_lock().then_some(Self { lock })
    }
}

impl Drop for ScopedAccess<'_> {
    fn drop(&mut self) {
        self.lock.unlock();
    }
}
