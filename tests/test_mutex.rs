// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025-2026 natyamatsya contributors
//
// Tests for ExclusionLock and ScopedAccess.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use libcoord::{ExclusionLock, ScopedAccess};

#[test]
fn lock_unlock() {
    let lock = ExclusionLock::new();
    assert!(!lock.is_locked());
    lock.lock();
    assert!(lock.is_locked());
    lock.unlock();
    assert!(!lock.is_locked());
}

#[test]
fn try_lock_fails_while_held() {
    let lock = ExclusionLock::new();
    assert!(lock.try_lock());
    assert!(!lock.try_lock());
    lock.unlock();
    assert!(lock.try_lock());
    lock.unlock();
}

#[test]
#[should_panic(expected = "not held")]
fn unlock_unheld_is_a_defect() {
    let lock = ExclusionLock::new();
    lock.unlock();
}

// The thread that releases need not be the one that acquired.
#[test]
fn unlock_from_another_thread() {
    let lock = Arc::new(ExclusionLock::new());
    lock.lock();

    let l2 = Arc::clone(&lock);
    thread::spawn(move || l2.unlock()).join().unwrap();

    assert!(!lock.is_locked());
    assert!(lock.try_lock());
    lock.unlock();
}

#[test]
fn blocked_lock_proceeds_after_release() {
    let lock = Arc::new(ExclusionLock::new());
    let acquired = Arc::new(AtomicBool::new(false));
    lock.lock();

    let l2 = Arc::clone(&lock);
    let a2 = Arc::clone(&acquired);
    let t = thread::spawn(move || {
        l2.lock();
        a2.store(true, Ordering::SeqCst);
        l2.unlock();
    });

    thread::sleep(Duration::from_millis(50));
    assert!(!acquired.load(Ordering::SeqCst));

    lock.unlock();
    t.join().unwrap();
    assert!(acquired.load(Ordering::SeqCst));
}

// A non-atomic read-modify-write under the lock must never lose updates.
#[test]
fn scoped_access_is_exclusive() {
    let lock = Arc::new(ExclusionLock::new());
    let counter = Arc::new(AtomicUsize::new(0));
    let iterations = 1000;

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let lock = Arc::clone(&lock);
            let counter = Arc::clone(&counter);
            thread::spawn(move || {
                for _ in 0..iterations {
                    let _access = ScopedAccess::new(&lock);
                    let v = counter.load(Ordering::Relaxed);
                    counter.store(v + 1, Ordering::Relaxed);
                }
            })
        })
        .collect();

    for h in handles {
        h.join().unwrap();
    }

    assert_eq!(counter.load(Ordering::Relaxed), iterations * 4);
    assert!(!lock.is_locked());
}

#[test]
fn scoped_access_try_new() {
    let lock = ExclusionLock::new();
    {
        let _held = ScopedAccess::new(&lock);
        assert!(ScopedAccess::try_new(&lock).is_none());
    }
    assert!(ScopedAccess::try_new(&lock).is_some());
    assert!(!lock.is_locked());
}
