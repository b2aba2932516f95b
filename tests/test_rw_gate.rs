// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025-2026 natyamatsya contributors
//
// Tests for RwGate: concurrent readers, exclusive writers, writer priority
// over newly arriving readers, and shutdown.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Barrier};
use std::thread;
use std::time::{Duration, Instant};

use libcoord::config::GateConfig;
use libcoord::harness::GateService;
use libcoord::{Pacing, RwGate};

/// Poll `cond` until it holds, failing the test after a few seconds.
fn wait_until(what: &str, cond: impl Fn() -> bool) {
    let deadline = Instant::now() + Duration::from_secs(5);
    while !cond() {
        assert!(Instant::now() < deadline, "timed out waiting for {what}");
        thread::sleep(Duration::from_millis(1));
    }
}

#[test]
fn write_returns_previous_value() {
    let gate = RwGate::new(1u32);
    assert_eq!(gate.read(|v| *v), Some(1));
    assert_eq!(gate.write(2), 1);
    assert_eq!(gate.read(|v| *v), Some(2));
    let updated = gate.update(|v| {
        *v += 5;
        *v
    });
    assert_eq!(updated, 7);
    assert_eq!(gate.into_inner(), 7);
}

#[test]
fn guard_tracks_active_readers() {
    let gate = RwGate::new(());
    let a = gate.begin_read().unwrap();
    let b = gate.begin_read().unwrap();
    assert_eq!(gate.snapshot().active_readers, 2);
    drop(a);
    assert_eq!(gate.snapshot().active_readers, 1);
    drop(b);
    assert_eq!(gate.snapshot().active_readers, 0);
}

// All readers must be inside at once for the barrier to open.
#[test]
fn readers_proceed_concurrently() {
    let gate = Arc::new(RwGate::new(5u32));
    let num_readers = 4;
    let inside = Arc::new(Barrier::new(num_readers + 1));
    let leave = Arc::new(Barrier::new(num_readers + 1));

    let handles: Vec<_> = (0..num_readers)
        .map(|_| {
            let gate = Arc::clone(&gate);
            let inside = Arc::clone(&inside);
            let leave = Arc::clone(&leave);
            thread::spawn(move || {
                let guard = gate.begin_read().unwrap();
                inside.wait();
                leave.wait();
                *guard
            })
        })
        .collect();

    inside.wait();
    assert_eq!(gate.snapshot().active_readers, num_readers);
    leave.wait();

    for h in handles {
        assert_eq!(h.join().unwrap(), 5);
    }
    assert_eq!(gate.snapshot().active_readers, 0);
}

#[test]
fn writer_waits_for_admitted_readers() {
    let gate = Arc::new(RwGate::new(0u32));
    let written = Arc::new(AtomicBool::new(false));

    let guard = gate.begin_read().unwrap();

    let g2 = Arc::clone(&gate);
    let w2 = Arc::clone(&written);
    let writer = thread::spawn(move || {
        g2.write(9);
        w2.store(true, Ordering::SeqCst);
    });

    wait_until("writer to announce itself", || gate.snapshot().writers_pending == 1);
    thread::sleep(Duration::from_millis(50));
    assert!(!written.load(Ordering::SeqCst));
    assert_eq!(*guard, 0);

    drop(guard);
    writer.join().unwrap();
    assert!(written.load(Ordering::SeqCst));
    assert_eq!(gate.read(|v| *v), Some(9));
}

// A reader arriving after a writer announced itself is held at the gate
// until that writer is done, even though other readers are still inside.
#[test]
fn reader_arriving_after_writer_waits_for_it() {
    let gate = Arc::new(RwGate::new(0u32));
    let admitted = Arc::new(AtomicBool::new(false));

    let early = gate.begin_read().unwrap();

    let g2 = Arc::clone(&gate);
    let writer = thread::spawn(move || {
        g2.write(77);
    });
    wait_until("writer to announce itself", || gate.snapshot().writers_pending == 1);

    let g3 = Arc::clone(&gate);
    let a3 = Arc::clone(&admitted);
    let late = thread::spawn(move || {
        let guard = g3.begin_read().unwrap();
        a3.store(true, Ordering::SeqCst);
        *guard
    });

    thread::sleep(Duration::from_millis(50));
    assert!(!admitted.load(Ordering::SeqCst), "late reader overtook a pending writer");

    drop(early);
    writer.join().unwrap();
    assert_eq!(late.join().unwrap(), 77);
}

// Readers held at the gate wait for every queued writer, not just the first.
#[test]
fn readers_wait_for_all_queued_writers() {
    let gate = Arc::new(RwGate::new(0u32));
    let early = gate.begin_read().unwrap();

    let writers: Vec<_> = [10u32, 20]
        .into_iter()
        .map(|v| {
            let g = Arc::clone(&gate);
            thread::spawn(move || {
                g.write(v);
            })
        })
        .collect();
    wait_until("both writers to queue", || gate.snapshot().writers_pending == 2);

    let g3 = Arc::clone(&gate);
    let late = thread::spawn(move || {
        let guard = g3.begin_read().unwrap();
        (*guard, g3.snapshot().writers_pending)
    });

    thread::sleep(Duration::from_millis(20));
    drop(early);
    for w in writers {
        w.join().unwrap();
    }

    let (value, pending_at_admission) = late.join().unwrap();
    assert_eq!(pending_at_admission, 0);
    assert!(value == 10 || value == 20);
}

#[test]
fn readers_and_writers_never_overlap() {
    let gate = Arc::new(RwGate::new(0u64));
    let readers_inside = Arc::new(AtomicUsize::new(0));
    let writer_inside = Arc::new(AtomicBool::new(false));
    let (num_readers, reads_each) = (6, 300);
    let (num_writers, writes_each) = (3, 100);

    let mut handles = Vec::new();
    for _ in 0..num_readers {
        let gate = Arc::clone(&gate);
        let ri = Arc::clone(&readers_inside);
        let wi = Arc::clone(&writer_inside);
        handles.push(thread::spawn(move || {
            let mut last = 0;
            for _ in 0..reads_each {
                let guard = gate.begin_read().unwrap();
                ri.fetch_add(1, Ordering::SeqCst);
                assert!(!wi.load(Ordering::SeqCst), "reader inside while writing");
                assert!(*guard >= last, "cell went backwards");
                last = *guard;
                ri.fetch_sub(1, Ordering::SeqCst);
                drop(guard);
                thread::yield_now();
            }
        }));
    }
    for _ in 0..num_writers {
        let gate = Arc::clone(&gate);
        let ri = Arc::clone(&readers_inside);
        let wi = Arc::clone(&writer_inside);
        handles.push(thread::spawn(move || {
            for _ in 0..writes_each {
                gate.update(|v| {
                    assert!(!wi.swap(true, Ordering::SeqCst), "two writers inside");
                    assert_eq!(ri.load(Ordering::SeqCst), 0, "writer inside with readers");
                    *v += 1;
                    wi.store(false, Ordering::SeqCst);
                });
                thread::yield_now();
            }
        }));
    }

    for h in handles {
        h.join().unwrap();
    }
    assert_eq!(gate.update(|v| *v), (num_writers * writes_each) as u64);
    let snap = gate.snapshot();
    assert_eq!((snap.active_readers, snap.writers_pending), (0, 0));
}

#[test]
fn shutdown_releases_readers_parked_at_gate() {
    let gate = Arc::new(RwGate::new(0u32));
    let early = gate.begin_read().unwrap();

    let g2 = Arc::clone(&gate);
    let writer = thread::spawn(move || g2.write(1));
    wait_until("writer to announce itself", || gate.snapshot().writers_pending == 1);

    let parked: Vec<_> = (0..3)
        .map(|_| {
            let g = Arc::clone(&gate);
            thread::spawn(move || g.begin_read().map(|guard| *guard))
        })
        .collect();

    thread::sleep(Duration::from_millis(50));
    gate.shutdown();
    for p in parked {
        assert_eq!(p.join().unwrap(), None);
    }

    // The queued writer still completes once the admitted reader leaves.
    drop(early);
    assert_eq!(writer.join().unwrap(), 0);

    assert!(gate.snapshot().shut_down);
    assert!(gate.begin_read().is_none());
    assert_eq!(gate.update(|v| *v), 1);
}

// A writer that panics mid-update must still reopen the gate and the door.
#[test]
fn panicking_writer_reopens_gate() {
    let gate = Arc::new(RwGate::new(3u32));

    let g2 = Arc::clone(&gate);
    let result = thread::spawn(move || g2.update(|_| panic!("writer failed"))).join();
    assert!(result.is_err());

    let snap = gate.snapshot();
    assert_eq!((snap.active_readers, snap.writers_pending), (0, 0));

    let g3 = Arc::clone(&gate);
    let reader = thread::spawn(move || g3.read(|v| *v));
    wait_until("reader to finish", || reader.is_finished());
    assert_eq!(reader.join().unwrap(), Some(3));

    assert_eq!(gate.write(4), 3);
}

#[test]
fn service_stops_cleanly() {
    let config = GateConfig {
        reader_count: 4,
        writer_count: 2,
    };
    let service = GateService::start(&config, Pacing::immediate()).expect("start");
    wait_until("a first write", || service.gate().update(|v| *v) != 0);

    let report = service.stop().expect("stop");
    assert_eq!(report.reads.len(), 4);
    assert_eq!(report.writes.len(), 2);
    assert!(report.writes.iter().sum::<usize>() > 0);
    assert!((1..=100).contains(&report.final_value));
}
