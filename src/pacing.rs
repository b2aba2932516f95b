// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025-2026 natyamatsya contributors
//
// Pseudo-random pacing for the demo workers: a per-worker LCG seeded from
// the wall clock, and the "think for 1..=5 ticks" delay every worker takes
// before acting.

use std::thread;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use crate::WorkerId;

/// Per-worker seed spread, so workers started in the same instant diverge.
const SEED_SPREAD: u64 = 12345;

/// Small linear congruential generator. One per worker; never shared.
#[derive(Debug, Clone)]
pub struct Jitter {
    state: u64,
}

impl Jitter {
    pub const fn new(seed: u64) -> Self {
        Self { state: seed }
    }

    /// Seed from the wall clock mixed with the worker index.
    pub fn from_clock(worker: WorkerId) -> Self {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_nanos() as u64;
        Self::new(now.wrapping_add(worker.index() as u64 * SEED_SPREAD))
    }

    pub fn next_u32(&mut self) -> u32 {
        self.state = self
            .state
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        (self.state >> 33) as u32
    }

    /// Uniform-ish value in `1..=max`.
    pub fn one_to(&mut self, max: u32) -> u32 {
        debug_assert!(max > 0);
        self.next_u32() % max + 1
    }
}

/// Delay taken before each worker action: `(1..=5) * tick`.
/// A zero tick only yields, which is what the tests use.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pacing {
    tick: Duration,
}

impl Pacing {
    pub const MAX_TICKS: u32 = 5;

    pub const fn new(tick: Duration) -> Self {
        Self { tick }
    }

    pub const fn from_millis(ms: u64) -> Self {
        Self::new(Duration::from_millis(ms))
    }

    /// No delay at all; workers only yield between actions.
    pub const fn immediate() -> Self {
        Self::new(Duration::ZERO)
    }

    pub fn tick(&self) -> Duration {
        self.tick
    }

    /// The delay the next pause would take for a given draw.
    pub fn delay_for(&self, draw: u32) -> Duration {
        self.tick * (draw % Self::MAX_TICKS + 1)
    }

    pub fn pause(&self, jitter: &mut Jitter) {
        if self.tick.is_zero() {
            thread::yield_now();
            return;
        }
        thread::sleep(self.delay_for(jitter.next_u32()));
    }
}

impl Default for Pacing {
    fn default() -> Self {
        Self::from_millis(100)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn delay_spans_one_to_five_ticks() {
        let p = Pacing::from_millis(100);
        assert_eq!(p.delay_for(0), Duration::from_millis(100));
        assert_eq!(p.delay_for(4), Duration::from_millis(500));
        assert_eq!(p.delay_for(5), Duration::from_millis(100));
    }

    #[test]
    fn one_to_stays_in_range() {
        let mut j = Jitter::new(42);
        for _ in 0..1000 {
            let v = j.one_to(10);
            assert!((1..=10).contains(&v));
        }
    }

    #[test]
    fn same_seed_same_sequence() {
        let mut a = Jitter::new(7);
        let mut b = Jitter::new(7);
        for _ in 0..16 {
            assert_eq!(a.next_u32(), b.next_u32());
        }
    }

    #[test]
    fn clock_seeds_differ_per_worker() {
        let mut a = Jitter::from_clock(WorkerId(0));
        let mut b = Jitter::from_clock(WorkerId(1));
        let sa: Vec<_> = (0..4).map(|_| a.next_u32()).collect();
        let sb: Vec<_> = (0..4).map(|_| b.next_u32()).collect();
        assert_ne!(sa, sb);
    }
}
