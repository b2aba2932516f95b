// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025-2026 natyamatsya contributors
//
// Three classic coordination protocols over shared, mutable state:
// a bounded producer/consumer channel with two-phase shutdown, a
// writer-preferring reader/writer gate, and deadlock-free acquisition of
// resource pairs around a ring of workers.

mod worker;
pub use worker::{Role, WorkerId};

mod waiter;
pub use waiter::Waiter;

mod mutex;
pub use mutex::ExclusionLock;

mod scoped_access;
pub use scoped_access::ScopedAccess;

pub mod circ;
pub use circ::Ring;

pub mod channel;
pub use channel::{BoundedChannel, Consumer, Producer};

pub mod rw_gate;
pub use rw_gate::{GateSnapshot, ReadGuard, RwGate};

pub mod table;
pub use table::{PairWorker, ResourceRing, WorkerState};

pub mod pacing;
pub use pacing::{Jitter, Pacing};

pub mod config;
pub use config::Config;

mod error;
pub use error::{ConfigError, RunError};

pub mod harness;
