// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025-2026 natyamatsya contributors
//
// Circular buffer storage for the bounded channel.
//
// The ring has `C` slots addressed by a write index and a read index, both
// advanced modulo `C`. One slot is always left empty so that the two
// indices alone tell "full" from "empty":
//   - empty: write == read
//   - full:  (write + 1) % C == read
// which leaves `C - 1` usable slots.
//
// The ring does no synchronisation of its own; it is owned by the channel
// state behind the channel's mutex.

/// Smallest slot count that leaves at least one usable slot.
pub const MIN_SLOTS: usize = 2;

/// Advance a ring index by one, wrapping at `slots`.
#[inline]
pub const fn next_index(index: usize, slots: usize) -> usize {
    (index + 1) % slots
}

/// Fixed-capacity circular buffer with one sentinel slot.
pub struct Ring<T> {
    slots: Box<[Option<T>]>,
    write: usize,
    read: usize,
}

impl<T> Ring<T> {
    /// Create a ring with `slots` slots (`slots - 1` usable).
    ///
    /// # Panics
    /// If `slots < MIN_SLOTS`.
    pub fn new(slots: usize) -> Self {
        assert!(slots >= MIN_SLOTS, "ring needs at least {MIN_SLOTS} slots, got {slots}");
        Self {
            slots: (0..slots).map(|_| None).collect(),
            write: 0,
            read: 0,
        }
    }

    /// Total slot count `C`.
    pub fn slots(&self) -> usize {
        self.slots.len()
    }

    /// Usable capacity, `C - 1`.
    pub fn usable(&self) -> usize {
        self.slots.len() - 1
    }

    pub fn is_empty(&self) -> bool {
        self.write == self.read
    }

    pub fn is_full(&self) -> bool {
        next_index(self.write, self.slots.len()) == self.read
    }

    /// Items currently stored.
    pub fn len(&self) -> usize {
        let c = self.slots.len();
        (self.write + c - self.read) % c
    }

    pub fn write_index(&self) -> usize {
        self.write
    }

    pub fn read_index(&self) -> usize {
        self.read
    }

    /// Store `value` at the write index and advance it.
    /// Returns the position written.
    ///
    /// # Panics
    /// If the ring is full; callers wait for space first.
    pub fn push(&mut self, value: T) -> usize {
        assert!(!self.is_full(), "push into a full ring");
        let pos = self.write;
        let slot = &mut self.slots[pos];
        debug_assert!(slot.is_none(), "slot {pos} reused before it was read");
        *slot = Some(value);
        self.write = next_index(pos, self.slots.len());
        pos
    }

    /// Take the value at the read index and advance it.
    /// Returns the position read together with the value.
    ///
    /// # Panics
    /// If the ring is empty; callers wait for data first.
    pub fn pop(&mut self) -> (usize, T) {
        assert!(!self.is_empty(), "pop from an empty ring");
        let pos = self.read;
        let value = match self.slots[pos].take() {
            Some(v) => v,
            None => panic!("slot {pos} is inside the live range but holds no value"),
        };
        self.read = next_index(pos, self.slots.len());
        (pos, value)
    }
}
