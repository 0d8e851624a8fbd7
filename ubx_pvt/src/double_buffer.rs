//! Two-slot handoff between one producer and any number of readers.
//!
//! The producer always writes into the slot readers are not looking at and
//! then flips which slot is exposed. Readers copy the exposed slot out under
//! the same lock, so a reader never observes a half-written value and the
//! producer never waits for a slow reader. There is no queue: a reader that
//! falls behind sees only the newest value, and the generation counter
//! tells it how many it missed.

use std::{
    sync::{Condvar, Mutex, MutexGuard},
    time::{Duration, Instant},
};

/// One of the two storage slots
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Slot {
    A,
    B,
}

impl Slot {
    pub fn other(self) -> Self {
        match self {
            Slot::A => Slot::B,
            Slot::B => Slot::A,
        }
    }

    fn index(self) -> usize {
        match self {
            Slot::A => 0,
            Slot::B => 1,
        }
    }
}

/// A copy of the most recently published value
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot<T> {
    pub value: T,
    /// Slot the value was copied from
    pub slot: Slot,
    /// Number of publishes up to and including this value, starting at 1
    pub generation: u64,
}

struct State<T> {
    slots: [T; 2],
    /// Slot most recently exposed to readers
    front: Slot,
    generation: u64,
}

impl<T: Clone> State<T> {
    fn snapshot(&self) -> Option<Snapshot<T>> {
        (self.generation > 0).then(|| Snapshot {
            value: self.slots[self.front.index()].clone(),
            slot: self.front,
            generation: self.generation,
        })
    }
}

pub struct DoubleBuffer<T> {
    state: Mutex<State<T>>,
    updated: Condvar,
}

impl<T: Default + Clone> Default for DoubleBuffer<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T> DoubleBuffer<T> {
    /// Both slots start as `initial`; nothing is readable until the first publish
    pub fn new(initial: T) -> Self
    where
        T: Clone,
    {
        Self {
            state: Mutex::new(State {
                slots: [initial.clone(), initial],
                front: Slot::B,
                generation: 0,
            }),
            updated: Condvar::new(),
        }
    }

    // The guarded data is plain values, a panicking holder cannot leave it inconsistent
    fn lock(&self) -> MutexGuard<'_, State<T>> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Stores `value` in the back slot and exposes it. Returns the new generation.
    pub fn publish(&self, value: T) -> u64 {
        let generation = {
            let mut state = self.lock();
            let back = state.front.other();
            state.slots[back.index()] = value;
            state.front = back;
            state.generation += 1;
            state.generation
        };
        self.updated.notify_all();
        generation
    }

    /// Generation of the exposed value, 0 before the first publish
    pub fn generation(&self) -> u64 {
        self.lock().generation
    }
}

impl<T: Clone> DoubleBuffer<T> {
    /// Copy of the most recently published value, `None` before the first publish
    pub fn snapshot(&self) -> Option<Snapshot<T>> {
        self.lock().snapshot()
    }

    /// Waits until a value newer than `after_generation` has been published
    /// or `timeout` expires. Returns `None` on timeout.
    pub fn wait_for_update(&self, after_generation: u64, timeout: Duration) -> Option<Snapshot<T>> {
        let deadline = Instant::now() + timeout;
        let mut state = self.lock();
        while state.generation <= after_generation {
            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                return None;
            }
            state = match self.updated.wait_timeout(state, remaining) {
                Ok((guard, _)) => guard,
                Err(e) => e.into_inner().0,
            };
        }
        state.snapshot()
    }
}
