//! Task Gate
//!
//! Counting permits that bound how many recursive branches may run
//! concurrently. Acquisition never blocks: a caller without a permit does the
//! work itself, in-thread.

use std::sync::atomic::{AtomicUsize, Ordering};

/// Lock-free counting gate
#[derive(Debug)]
pub struct TaskGate {
    available: AtomicUsize,
    capacity: usize,
}

/// A held permit; returned to the gate on drop
#[derive(Debug)]
pub struct Permit<'a> {
    gate: &'a TaskGate,
}

impl TaskGate {
    /// Create a gate with `permits` concurrent slots
    pub fn new(permits: usize) -> Self {
        Self {
            available: AtomicUsize::new(permits),
            capacity: permits,
        }
    }

    /// Take a permit if one is free
    pub fn try_acquire(&self) -> Option<Permit<'_>> {
        self.available
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |n| n.checked_sub(1))
            .ok()
            .map(|_| Permit { gate: self })
    }

    /// Permits not currently held
    pub fn available(&self) -> usize {
        self.available.load(Ordering::Acquire)
    }

    /// Total permits
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl Drop for Permit<'_> {
    fn drop(&mut self) {
        self.gate.available.fetch_add(1, Ordering::AcqRel);
    }
}
