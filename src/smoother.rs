//! Moving-average smoothing
//!
//! One smoother per electrode. Raw deltas are noisy; the reported value is
//! the arithmetic mean of the most recent K raw deltas.

use std::collections::VecDeque;

/// Bounded moving-average filter over the most recent K values.
///
/// Eviction is FIFO: when a new value would exceed the window, the oldest
/// retained value is dropped from the front, never the incoming one.
#[derive(Debug, Clone)]
pub struct Smoother {
    window: VecDeque<f64>,
    capacity: usize,
}

impl Smoother {
    /// Create a smoother with window size `capacity` (must be >= 1; the
    /// config layer validates this before construction).
    pub fn new(capacity: usize) -> Self {
        debug_assert!(capacity >= 1);
        Self {
            window: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Absorb a new raw value and return the mean of the retained window.
    pub fn update(&mut self, value: f64) -> f64 {
        self.window.push_back(value);
        while self.window.len() > self.capacity {
            self.window.pop_front();
        }
        let sum: f64 = self.window.iter().sum();
        sum / self.window.len() as f64
    }

    /// Drop all retained values.
    pub fn reset(&mut self) {
        self.window.clear();
    }
}
