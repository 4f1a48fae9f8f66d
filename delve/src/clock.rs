//! Sampled game time
//!
//! Nothing in the core is scheduled. Every periodic behavior samples a
//! [`Clock`] when `update()` is called and compares against [`Interval`]s.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;

/// Source of the current game time in seconds
pub trait Clock: Send {
    fn now(&self) -> f64;
}

/// Wall-clock time since the clock was created
#[derive(Debug, Clone)]
pub struct SystemClock {
    started: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            started: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now(&self) -> f64 {
        self.started.elapsed().as_secs_f64()
    }
}

/// Manually driven clock. Clones share the same time.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    bits: Arc<AtomicU64>,
}

impl ManualClock {
    /// Create a clock at time zero
    pub fn new() -> Self {
        Self::default()
    }

    /// Jump to an absolute time
    pub fn set(&self, secs: f64) {
        self.bits.store(secs.to_bits(), Ordering::SeqCst);
    }

    /// Move time forward
    pub fn advance(&self, secs: f64) {
        self.set(self.now() + secs);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> f64 {
        f64::from_bits(self.bits.load(Ordering::SeqCst))
    }
}

/// A recurring interval checked against sampled time
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Interval {
    /// Seconds between firings
    pub every: f64,
    /// Last time the interval fired, if ever
    pub last: Option<f64>,
}

impl Interval {
    /// Interval that is due immediately
    pub fn new(every: f64) -> Self {
        Self { every, last: None }
    }

    /// Interval whose first firing is one period after `start`
    pub fn starting_at(every: f64, start: f64) -> Self {
        Self {
            every,
            last: Some(start),
        }
    }

    /// Check if the interval is due at `now`
    pub fn is_due(&self, now: f64) -> bool {
        match self.last {
            None => true,
            Some(last) => now - last >= self.every,
        }
    }

    /// Record a firing at `now`
    pub fn reset(&mut self, now: f64) {
        self.last = Some(now);
    }

    /// Fire if due, returning whether it fired
    pub fn fire(&mut self, now: f64) -> bool {
        if self.is_due(now) {
            self.reset(now);
            true
        } else {
            false
        }
    }
}
