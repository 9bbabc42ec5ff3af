//! Wall-clock source for record timestamps.
//!
//! RULE: Nothing in the core reads the system time directly.
//! Timestamps flow through a Clock so tests can pin them.

use crate::types::Timestamp;
use std::cell::Cell;

pub trait Clock {
    /// Milliseconds since the Unix epoch.
    fn now(&self) -> Timestamp;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Timestamp {
        chrono::Utc::now().timestamp_millis()
    }
}

/// A clock that only moves when told to. Used in tests and replay tooling.
#[derive(Debug, Default)]
pub struct ManualClock {
    current: Cell<Timestamp>,
}

impl ManualClock {
    pub fn starting_at(at: Timestamp) -> Self {
        Self { current: Cell::new(at) }
    }

    pub fn set(&self, at: Timestamp) {
        self.current.set(at);
    }

    pub fn advance(&self, millis: i64) -> Timestamp {
        let next = self.current.get() + millis;
        self.current.set(next);
        next
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Timestamp {
        self.current.get()
    }
}

impl<T: Clock + ?Sized> Clock for &T {
    fn now(&self) -> Timestamp {
        (**self).now()
    }
}
