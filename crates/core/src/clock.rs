//! Wall-clock access.
//!
//! Everything that needs "now" receives it either as an explicit `Time`
//! argument or through a [`Clock`] held by the caller. Nothing reads the
//! system clock implicitly.

use std::cell::Cell;

use chrono::{Duration, Utc};

use crate::Time;

/// Source of the current instant.
pub trait Clock {
    /// Current instant.
    fn now(&self) -> Time;
}

/// The real wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Time {
        Utc::now()
    }
}

/// A clock that only moves when told to.
#[derive(Debug, Clone)]
pub struct ManualClock {
    now: Cell<Time>,
}

impl ManualClock {
    /// Create a clock frozen at `now`.
    pub fn new(now: Time) -> Self {
        Self { now: Cell::new(now) }
    }

    /// Jump to an absolute instant.
    pub fn set(&self, now: Time) {
        self.now.set(now);
    }

    /// Move forward (or backward, with a negative duration).
    pub fn advance(&self, by: Duration) {
        self.now.set(self.now.get() + by);
    }

    /// Move forward by whole minutes.
    pub fn advance_minutes(&self, minutes: i64) {
        self.advance(Duration::minutes(minutes));
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Time {
        self.now.get()
    }
}

impl<C: Clock + ?Sized> Clock for &C {
    fn now(&self) -> Time {
        (**self).now()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manual_clock_advances() {
        let start = Utc::now();
        let clock = ManualClock::new(start);
        assert_eq!(clock.now(), start);

        clock.advance_minutes(61);
        assert_eq!(clock.now(), start + Duration::minutes(61));

        clock.set(start);
        assert_eq!(clock.now(), start);
    }
}
