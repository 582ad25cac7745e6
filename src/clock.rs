//! Time source for cache freshness and era windows.
//!
//! Everything that reads the current time goes through [`Clock`] so cache
//! expiry can be exercised without sleeping.

use chrono::Datelike;
use std::sync::Mutex;
use std::time::{Duration, Instant};

pub trait Clock: Send + Sync {
    /// Monotonic instant used for entry age comparisons
    fn now(&self) -> Instant;

    /// Calendar year used to anchor the release-date windows
    fn current_year(&self) -> i32;
}

/// Production clock backed by `Instant` and the local calendar
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }

    fn current_year(&self) -> i32 {
        chrono::Local::now().year()
    }
}

/// Hand-driven clock. Time only moves when [`ManualClock::advance`] is called.
#[derive(Debug)]
pub struct ManualClock {
    now: Mutex<Instant>,
    year: i32,
}

impl ManualClock {
    pub fn new(year: i32) -> Self {
        Self {
            now: Mutex::new(Instant::now()),
            year,
        }
    }

    pub fn advance(&self, by: Duration) {
        let mut now = self.now.lock().unwrap_or_else(|e| e.into_inner());
        *now += by;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        *self.now.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn current_year(&self) -> i32 {
        self.year
    }
}
