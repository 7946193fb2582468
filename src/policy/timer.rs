use std::cell::Cell;
use std::rc::Rc;
use std::time::Duration;
use std::time::Instant;

/// Source of monotonic time for timers.
pub trait Clock {
    fn now(&self) -> Duration;
}

pub struct SystemClock {
    epoch: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            epoch: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now(&self) -> Duration {
        self.epoch.elapsed()
    }
}

/// A manually advanced clock; clones share the same time.
#[derive(Clone, Default)]
pub struct FakeClock {
    now: Rc<Cell<Duration>>,
}

impl FakeClock {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn advance(
        &self,
        by: Duration,
    ) {
        self.now.set(self.now.get() + by);
    }
}

impl Clock for FakeClock {
    fn now(&self) -> Duration {
        self.now.get()
    }
}

/// A one-shot timer with a firing window of `[min, max]` after it was
/// started. The dispatcher polls it; it fires at the earliest poll past `min`.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Timer {
    min: Duration,
    max: Duration,
    started: Option<Duration>,
}

impl Timer {
    pub fn new(
        min: Duration,
        max: Duration,
    ) -> Self {
        Self {
            min,
            max: std::cmp::max(min, max),
            started: None,
        }
    }

    pub fn set_times(
        &mut self,
        min: Duration,
        max: Duration,
    ) {
        self.min = min;
        self.max = std::cmp::max(min, max);
    }

    #[inline]
    pub fn active(&self) -> bool {
        self.started.is_some()
    }

    pub fn start(
        &mut self,
        now: Duration,
    ) {
        self.started = Some(now);
    }

    pub fn stop(&mut self) {
        self.started = None;
    }

    /// The latest moment the timer should fire, on the clock it was started
    /// with.
    pub fn deadline(&self) -> Option<Duration> {
        self.started.map(|started| started + self.max)
    }

    pub fn is_due(
        &self,
        now: Duration,
    ) -> bool {
        match self.started {
            Some(started) => now.saturating_sub(started) >= self.min,
            None => false,
        }
    }

    /// Stop the timer and report whether it was due.
    pub fn fire(
        &mut self,
        now: Duration,
    ) -> bool {
        if self.is_due(now) {
            self.stop();
            true
        } else {
            false
        }
    }
}
