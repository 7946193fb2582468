use crate::policy::timer::Timer;
use crate::winsys::geometry::Geometry;

use std::time::Duration;

use strum::AsRefStr;

/// Where a window is in the resize acknowledgement handshake.
#[derive(Debug, Copy, Clone, PartialEq, Eq, AsRefStr)]
pub enum SyncPhase {
    Idle,
    Requested,
    Acknowledged,
    TimedOut,
}

/// Per-window state of the resize sync handshake.
///
/// While `Requested`, every geometry change lands in the single in-flight
/// slot; the last one written is what gets committed on acknowledgement or
/// timeout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncState {
    phase: SyncPhase,
    counter_ready: bool,
    value: u64,
    in_flight: Option<Geometry>,
    timer: Timer,
}

impl SyncState {
    pub const DEFAULT_TIMEOUT_MIN: Duration = Duration::from_millis(1000);
    pub const DEFAULT_TIMEOUT_MAX: Duration = Duration::from_millis(1200);

    pub fn new(
        timeout_min: Duration,
        timeout_max: Duration,
    ) -> Self {
        Self {
            phase: SyncPhase::Idle,
            counter_ready: false,
            value: 0,
            in_flight: None,
            timer: Timer::new(timeout_min, timeout_max),
        }
    }

    #[inline]
    pub fn phase(&self) -> SyncPhase {
        self.phase
    }

    #[inline]
    pub fn is_pending(&self) -> bool {
        self.phase == SyncPhase::Requested
    }

    #[inline]
    pub fn in_flight(&self) -> Option<Geometry> {
        self.in_flight
    }

    #[inline]
    pub fn value(&self) -> u64 {
        self.value
    }

    #[inline]
    pub fn is_counter_ready(&self) -> bool {
        self.counter_ready
    }

    pub fn set_counter_ready(
        &mut self,
        initial: u64,
    ) {
        self.counter_ready = true;
        self.value = initial;
    }

    pub fn set_timeouts(
        &mut self,
        timeout_min: Duration,
        timeout_max: Duration,
    ) {
        self.timer.set_times(timeout_min, timeout_max);
    }

    /// Enter `Requested` with `geometry` in flight, returning the counter
    /// value to send. Returns `None` while a request is already outstanding,
    /// in which case only the in-flight geometry is replaced.
    pub fn request(
        &mut self,
        geometry: Geometry,
        now: Duration,
    ) -> Option<u64> {
        if self.is_pending() {
            self.in_flight = Some(geometry);
            return None;
        }

        let value = self.value;
        self.value = self.value.wrapping_add(1);
        self.phase = SyncPhase::Requested;
        self.in_flight = Some(geometry);

        if !self.timer.active() {
            self.timer.start(now);
        }

        Some(value)
    }

    /// Replace the in-flight geometry if a request is outstanding.
    pub fn update_in_flight(
        &mut self,
        geometry: Geometry,
    ) -> bool {
        if self.is_pending() {
            self.in_flight = Some(geometry);
            true
        } else {
            false
        }
    }

    /// The client answered; yield the geometry to commit.
    pub fn acknowledge(&mut self) -> Option<Geometry> {
        if !self.is_pending() {
            return None;
        }

        self.timer.stop();
        self.phase = SyncPhase::Acknowledged;
        self.in_flight.take()
    }

    /// Yield the geometry to commit if the client failed to answer in time.
    pub fn poll_timeout(
        &mut self,
        now: Duration,
    ) -> Option<Geometry> {
        if !self.is_pending() || !self.timer.fire(now) {
            return None;
        }

        self.phase = SyncPhase::TimedOut;
        self.in_flight.take()
    }

    /// Return to `Idle` once the committed geometry has been applied.
    pub fn complete(&mut self) {
        if matches!(self.phase, SyncPhase::Acknowledged | SyncPhase::TimedOut) {
            self.phase = SyncPhase::Idle;
        }
    }

    /// Abandon any outstanding request, e.g. when the window goes away.
    pub fn cancel(&mut self) {
        self.timer.stop();
        self.phase = SyncPhase::Idle;
        self.in_flight = None;
    }
}

impl Default for SyncState {
    fn default() -> Self {
        Self::new(Self::DEFAULT_TIMEOUT_MIN, Self::DEFAULT_TIMEOUT_MAX)
    }
}
