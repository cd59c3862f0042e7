//! Monotonic millisecond time sources.
//!
//! The simulation never reads a clock on its own. The orchestrator samples a
//! [`Clock`] once per frame and threads that single [`Millis`] value through
//! every phase of [`Simulation::step`](crate::simulation::Simulation::step),
//! so all timers in a tick agree on "now".

use std::cell::Cell;
use std::time::{Duration, Instant};

/// Milliseconds on a monotonic clock.
pub type Millis = u64;

/// Monotonic millisecond time source.
pub trait Clock {
    /// Current time. Never decreases between calls.
    fn now(&self) -> Millis;
}

/// Wall-clock backed by [`Instant`], counting from construction.
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    /// Creates a clock whose zero is the moment of construction.
    #[must_use]
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now(&self) -> Millis {
        to_millis(self.origin.elapsed())
    }
}

/// Whole milliseconds in `duration`, saturating at [`Millis::MAX`].
fn to_millis(duration: Duration) -> Millis {
    Millis::try_from(duration.as_millis()).unwrap_or(Millis::MAX)
}

/// Manually driven clock for tests and headless runs.
///
/// # Example
///
/// ```
/// use emberfall_core::clock::{Clock, ManualClock};
///
/// let clock = ManualClock::new(1_000);
/// clock.advance(16);
/// assert_eq!(clock.now(), 1_016);
/// ```
#[derive(Debug, Default)]
pub struct ManualClock {
    now: Cell<Millis>,
}

impl ManualClock {
    /// Creates a clock reading `start`.
    #[must_use]
    pub fn new(start: Millis) -> Self {
        Self {
            now: Cell::new(start),
        }
    }

    /// Moves the clock forward by `delta` milliseconds.
    pub fn advance(&self, delta: Millis) {
        self.now.set(self.now.get().saturating_add(delta));
    }

    /// Sets the clock to `at`, ignoring attempts to move it backwards.
    pub fn set(&self, at: Millis) {
        if at > self.now.get() {
            self.now.set(at);
        }
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Millis {
        self.now.get()
    }
}

/// Milliseconds elapsed since `since`, or `None` if `since` is unset.
///
/// Saturates at zero so a timestamp from "the future" never underflows.
#[must_use]
pub fn elapsed_since(now: Millis, since: Option<Millis>) -> Option<Millis> {
    since.map(|t| now.saturating_sub(t))
}
