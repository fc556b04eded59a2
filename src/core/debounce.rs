//! Debouncer - fires once after a quiet period.
//!
//! Continuous resize produces a stream of events. Instead of redrawing on
//! each one:
//! 1. Every event pushes the deadline out by `delay`
//! 2. Once no event has arrived for `delay`, `tick` reports due exactly once
//!
//! Time is passed in by the caller, so the host's clock drives it.

use std::time::{Duration, Instant};

/// Default resize quiet period.
pub const RESIZE_DEBOUNCE_MS: u64 = 120;

/// Trailing-edge debouncer.
///
/// # Usage
/// ```ignore
/// // On resize event:
/// debouncer.schedule(now);
///
/// // In frame/timer loop:
/// if debouncer.tick(now) {
///     requester.request_redraw();
/// }
/// ```
#[derive(Debug, Clone)]
pub struct Debouncer {
    delay: Duration,
    /// Deadline of the pending trigger
    pending: Option<Instant>,
}

impl Default for Debouncer {
    fn default() -> Self {
        Self::new(RESIZE_DEBOUNCE_MS)
    }
}

impl Debouncer {
    pub fn new(delay_ms: u64) -> Self {
        Self {
            delay: Duration::from_millis(delay_ms),
            pending: None,
        }
    }

    pub fn delay_ms(&self) -> u64 {
        self.delay.as_millis() as u64
    }

    /// Schedule a trigger; if already pending, resets the timer.
    pub fn schedule(&mut self, now: Instant) {
        self.pending = Some(now + self.delay);
        log::trace!("Debouncer: scheduled in {}ms", self.delay.as_millis());
    }

    pub fn cancel(&mut self) {
        if self.pending.take().is_some() {
            log::trace!("Debouncer: cancelled");
        }
    }

    /// True once the quiet period has elapsed. Clears the pending state.
    pub fn tick(&mut self, now: Instant) -> bool {
        let Some(deadline) = self.pending else {
            return false;
        };

        if now >= deadline {
            self.pending = None;
            log::trace!("Debouncer: triggered");
            true
        } else {
            false
        }
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.pending
    }
}
