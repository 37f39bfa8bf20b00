//! Clock: Tick source abstraction for the runner.
//!
//! All waiting in the engine goes through the [`Clock`] trait, so the
//! timing behavior is decoupled from any specific timer API. The real
//! engine uses [`SystemClock`]; tests inject a [`VirtualClock`] whose
//! sleeps complete instantly while advancing virtual time, making every
//! tick interval assertable without wall-clock waits.

use std::cell::RefCell;
use std::rc::Rc;
use std::time::{Duration, Instant};

/// A source of elapsed time and timed waits.
pub trait Clock {
    /// Time elapsed since the clock was created.
    fn elapsed(&self) -> Duration;

    /// Block until `duration` has passed.
    fn sleep(&mut self, duration: Duration);
}

/// Wall-clock implementation backed by `Instant` and `thread::sleep`.
#[derive(Debug)]
pub struct SystemClock {
    /// Creation instant; `elapsed` is measured from here.
    start: Instant,
}

impl SystemClock {
    /// Create a clock starting at the current instant.
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }

    fn sleep(&mut self, duration: Duration) {
        if !duration.is_zero() {
            std::thread::sleep(duration);
        }
    }
}

#[derive(Debug, Default)]
struct VirtualState {
    now: Duration,
    sleeps: Vec<Duration>,
}

/// Deterministic test clock.
///
/// `sleep` returns immediately, advances virtual time by the requested
/// duration, and records it. Handles are cheap clones sharing one state,
/// so a test can keep a handle while the engine owns another.
#[derive(Debug, Clone, Default)]
pub struct VirtualClock {
    state: Rc<RefCell<VirtualState>>,
}

impl VirtualClock {
    /// Create a clock at virtual time zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Every sleep requested so far, in order.
    pub fn sleeps(&self) -> Vec<Duration> {
        self.state.borrow().sleeps.clone()
    }

    /// Number of sleeps requested so far.
    pub fn sleep_count(&self) -> usize {
        self.state.borrow().sleeps.len()
    }
}

impl Clock for VirtualClock {
    fn elapsed(&self) -> Duration {
        self.state.borrow().now
    }

    fn sleep(&mut self, duration: Duration) {
        let mut state = self.state.borrow_mut();
        state.now += duration;
        state.sleeps.push(duration);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_virtual_clock_advances() {
        let mut clock = VirtualClock::new();
        assert_eq!(clock.elapsed(), Duration::ZERO);

        clock.sleep(Duration::from_millis(50));
        clock.sleep(Duration::from_millis(200));

        assert_eq!(clock.elapsed(), Duration::from_millis(250));
        assert_eq!(
            clock.sleeps(),
            vec![Duration::from_millis(50), Duration::from_millis(200)]
        );
    }

    #[test]
    fn test_virtual_clock_handles_share_state() {
        let mut clock = VirtualClock::new();
        let observer = clock.clone();

        clock.sleep(Duration::from_millis(10));

        assert_eq!(observer.elapsed(), Duration::from_millis(10));
        assert_eq!(observer.sleep_count(), 1);
    }

    #[test]
    fn test_system_clock_elapsed_monotonic() {
        let mut clock = SystemClock::new();
        clock.sleep(Duration::from_millis(1));
        assert!(clock.elapsed() >= Duration::from_millis(1));
    }
}
