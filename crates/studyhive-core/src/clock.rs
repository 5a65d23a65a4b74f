//! Injectable time source.
//!
//! Streak continuation and quota resets are day-boundary sensitive, so
//! every engine that needs "now" takes it as a parameter or reads it
//! from a [`Clock`]. Tests pin a [`FixedClock`] to exercise boundaries
//! deterministically.

use chrono::{DateTime, Utc};

/// Supplies the current instant.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall-clock time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A clock frozen at a settable instant (for tests and simulations).
#[derive(Debug)]
pub struct FixedClock {
    instant: std::sync::Mutex<DateTime<Utc>>,
}

impl FixedClock {
    pub fn new(instant: DateTime<Utc>) -> Self {
        Self {
            instant: std::sync::Mutex::new(instant),
        }
    }

    /// Move the frozen clock to a new instant.
    pub fn set(&self, instant: DateTime<Utc>) {
        *self.instant.lock().unwrap() = instant;
    }

    /// Advance the frozen clock by a duration.
    pub fn advance(&self, by: chrono::Duration) {
        let mut guard = self.instant.lock().unwrap();
        *guard += by;
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        *self.instant.lock().unwrap()
    }
}

// Lets tests hand the orchestrator a clock and keep a handle to move it.
impl<C: Clock> Clock for std::sync::Arc<C> {
    fn now(&self) -> DateTime<Utc> {
        self.as_ref().now()
    }
}
