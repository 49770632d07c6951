//! Time abstraction for testable TTL stamping and bucket derivation.
//!
//! TTL math and time-bucket formatting are calendar-based, so the clock
//! deals in `DateTime<Utc>` rather than monotonic instants. Production
//! code uses `SystemClock`; tests inject `TestClock` to pin the current
//! time and step it across TTL windows and UTC midnight boundaries.

use std::sync::{
    atomic::{AtomicI64, Ordering},
    Arc,
};

use chrono::{DateTime, Duration, TimeZone, Utc};

/// Clock abstraction for the current UTC time.
pub trait Clock: Send + Sync + std::fmt::Debug {
    /// Returns the current UTC time.
    fn now(&self) -> DateTime<Utc>;
}

/// Production clock backed by the system time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl SystemClock {
    /// Creates a new system clock.
    pub fn new() -> Self {
        Self
    }
}

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Controllable clock for deterministic tests.
///
/// Stores the current time as milliseconds since the Unix epoch in an
/// atomic, so clones share the same timeline and tests can advance or
/// pin time without synchronization.
#[derive(Debug, Clone)]
pub struct TestClock {
    epoch_millis: Arc<AtomicI64>,
}

impl TestClock {
    /// Creates a test clock starting at the current system time.
    pub fn new() -> Self {
        Self::at(Utc::now())
    }

    /// Creates a test clock pinned to a specific time.
    pub fn at(start: DateTime<Utc>) -> Self {
        Self { epoch_millis: Arc::new(AtomicI64::new(start.timestamp_millis())) }
    }

    /// Advances the clock by the given duration.
    pub fn advance(&self, by: Duration) {
        self.epoch_millis.fetch_add(by.num_milliseconds(), Ordering::AcqRel);
    }

    /// Jumps the clock to a specific time, forwards or backwards.
    pub fn set(&self, to: DateTime<Utc>) {
        self.epoch_millis.store(to.timestamp_millis(), Ordering::Release);
    }
}

impl Default for TestClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for TestClock {
    fn now(&self) -> DateTime<Utc> {
        let millis = self.epoch_millis.load(Ordering::Acquire);
        Utc.timestamp_millis_opt(millis).single().unwrap_or_else(Utc::now)
    }
}
