//! Time source abstraction.
//!
//! Decouples lifecycle decisions from wall-clock time so expiry behavior
//! is testable deterministically. Production uses [`SystemClock`]; tests
//! and simulation advance a [`ManualClock`] by hand.

use std::sync::{
    Arc,
    atomic::{AtomicU64, Ordering},
};

/// Source of the current time in milliseconds since the Unix epoch.
///
/// Monotonicity is best-effort: [`SystemClock`] follows the operating
/// system clock, which can step backwards under clock adjustment. Callers
/// must not rely on successive readings being ordered. Deactivation is
/// one-way, so a backward step never resurrects a consumed record.
pub trait Clock: Clone + Send + Sync + 'static {
    /// Current time in milliseconds since the Unix epoch.
    fn now_millis(&self) -> u64;
}

/// Wall-clock time via `SystemTime`.
#[derive(Clone, Copy, Default)]
pub struct SystemClock;

impl SystemClock {
    /// Create a new system clock.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Clock for SystemClock {
    #[allow(clippy::disallowed_methods)]
    fn now_millis(&self) -> u64 {
        use std::time::{SystemTime, UNIX_EPOCH};

        match SystemTime::now().duration_since(UNIX_EPOCH) {
            Ok(elapsed) => elapsed.as_millis() as u64,
            // System clock set before 1970. Treat as the epoch; every
            // record then reads as unexpired rather than panicking.
            Err(_) => 0,
        }
    }
}

/// Manually advanced clock for tests and simulation.
///
/// Cheap to clone; clones share the same instant.
#[derive(Clone, Default)]
pub struct ManualClock {
    now: Arc<AtomicU64>,
}

impl ManualClock {
    /// Create a clock frozen at `start_millis`.
    #[must_use]
    pub fn new(start_millis: u64) -> Self {
        Self { now: Arc::new(AtomicU64::new(start_millis)) }
    }

    /// Advance the clock by `millis`.
    pub fn advance(&self, millis: u64) {
        self.now.fetch_add(millis, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now_millis(&self) -> u64 {
        self.now.load(Ordering::SeqCst)
    }
}
