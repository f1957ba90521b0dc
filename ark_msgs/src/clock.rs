//! Clock abstraction for stamping outgoing messages
//!
//! The bus runtime owns the real clock; this crate only consumes it through
//! the [`Clock`] trait so packing stays deterministic under test.

/// Source of monotonic integer ticks used to stamp outgoing messages
pub trait Clock: Send + Sync {
    /// Current time in integer ticks (nanoseconds by convention)
    fn now(&self) -> i64;
}

/// Wall clock reading nanoseconds since the UNIX epoch
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> i64 {
        timestamp_now() as i64
    }
}

/// Clock pinned to a fixed tick, for tests and deterministic replay
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub i64);

impl Clock for FixedClock {
    fn now(&self) -> i64 {
        self.0
    }
}

/// Get current timestamp in nanoseconds
pub fn timestamp_now() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(0)
}
