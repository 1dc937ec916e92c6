//! Wall-Clock Timing
//!
//! Monotonic stopwatch used by the driver to time one kernel invocation.

use std::fmt;
use std::time::{Duration, Instant};

// ─── Elapsed ─────────────────────────────────────────────────────────────────

/// Measured wall-clock span
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub struct Elapsed {
    nanos: u64,
}

impl Elapsed {
    /// From a raw nanosecond count
    pub fn from_nanos(nanos: u64) -> Self {
        Self { nanos }
    }

    /// Nanoseconds
    pub fn as_nanos(&self) -> u64 {
        self.nanos
    }

    /// Whole milliseconds, truncated
    pub fn as_millis(&self) -> u64 {
        self.nanos / 1_000_000
    }

    /// Fractional milliseconds
    pub fn as_millis_f64(&self) -> f64 {
        self.nanos as f64 / 1e6
    }

    /// As a [`Duration`]
    pub fn as_duration(&self) -> Duration {
        Duration::from_nanos(self.nanos)
    }
}

impl From<Duration> for Elapsed {
    fn from(d: Duration) -> Self {
        Self {
            nanos: u64::try_from(d.as_nanos()).unwrap_or(u64::MAX),
        }
    }
}

impl fmt::Display for Elapsed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} milliseconds", self.as_millis())
    }
}

// ─── Stopwatch ───────────────────────────────────────────────────────────────

/// Stopwatch started at construction
#[derive(Debug, Clone, Copy)]
pub struct Stopwatch {
    start: Instant,
}

impl Stopwatch {
    /// Start timing now
    #[inline(always)]
    pub fn start() -> Self {
        Self {
            start: Instant::now(),
        }
    }

    /// Time since start; the stopwatch keeps running
    #[inline(always)]
    pub fn elapsed(&self) -> Elapsed {
        self.start.elapsed().into()
    }
}

/// Run `f` once and return its result with the time it took
pub fn time<R>(f: impl FnOnce() -> R) -> (R, Elapsed) {
    let watch = Stopwatch::start();
    let out = f();
    (out, watch.elapsed())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stopwatch_elapsed() {
        let watch = Stopwatch::start();
        std::thread::sleep(Duration::from_millis(10));
        let elapsed = watch.elapsed();

        assert!(elapsed.as_millis() >= 5);
        assert!(elapsed.as_duration() < Duration::from_secs(5));
    }

    #[test]
    fn test_millis_truncate() {
        let e = Elapsed::from_nanos(2_999_999);
        assert_eq!(e.as_millis(), 2);
        assert!((e.as_millis_f64() - 2.999999).abs() < 1e-9);
        assert_eq!(e.to_string(), "2 milliseconds");
    }

    #[test]
    fn test_time_returns_value() {
        let (v, elapsed) = time(|| 40 + 2);
        assert_eq!(v, 42);
        assert!(elapsed.as_nanos() < 1_000_000_000);
    }
}
