//! Time source capability.
//!
//! Plan ids and remaining-day counts both depend on "now"; callers inject a
//! `Clock` so those computations stay deterministic under test.

use chrono::{DateTime, Utc};

pub trait Clock {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall-clock time source.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Clock pinned to a fixed instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedClock(pub DateTime<Utc>);

impl FixedClock {
    /// Pins the clock at `epoch_ms` milliseconds since the Unix epoch.
    ///
    /// Out-of-range values fall back to the epoch itself.
    pub fn at_millis(epoch_ms: i64) -> Self {
        Self(DateTime::from_timestamp_millis(epoch_ms).unwrap_or_default())
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

impl<C: Clock + ?Sized> Clock for &C {
    fn now(&self) -> DateTime<Utc> {
        (**self).now()
    }
}

#[cfg(test)]
mod tests {
    use super::{Clock, FixedClock, SystemClock};

    #[test]
    fn fixed_clock_returns_pinned_instant() {
        let clock = FixedClock::at_millis(1_700_000_000_000);
        assert_eq!(clock.now().timestamp_millis(), 1_700_000_000_000);
        assert_eq!(clock.now(), clock.now());
    }

    #[test]
    fn system_clock_is_after_2020() {
        assert!(SystemClock.now().timestamp_millis() > 1_577_836_800_000);
    }
}
