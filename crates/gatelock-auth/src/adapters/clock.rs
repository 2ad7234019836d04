//! System wall-clock adapter.

use std::time::{SystemTime, UNIX_EPOCH};

use crate::ports::outbound::Clock;

/// The real system clock.
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    /// Returns the current time in epoch milliseconds.
    ///
    /// If the system clock is before the Unix epoch (which should never
    /// happen on any sane system), returns 0 instead of panicking.
    fn now_millis(&self) -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn system_clock_advances() {
        let clock = SystemClock;
        let a = clock.now_millis();
        let b = clock.now_millis();
        assert!(b >= a);
        // Sometime after 2020-01-01.
        assert!(a > 1_577_836_800_000);
    }
}
