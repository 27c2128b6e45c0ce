//! Drift-free periodic deadlines
//!
//! Ticks are `u32` milliseconds and wrap after ~49.7 days; all comparisons
//! go through wrapping differences, valid while the two instants are less
//! than 2^31 ms apart.

/// Milliseconds from `since` to `now`
pub fn elapsed(now: u32, since: u32) -> u32 {
    now.wrapping_sub(since)
}

/// True once `now` is at or past `at`
pub fn reached(now: u32, at: u32) -> bool {
    (now.wrapping_sub(at) as i32) >= 0
}

/// Next-fire tick of a fixed-period activity
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Deadline {
    at: u32,
    period: u32,
}

impl Deadline {
    pub const fn new(at: u32, period: u32) -> Self {
        Self { at, period }
    }

    pub fn at(&self) -> u32 {
        self.at
    }

    pub fn period(&self) -> u32 {
        self.period
    }

    pub fn is_due(&self, now: u32) -> bool {
        reached(now, self.at)
    }

    /// Move the deadline to an absolute tick, keeping the period
    pub fn rearm(&mut self, at: u32) {
        self.at = at;
    }

    /// Advance by one period after firing
    ///
    /// The period is added to the previous deadline, not to `now`, so poll
    /// latency never accumulates. If the result is still behind `now` the
    /// loop fell more than a period behind; the deadline then restarts at
    /// `now + period` instead of firing a burst of catch-up events.
    /// Returns `true` when that happened.
    pub fn advance(&mut self, now: u32) -> bool {
        self.at = self.at.wrapping_add(self.period);
        if (now.wrapping_sub(self.at) as i32) > 0 {
            self.at = now.wrapping_add(self.period);
            return true;
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reached_wraps() {
        assert!(reached(10, 10));
        assert!(reached(11, 10));
        assert!(!reached(9, 10));
        assert!(reached(5, u32::MAX - 5));
        assert!(!reached(u32::MAX - 5, 5));
    }

    #[test]
    fn test_jitter_does_not_accumulate() {
        let mut deadline = Deadline::new(250, 250);
        let mut fired = Vec::new();
        for now in [251, 501, 760] {
            assert!(deadline.is_due(now));
            fired.push(deadline.at());
            assert!(!deadline.advance(now));
        }
        assert_eq!(fired, [250, 500, 750]);
        assert_eq!(deadline.at(), 1000);
    }

    #[test]
    fn test_not_due_before_deadline() {
        let deadline = Deadline::new(1250, 250);
        assert!(!deadline.is_due(1249));
        assert!(deadline.is_due(1250));
    }

    #[test]
    fn test_resync_after_long_stall() {
        let mut deadline = Deadline::new(250, 250);
        // Loop blocked until 1300: three periods missed
        assert!(deadline.is_due(1300));
        assert!(deadline.advance(1300));
        assert_eq!(deadline.at(), 1550);
        assert!(!deadline.is_due(1300));
    }

    #[test]
    fn test_exactly_one_period_late_is_not_resynced() {
        let mut deadline = Deadline::new(250, 250);
        // Next slot is exactly now: fires on the next poll, no resync
        assert!(!deadline.advance(500));
        assert_eq!(deadline.at(), 500);
    }

    #[test]
    fn test_advance_across_wrap() {
        let mut deadline = Deadline::new(u32::MAX - 100, 250);
        assert!(!deadline.advance(u32::MAX - 90));
        assert_eq!(deadline.at(), 149);
        assert!(!deadline.is_due(u32::MAX));
        assert!(deadline.is_due(149));
    }
}
