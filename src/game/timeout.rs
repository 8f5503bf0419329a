//! Forfeiture window arithmetic
//!
//! Everything here is integer seconds. A `now` that lies before the last
//! action (clock skew between the client and the chain) is never timed out:
//! the skew is added to the remaining time instead of wrapping.

/// Remaining-time calculations for the contract's timeout window
pub struct TimeoutCalculator;

impl TimeoutCalculator {
    /// Seconds elapsed since the last qualifying action, zero under skew
    pub fn elapsed(last_action: u64, now: u64) -> u64 {
        now.saturating_sub(last_action)
    }

    /// Seconds left before the idle party forfeits, floored at zero
    ///
    /// Equals `duration - (now - last_action)` in signed terms, so a skewed
    /// `now` yields more than `duration`.
    pub fn remaining(duration: u64, last_action: u64, now: u64) -> u64 {
        match now.checked_sub(last_action) {
            Some(elapsed) => duration.saturating_sub(elapsed),
            None => duration.saturating_add(last_action - now),
        }
    }

    /// True iff `now - last_action >= duration`, with the difference signed
    pub fn has_timed_out(duration: u64, last_action: u64, now: u64) -> bool {
        now >= last_action && now - last_action >= duration
    }

    /// Unix time at which the window closes
    pub fn deadline(duration: u64, last_action: u64) -> u64 {
        last_action.saturating_add(duration)
    }
}
