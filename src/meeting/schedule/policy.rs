//! Update scheduling policy.
//!
//! A pure decision over timestamps and buffer size, kept apart from the
//! background poll loop so it can be exercised without timers.

use crate::meeting::core::config::{
    CHAR_THRESHOLD, MIN_UPDATE_INTERVAL_MS, SummarizerConfig, UPDATE_INTERVAL_MS,
};

/// Inputs of a scheduling decision. Timestamps are Unix milliseconds.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct UpdateCheck {
    /// Current time.
    pub now: i64,
    /// Time of the last update attempt, successful or not.
    pub last_attempt_at: i64,
    /// Time of the last successful update.
    pub last_update_at: i64,
    /// Number of buffered characters.
    pub buffer_length: usize,
    /// Bypass the timing gates.
    pub force: bool,
}

/// Thresholds used by [`SchedulePolicy::is_due`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SchedulePolicy {
    /// Cooldown between attempts in milliseconds.
    pub min_update_interval_ms: i64,
    /// Staleness interval in milliseconds.
    pub update_interval_ms: i64,
    /// Buffer size that triggers an early update.
    pub char_threshold: usize,
}

impl Default for SchedulePolicy {
    fn default() -> Self {
        Self {
            min_update_interval_ms: to_millis(MIN_UPDATE_INTERVAL_MS),
            update_interval_ms: to_millis(UPDATE_INTERVAL_MS),
            char_threshold: CHAR_THRESHOLD,
        }
    }
}

impl SchedulePolicy {
    /// Build a policy from summarizer configuration.
    #[must_use]
    pub fn from_config(config: &SummarizerConfig) -> Self {
        Self {
            min_update_interval_ms: to_millis(config.min_update_interval_ms),
            update_interval_ms: to_millis(config.update_interval_ms),
            char_threshold: config.char_threshold,
        }
    }

    /// Decide whether a flush is due.
    ///
    /// In priority order: an empty buffer is never due; `force` is always due;
    /// an attempt inside the cooldown is not due; a stale summary is due;
    /// otherwise the buffer must have reached the character threshold.
    #[must_use]
    pub const fn is_due(&self, check: UpdateCheck) -> bool {
        if check.buffer_length == 0 {
            return false;
        }
        if check.force {
            return true;
        }
        if check.now.saturating_sub(check.last_attempt_at) < self.min_update_interval_ms {
            return false;
        }
        if check.now.saturating_sub(check.last_update_at) >= self.update_interval_ms {
            return true;
        }
        check.buffer_length >= self.char_threshold
    }
}

/// Decide whether a flush is due under the default thresholds.
#[must_use]
pub fn should_update_summary(check: UpdateCheck) -> bool {
    SchedulePolicy::default().is_due(check)
}

fn to_millis(value: u64) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}
