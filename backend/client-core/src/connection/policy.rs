use backoff::ExponentialBackoff;
use backoff::backoff::Backoff;

use std::time::Duration;

pub const DEFAULT_MAX_RECONNECT_ATTEMPTS: u32 = 5;
pub const DEFAULT_INITIAL_RECONNECT_DELAY: Duration = Duration::from_millis(1000);
pub const DEFAULT_MAX_RECONNECT_DELAY: Duration = Duration::from_millis(30_000);
const RECONNECT_MULTIPLIER: f64 = 2.0;

/// Bounded exponential backoff between automatic reconnect attempts.
///
/// Attempt `n` (1-based) waits `min(initial * 2^(n-1), max)`. No jitter is
/// applied, so the schedule is reproducible.
#[derive(Debug)]
pub(crate) struct ReconnectPolicy {
    attempts: u32,
    max_attempts: u32,
    backoff: ExponentialBackoff,
    enabled: bool,
}

impl ReconnectPolicy {
    pub(crate) fn new(max_attempts: u32, initial_delay: Duration, max_delay: Duration) -> Self {
        Self {
            attempts: 0,
            max_attempts,
            backoff: ExponentialBackoff {
                current_interval: initial_delay,
                initial_interval: initial_delay,
                randomization_factor: 0.0,
                multiplier: RECONNECT_MULTIPLIER,
                max_interval: max_delay,
                max_elapsed_time: None,
                ..Default::default()
            },
            enabled: true,
        }
    }

    /// Delay before the next attempt, or `None` once attempts are exhausted or
    /// reconnection was disabled. Increments the attempt counter.
    pub(crate) fn next_delay(&mut self) -> Option<Duration> {
        if !self.enabled || self.attempts >= self.max_attempts {
            return None;
        }
        self.attempts += 1;
        self.backoff.next_backoff()
    }

    /// Called on every successful open.
    pub(crate) fn reset(&mut self) {
        self.attempts = 0;
        self.enabled = true;
        self.backoff.reset();
    }

    pub(crate) fn disable(&mut self) {
        self.enabled = false;
    }

    pub(crate) fn attempts(&self) -> u32 {
        self.attempts
    }

    pub(crate) fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    pub(crate) fn is_enabled(&self) -> bool {
        self.enabled
    }
}

impl Default for ReconnectPolicy {
    fn default() -> Self {
        Self::new(
            DEFAULT_MAX_RECONNECT_ATTEMPTS,
            DEFAULT_INITIAL_RECONNECT_DELAY,
            DEFAULT_MAX_RECONNECT_DELAY,
        )
    }
}
