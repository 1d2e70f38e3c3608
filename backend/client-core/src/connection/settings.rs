use super::policy::{
    DEFAULT_INITIAL_RECONNECT_DELAY, DEFAULT_MAX_RECONNECT_ATTEMPTS, DEFAULT_MAX_RECONNECT_DELAY,
};
use crate::config::ClientConfig;

use std::time::Duration;

pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Tunables for one client. Defaults reproduce the stock reconnect schedule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionSettings {
    pub max_reconnect_attempts: u32,
    pub initial_reconnect_delay: Duration,
    pub max_reconnect_delay: Duration,
    /// `None` keeps every offline message.
    pub queue_capacity: Option<usize>,
    /// Applies to the credential exchange only.
    pub request_timeout: Duration,
}

impl Default for ConnectionSettings {
    fn default() -> Self {
        Self {
            max_reconnect_attempts: DEFAULT_MAX_RECONNECT_ATTEMPTS,
            initial_reconnect_delay: DEFAULT_INITIAL_RECONNECT_DELAY,
            max_reconnect_delay: DEFAULT_MAX_RECONNECT_DELAY,
            queue_capacity: None,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }
}

impl From<&ClientConfig> for ConnectionSettings {
    fn from(config: &ClientConfig) -> Self {
        Self {
            max_reconnect_attempts: config.reconnect.max_attempts,
            initial_reconnect_delay: Duration::from_millis(config.reconnect.initial_delay_ms),
            max_reconnect_delay: Duration::from_millis(config.reconnect.max_delay_ms),
            queue_capacity: config.queue.capacity,
            request_timeout: Duration::from_secs(config.http.timeout_secs),
        }
    }
}
