//! Bounded retry configuration.

use std::time::Duration;

/// Immutable retry settings for the downloader.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total fetch attempts, not retries. 0 fails without fetching.
    pub max_attempts: u32,
    pub connect_timeout: Duration,
    /// Upper bound on a single attempt, connect included.
    pub attempt_timeout: Duration,
    /// Fixed sleep between a failed attempt and the next one.
    pub backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            connect_timeout: Duration::from_secs(30),
            attempt_timeout: Duration::from_secs(300),
            backoff: Duration::from_secs(10),
        }
    }
}

/// Seconds to wait for a systemd unit to report `active`.
pub const DEFAULT_SERVICE_TIMEOUT_SECS: u64 = 30;
