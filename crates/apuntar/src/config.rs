//! Engine configuration.

use std::time::Duration;

/// Default timeout for idle waiting (5 seconds)
pub const DEFAULT_IDLE_TIMEOUT_MS: u64 = 5000;

/// Default polling interval for idle waiting (50ms)
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 50;

/// Process-wide defaults for an engine instance, overridable per call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    /// Timeout for idle waiting in milliseconds
    pub idle_timeout_ms: u64,
    /// Polling interval for idle waiting in milliseconds
    pub poll_interval_ms: u64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            idle_timeout_ms: DEFAULT_IDLE_TIMEOUT_MS,
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
        }
    }
}

impl EngineConfig {
    /// Create a config with defaults
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the idle timeout in milliseconds
    #[must_use]
    pub const fn with_idle_timeout(mut self, timeout_ms: u64) -> Self {
        self.idle_timeout_ms = timeout_ms;
        self
    }

    /// Set the polling interval in milliseconds
    #[must_use]
    pub const fn with_poll_interval(mut self, poll_interval_ms: u64) -> Self {
        self.poll_interval_ms = poll_interval_ms;
        self
    }

    /// Idle timeout as a `Duration`
    #[must_use]
    pub const fn idle_timeout(&self) -> Duration {
        Duration::from_millis(self.idle_timeout_ms)
    }

    /// Polling interval as a `Duration`
    #[must_use]
    pub const fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}
