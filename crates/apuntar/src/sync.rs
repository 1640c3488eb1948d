//! Idle synchronization with the UI loop.
//!
//! The engine's public operations run on a calling thread separate from the
//! UI loop. Before acting on or inspecting UI state, the caller must block
//! until the loop reports no pending work, otherwise it races in-flight
//! updates. [`Synchronizer::await_idle`] is that blocking point.
//!
//! [`Synchronizer::force_delay`] is different in kind: it blocks the UI loop
//! itself for at least a minimum duration, regardless of idleness. It exists
//! to paper over timing-dependent UI transitions and guarantees only a lower
//! bound on elapsed time. Prefer idle waiting with a timeout; a call site
//! that needs `force_delay` to pass usually points at a missing idle signal.

use std::time::{Duration, Instant};

use tracing::debug;

use crate::config::DEFAULT_POLL_INTERVAL_MS;
use crate::host::UiHost;
use crate::result::{ApuntarError, ApuntarResult};

/// Outcome of a successful idle wait
#[derive(Debug, Clone, Copy)]
pub struct IdleWait {
    /// Wall time spent waiting for idle
    pub elapsed: Duration,
}

/// Blocks the calling thread until the UI loop is idle
#[derive(Debug, Clone)]
pub struct Synchronizer {
    poll_interval: Duration,
}

impl Default for Synchronizer {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_millis(DEFAULT_POLL_INTERVAL_MS),
        }
    }
}

impl Synchronizer {
    /// Create a synchronizer with the default polling interval
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a synchronizer with a custom polling interval
    #[must_use]
    pub const fn with_poll_interval(poll_interval: Duration) -> Self {
        Self { poll_interval }
    }

    /// Block until the host's UI loop reports idle
    ///
    /// The idle signal is checked immediately, so an already-idle loop
    /// returns without sleeping even with a zero timeout.
    ///
    /// # Errors
    ///
    /// `Timeout` if idle is not observed within `timeout`, carrying the
    /// configured timeout and the wall time actually waited.
    pub fn await_idle<H: UiHost>(&self, host: &H, timeout: Duration) -> ApuntarResult<IdleWait> {
        let start = Instant::now();
        loop {
            if host.is_idle() {
                let elapsed = start.elapsed();
                debug!(elapsed_ms = elapsed.as_millis() as u64, "UI loop idle");
                return Ok(IdleWait { elapsed });
            }
            let elapsed = start.elapsed();
            if elapsed >= timeout {
                return Err(ApuntarError::Timeout {
                    timeout_ms: timeout.as_millis() as u64,
                    elapsed_ms: elapsed.as_millis() as u64,
                });
            }
            std::thread::sleep(self.poll_interval);
        }
    }

    /// Block the UI loop for at least `min`, regardless of idle state
    ///
    /// Last-resort primitive: lower bound only, masks flakiness rather than
    /// synchronizing. Delegated to the host, which owns the loop.
    pub fn force_delay<H: UiHost>(&self, host: &H, min: Duration) {
        debug!(min_ms = min.as_millis() as u64, "forcing UI loop delay");
        host.force_delay(min);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::{ElementData, Snapshot};
    use crate::mock::MockHost;

    fn idle_host() -> MockHost {
        MockHost::new(Snapshot::with_root(ElementData::new()))
    }

    mod await_idle_tests {
        use super::*;

        #[test]
        fn test_already_idle_returns_immediately() {
            let host = idle_host();
            let sync = Synchronizer::new();
            let wait = sync.await_idle(&host, Duration::from_millis(100)).unwrap();
            assert!(wait.elapsed < Duration::from_millis(100));
        }

        #[test]
        fn test_idle_checked_before_timeout() {
            // Zero timeout still succeeds when the loop is already idle.
            let host = idle_host();
            let sync = Synchronizer::new();
            assert!(sync.await_idle(&host, Duration::ZERO).is_ok());
        }

        #[test]
        fn test_becomes_idle_after_polls() {
            let host = idle_host();
            host.set_busy_checks(3);
            let sync = Synchronizer::with_poll_interval(Duration::from_millis(5));
            let result = sync.await_idle(&host, Duration::from_millis(500));
            assert!(result.is_ok());
        }

        #[test]
        fn test_never_idle_times_out() {
            let host = idle_host();
            host.set_busy_checks(u32::MAX);
            let sync = Synchronizer::with_poll_interval(Duration::from_millis(5));
            match sync.await_idle(&host, Duration::from_millis(30)) {
                Err(ApuntarError::Timeout {
                    timeout_ms,
                    elapsed_ms,
                }) => {
                    assert_eq!(timeout_ms, 30);
                    assert!(elapsed_ms >= 30);
                }
                other => panic!("expected Timeout, got {other:?}"),
            }
        }
    }

    mod force_delay_tests {
        use super::*;

        #[test]
        fn test_elapsed_wall_time_is_at_least_minimum() {
            let host = idle_host();
            let sync = Synchronizer::new();
            let start = Instant::now();
            sync.force_delay(&host, Duration::from_millis(50));
            // Lower bound only; no upper-bound assertion.
            assert!(start.elapsed() >= Duration::from_millis(50));
        }

        #[test]
        fn test_delay_runs_even_when_loop_is_busy() {
            let host = idle_host();
            host.set_busy_checks(u32::MAX);
            let sync = Synchronizer::new();
            let start = Instant::now();
            sync.force_delay(&host, Duration::from_millis(20));
            assert!(start.elapsed() >= Duration::from_millis(20));
        }
    }
}
