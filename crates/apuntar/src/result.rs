//! Result and error types for Apuntar.

use thiserror::Error;

/// Result type for Apuntar operations
pub type ApuntarResult<T> = Result<T, ApuntarError>;

/// Errors that can occur in Apuntar
///
/// Every surfaced failure carries the matcher or action description and the
/// observed cardinality or elapsed time, so callers can diagnose without
/// inspecting engine internals.
#[derive(Debug, Error)]
pub enum ApuntarError {
    /// No element matched when exactly one was required
    #[error("no element matched {matcher}")]
    NoMatch {
        /// Description of the matcher that found nothing
        matcher: String,
    },

    /// More than one element matched when exactly one was required
    #[error("{count} elements matched {matcher}; expected exactly one")]
    AmbiguousMatch {
        /// Description of the over-matching matcher
        matcher: String,
        /// Number of elements observed
        count: usize,
    },

    /// The UI loop did not become idle within the timeout
    #[error("UI loop not idle after {elapsed_ms}ms (timeout {timeout_ms}ms)")]
    Timeout {
        /// Configured timeout in milliseconds
        timeout_ms: u64,
        /// Wall time actually waited in milliseconds
        elapsed_ms: u64,
    },

    /// An argument violated a precondition (e.g. empty label or item text)
    #[error("invalid argument: {message}")]
    InvalidArgument {
        /// What was wrong with the argument
        message: String,
    },

    /// An assertion predicate evaluated to false
    #[error("assertion {assertion} failed for {matcher}: {message}")]
    AssertionFailed {
        /// Description of the assertion that failed
        assertion: String,
        /// Description of the matcher it was evaluated against
        matcher: String,
        /// Why the assertion failed
        message: String,
    },

    /// The host failed to deliver an input gesture or text edit
    #[error("dispatch of {action} failed: {message}")]
    DispatchFailed {
        /// Description of the action being dispatched
        action: String,
        /// Host-reported failure
        message: String,
    },
}
