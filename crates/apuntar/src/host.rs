//! Host collaborator traits.
//!
//! The engine never talks to a rendering engine, device shell, or navigation
//! service directly. Each external collaborator sits behind a narrow trait,
//! and handles are passed explicitly to the engine and its operations — there
//! is no process-wide singleton, so tests can run multiple independent
//! engines side by side.

use std::time::Duration;

use crate::element::{NodeId, Snapshot};
use crate::result::ApuntarResult;

/// The application UI surface: snapshot production, idle signal, and input
/// dispatch.
///
/// The host owns a single-threaded cooperative UI loop. All mutating methods
/// are applied on that loop in issuance order; the engine is the only caller
/// per loop instance.
pub trait UiHost {
    /// Produce a fresh element-tree snapshot
    ///
    /// Called once per resolve; snapshots are never cached across calls.
    fn snapshot(&self) -> Snapshot;

    /// Whether the UI loop currently has no pending work
    fn is_idle(&self) -> bool;

    /// Dispatch a click gesture to a node
    ///
    /// # Errors
    ///
    /// Returns an error if the host could not deliver the gesture.
    fn click(&self, node: NodeId) -> ApuntarResult<()>;

    /// Dispatch a long-click gesture to a node
    ///
    /// # Errors
    ///
    /// Returns an error if the host could not deliver the gesture.
    fn long_click(&self, node: NodeId) -> ApuntarResult<()>;

    /// Atomically replace a node's text content
    ///
    /// # Errors
    ///
    /// Returns an error if the node is not editable or the edit failed.
    fn replace_text(&self, node: NodeId, value: &str) -> ApuntarResult<()>;

    /// Dismiss the on-screen text-input affordance (soft keyboard)
    ///
    /// # Errors
    ///
    /// Returns an error if the host could not dismiss it.
    fn close_soft_input(&self) -> ApuntarResult<()>;

    /// Block the UI loop itself for at least `min`
    ///
    /// Lower bound only; there is no upper bound on elapsed time.
    fn force_delay(&self, min: Duration);
}

/// The device-level (non-application) UI surface, e.g. where system
/// permission dialogs appear.
pub trait DeviceHost {
    /// Snapshot of the device surface
    fn device_snapshot(&self) -> Snapshot;

    /// Tap a node on the device surface
    ///
    /// # Errors
    ///
    /// Returns an error if the tap could not be delivered.
    fn tap(&self, node: NodeId) -> ApuntarResult<()>;
}

/// The host navigation service. Thin pass-throughs; the engine adds no state
/// and no retries.
pub trait NavigationHost {
    /// Send the foreground process to the system home surface
    ///
    /// # Errors
    ///
    /// Returns an error if the navigation service rejected the request.
    fn go_home(&self) -> ApuntarResult<()>;

    /// Bring a named destination to the foreground
    ///
    /// # Errors
    ///
    /// Returns an error if the destination could not be brought forward.
    fn bring_to_front(&self, destination: &str) -> ApuntarResult<()>;
}
