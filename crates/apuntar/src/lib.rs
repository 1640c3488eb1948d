//! Apuntar: declarative element matching and action dispatch for UI tests
//!
//! Test code describes *which* element it means with a composable [`Matcher`],
//! and the engine resolves that description against a fresh snapshot of the
//! element tree, waits for the UI loop to go idle, and then dispatches the
//! gesture, edit, or assertion — refusing to act unless the description picks
//! out exactly one element.
//!
//! # Architecture
//!
//! ```text
//! ┌───────────┐   ┌──────────┐   ┌──────────────┐   ┌──────────┐
//! │ Matcher   │──►│ Resolver │──►│ Synchronizer │──►│ Action / │
//! │ (algebra) │   │ (unique) │   │ (idle wait)  │   │ Assert   │
//! └───────────┘   └──────────┘   └──────────────┘   └──────────┘
//!                      ▲                                  │
//!                      │            host traits           ▼
//!                 ┌────┴─────────────────────────────────────┐
//!                 │  UiHost / DeviceHost / NavigationHost    │
//!                 └──────────────────────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```
//! use apuntar::{ElementData, Engine, Matcher, Snapshot};
//! use apuntar::mock::MockHost;
//!
//! let host = MockHost::new(Snapshot::with_root(
//!     ElementData::new().with_id(42).with_text("Submit"),
//! ));
//! let engine = Engine::new(host);
//! engine.click(&Matcher::by_id(42).and(Matcher::by_text("Submit")))?;
//! # Ok::<(), apuntar::ApuntarError>(())
//! ```

#![warn(missing_docs)]
// Lints are configured in workspace Cargo.toml [workspace.lints.clippy]

mod action;
mod assertion;
mod config;
mod dialog;
mod element;
mod engine;
mod host;
mod matcher;
mod resolver;
mod result;
mod sync;

/// Recording in-memory host for tests
pub mod mock;

pub use action::{perform, Action};
pub use assertion::{check, AssertionSpec};
pub use config::{EngineConfig, DEFAULT_IDLE_TIMEOUT_MS, DEFAULT_POLL_INTERVAL_MS};
pub use dialog::{normalize_label, resolve_system_prompt, PromptOutcome};
pub use element::{
    Ancestors, ElementData, NodeId, NodeRef, PreOrder, Snapshot, SnapshotBuilder, Visibility,
};
pub use engine::Engine;
pub use host::{DeviceHost, NavigationHost, UiHost};
pub use matcher::Matcher;
pub use resolver::{resolve, ResolvedSet};
pub use result::{ApuntarError, ApuntarResult};
pub use sync::{IdleWait, Synchronizer};
