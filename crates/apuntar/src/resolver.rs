//! Matcher resolution against snapshots.
//!
//! [`resolve`] walks a snapshot pre-order depth-first and collects every node
//! the matcher accepts, in traversal order. The resolver never decides what a
//! zero- or many-element result means; that policy lives with the callers via
//! [`ResolvedSet::require_single`], so assertions like "not displayed" can
//! tolerate an empty result while a click cannot.

use tracing::debug;

use crate::element::{NodeId, Snapshot};
use crate::matcher::Matcher;
use crate::result::{ApuntarError, ApuntarResult};

/// Ordered set of nodes a matcher resolved to
///
/// Order is snapshot pre-order; deterministic for reproducible tests.
#[derive(Debug, Clone)]
pub struct ResolvedSet {
    ids: Vec<NodeId>,
    description: String,
}

impl ResolvedSet {
    /// Number of matched nodes
    #[must_use]
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// Whether no node matched
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Matched node handles in traversal order
    #[must_use]
    pub fn ids(&self) -> &[NodeId] {
        &self.ids
    }

    /// Description of the matcher that produced this set (for diagnostics)
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Keep only nodes that are displayed (visible with on-screen area)
    ///
    /// Mirrors the implicit `isDisplayed` constraint interactive operations
    /// carry: cardinality is judged over displayed candidates only.
    #[must_use]
    pub fn displayed_only(self, snapshot: &Snapshot) -> Self {
        let ids = self
            .ids
            .into_iter()
            .filter(|&id| snapshot.node(id).is_displayed())
            .collect();
        Self {
            ids,
            description: format!("{} [displayed]", self.description),
        }
    }

    /// Enforce the uniqueness contract: exactly one match
    ///
    /// # Errors
    ///
    /// `NoMatch` when empty, `AmbiguousMatch` when more than one node matched.
    /// Never silently picks the first match.
    pub fn require_single(&self) -> ApuntarResult<NodeId> {
        match self.ids.as_slice() {
            [single] => Ok(*single),
            [] => Err(ApuntarError::NoMatch {
                matcher: self.description.clone(),
            }),
            many => Err(ApuntarError::AmbiguousMatch {
                matcher: self.description.clone(),
                count: many.len(),
            }),
        }
    }
}

/// Evaluate `matcher` over every node of `snapshot`
///
/// Pre-order depth-first traversal from the declared root; O(nodes) per call,
/// no memoization (snapshots are transient).
#[must_use]
pub fn resolve(snapshot: &Snapshot, matcher: &Matcher) -> ResolvedSet {
    let ids: Vec<NodeId> = snapshot
        .iter_preorder()
        .filter(|node| matcher.matches(*node))
        .map(|node| node.id())
        .collect();
    debug!(matcher = %matcher, matches = ids.len(), "resolved matcher");
    ResolvedSet {
        ids,
        description: matcher.to_string(),
    }
}
