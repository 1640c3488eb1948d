//! Element tree snapshots.
//!
//! A [`Snapshot`] is a point-in-time, read-only view of the UI element tree.
//! Hosts rebuild a fresh snapshot per query; nothing in this module mutates a
//! tree after it is built. Nodes are stored in an arena in pre-order, and
//! [`NodeId`] handles index into it, which keeps parent back-references cheap
//! and avoids reference cycles.

use serde::{Deserialize, Serialize};

/// Visibility state of an element node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Visibility {
    /// Element participates in layout and is drawn
    Visible,
    /// Element participates in layout but is not drawn
    Invisible,
    /// Element neither participates in layout nor is drawn
    Gone,
}

impl Visibility {
    /// Get the lowercase name used in matcher descriptions
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Visible => "visible",
            Self::Invisible => "invisible",
            Self::Gone => "gone",
        }
    }
}

impl std::fmt::Display for Visibility {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Handle to a node within a [`Snapshot`]
///
/// Ids are only meaningful for the snapshot that produced them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NodeId(pub(crate) usize);

impl NodeId {
    /// Arena index of this node
    #[must_use]
    pub const fn index(&self) -> usize {
        self.0
    }
}

/// Immutable attributes of a single element node
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ElementData {
    /// Optional widget identifier
    pub id: Option<u32>,
    /// Optional text content
    pub text: Option<String>,
    /// Optional accessibility description
    pub description: Option<String>,
    /// Visibility state
    pub visibility: Visibility,
    /// Whether the node occupies non-zero on-screen area
    pub has_onscreen_area: bool,
}

impl Default for ElementData {
    fn default() -> Self {
        Self {
            id: None,
            text: None,
            description: None,
            visibility: Visibility::Visible,
            has_onscreen_area: true,
        }
    }
}

impl ElementData {
    /// Create element data with default attributes (visible, with area)
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the widget identifier
    #[must_use]
    pub const fn with_id(mut self, id: u32) -> Self {
        self.id = Some(id);
        self
    }

    /// Set the text content
    #[must_use]
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    /// Set the accessibility description
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Set the visibility state
    #[must_use]
    pub const fn with_visibility(mut self, visibility: Visibility) -> Self {
        self.visibility = visibility;
        self
    }

    /// Set whether the node occupies on-screen area
    #[must_use]
    pub const fn with_onscreen_area(mut self, has_area: bool) -> Self {
        self.has_onscreen_area = has_area;
        self
    }
}

/// A node slot in the arena: attributes plus tree links
#[derive(Debug, Clone)]
struct NodeSlot {
    data: ElementData,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

/// A point-in-time, read-only element tree
///
/// Built once via [`SnapshotBuilder`], then only queried. The root is always
/// present; single-node trees are valid.
#[derive(Debug, Clone)]
pub struct Snapshot {
    nodes: Vec<NodeSlot>,
}

impl Snapshot {
    /// Create a snapshot containing only a root node
    #[must_use]
    pub fn with_root(root: ElementData) -> Self {
        SnapshotBuilder::new(root).build()
    }

    /// The root node
    #[must_use]
    pub fn root(&self) -> NodeRef<'_> {
        NodeRef {
            snapshot: self,
            id: NodeId(0),
        }
    }

    /// Look up a node by handle
    ///
    /// # Panics
    ///
    /// Panics if `id` did not come from this snapshot.
    #[must_use]
    pub fn node(&self, id: NodeId) -> NodeRef<'_> {
        assert!(id.0 < self.nodes.len(), "node id out of range");
        NodeRef { snapshot: self, id }
    }

    /// Total number of nodes, root included
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the snapshot has no nodes (never true for built snapshots)
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Iterate all nodes in pre-order, depth-first
    #[must_use]
    pub fn iter_preorder(&self) -> PreOrder<'_> {
        PreOrder {
            snapshot: self,
            stack: vec![NodeId(0)],
        }
    }

    /// Replace the text of a node.
    ///
    /// Only used by in-process hosts (e.g. [`crate::mock::MockHost`]) that
    /// simulate the live element store; snapshots handed to the resolver are
    /// never mutated.
    pub(crate) fn set_text(&mut self, id: NodeId, value: impl Into<String>) {
        if let Some(slot) = self.nodes.get_mut(id.0) {
            slot.data.text = Some(value.into());
        }
    }
}

/// Borrowed reference to one node of a [`Snapshot`]
#[derive(Debug, Clone, Copy)]
pub struct NodeRef<'a> {
    snapshot: &'a Snapshot,
    id: NodeId,
}

impl<'a> NodeRef<'a> {
    /// Handle of this node
    #[must_use]
    pub const fn id(&self) -> NodeId {
        self.id
    }

    /// Attributes of this node
    #[must_use]
    pub fn data(&self) -> &'a ElementData {
        &self.snapshot.nodes[self.id.0].data
    }

    /// Parent node, if any
    #[must_use]
    pub fn parent(&self) -> Option<NodeRef<'a>> {
        self.snapshot.nodes[self.id.0].parent.map(|id| NodeRef {
            snapshot: self.snapshot,
            id,
        })
    }

    /// Iterate direct children in insertion order
    pub fn children(&self) -> impl Iterator<Item = NodeRef<'a>> + '_ {
        let snapshot = self.snapshot;
        self.snapshot.nodes[self.id.0]
            .children
            .iter()
            .map(move |&id| NodeRef { snapshot, id })
    }

    /// Iterate strict ancestors, nearest first
    #[must_use]
    pub fn ancestors(&self) -> Ancestors<'a> {
        Ancestors {
            current: self.parent(),
        }
    }

    /// Whether this node is the snapshot root
    #[must_use]
    pub fn is_root(&self) -> bool {
        self.snapshot.nodes[self.id.0].parent.is_none()
    }

    /// Whether this node is displayed: effectively visible with non-zero
    /// on-screen area. Strictly stronger than the visibility state alone.
    #[must_use]
    pub fn is_displayed(&self) -> bool {
        let data = self.data();
        data.visibility == Visibility::Visible && data.has_onscreen_area
    }

    /// Text content, if any
    #[must_use]
    pub fn text(&self) -> Option<&'a str> {
        self.data().text.as_deref()
    }
}

/// Iterator over strict ancestors of a node
#[derive(Debug)]
pub struct Ancestors<'a> {
    current: Option<NodeRef<'a>>,
}

impl<'a> Iterator for Ancestors<'a> {
    type Item = NodeRef<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.current?;
        self.current = node.parent();
        Some(node)
    }
}

/// Pre-order depth-first iterator over a snapshot
#[derive(Debug)]
pub struct PreOrder<'a> {
    snapshot: &'a Snapshot,
    stack: Vec<NodeId>,
}

impl<'a> Iterator for PreOrder<'a> {
    type Item = NodeRef<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.stack.pop()?;
        let slot = &self.snapshot.nodes[id.0];
        // Reverse so the first child is visited first
        self.stack.extend(slot.children.iter().rev());
        Some(NodeRef {
            snapshot: self.snapshot,
            id,
        })
    }
}

/// Builder for element tree snapshots
///
/// Hosts (and tests) add nodes under explicit parents; `build` freezes the
/// tree.
#[derive(Debug, Clone)]
pub struct SnapshotBuilder {
    nodes: Vec<NodeSlot>,
}

impl SnapshotBuilder {
    /// Start a tree with the given root attributes
    #[must_use]
    pub fn new(root: ElementData) -> Self {
        Self {
            nodes: vec![NodeSlot {
                data: root,
                parent: None,
                children: Vec::new(),
            }],
        }
    }

    /// Handle of the root node
    #[must_use]
    pub const fn root_id(&self) -> NodeId {
        NodeId(0)
    }

    /// Add a child under `parent`, returning its handle
    ///
    /// # Panics
    ///
    /// Panics if `parent` is not a handle from this builder.
    pub fn add_child(&mut self, parent: NodeId, data: ElementData) -> NodeId {
        assert!(parent.0 < self.nodes.len(), "parent id out of range");
        let id = NodeId(self.nodes.len());
        self.nodes.push(NodeSlot {
            data,
            parent: Some(parent),
            children: Vec::new(),
        });
        self.nodes[parent.0].children.push(id);
        id
    }

    /// Freeze the tree into an immutable snapshot
    #[must_use]
    pub fn build(self) -> Snapshot {
        Snapshot { nodes: self.nodes }
    }
}
