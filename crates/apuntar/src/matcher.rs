//! Composable element matchers.
//!
//! A [`Matcher`] is an immutable predicate value over a single element node.
//! Leaves test one attribute; combinators nest arbitrarily. Matchers are pure
//! and total: a missing attribute simply fails the leaf, it never errors.
//!
//! The `Display` rendering of a matcher is the description that appears in
//! every surfaced `NoMatch`/`AmbiguousMatch`/`AssertionFailed` error.

use serde::{Deserialize, Serialize};

use crate::element::{NodeRef, Visibility};

/// A composable predicate over one element node
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Matcher {
    /// Node has this widget identifier
    ById(u32),
    /// Node has exactly this text (case-sensitive, no trimming)
    ByText(String),
    /// Node has exactly this accessibility description
    ByDescription(String),
    /// Node has this visibility state
    ByEffectiveVisibility(Visibility),
    /// Node is the tree root
    IsRoot,
    /// Every child matcher matches (short-circuits on first failure)
    And(Vec<Matcher>),
    /// At least one child matcher matches (short-circuits on first success)
    Or(Vec<Matcher>),
    /// The child matcher does not match
    Not(Box<Matcher>),
    /// Node has a parent and the parent matches
    WithParent(Box<Matcher>),
    /// Some strict ancestor of the node matches
    IsDescendantOf(Box<Matcher>),
}

impl Matcher {
    /// Match by widget identifier
    #[must_use]
    pub const fn by_id(id: u32) -> Self {
        Self::ById(id)
    }

    /// Match by exact text
    #[must_use]
    pub fn by_text(text: impl Into<String>) -> Self {
        Self::ByText(text.into())
    }

    /// Match by exact accessibility description
    #[must_use]
    pub fn by_description(description: impl Into<String>) -> Self {
        Self::ByDescription(description.into())
    }

    /// Match by visibility state
    #[must_use]
    pub const fn by_visibility(visibility: Visibility) -> Self {
        Self::ByEffectiveVisibility(visibility)
    }

    /// Match the tree root
    #[must_use]
    pub const fn is_root() -> Self {
        Self::IsRoot
    }

    /// Require `self` and `other` to both match
    ///
    /// Folds into an existing `And` list so chained calls stay flat.
    #[must_use]
    pub fn and(self, other: Self) -> Self {
        match self {
            Self::And(mut list) => {
                list.push(other);
                Self::And(list)
            }
            first => Self::And(vec![first, other]),
        }
    }

    /// Require `self` or `other` to match
    #[must_use]
    pub fn or(self, other: Self) -> Self {
        match self {
            Self::Or(mut list) => {
                list.push(other);
                Self::Or(list)
            }
            first => Self::Or(vec![first, other]),
        }
    }

    /// Invert this matcher
    #[must_use]
    pub fn negate(self) -> Self {
        Self::Not(Box::new(self))
    }

    /// Require the node's parent to match `parent`
    #[must_use]
    pub fn with_parent(parent: Self) -> Self {
        Self::WithParent(Box::new(parent))
    }

    /// Require some strict ancestor to match `ancestor`
    #[must_use]
    pub fn descendant_of(ancestor: Self) -> Self {
        Self::IsDescendantOf(Box::new(ancestor))
    }

    /// Evaluate this matcher against a node
    ///
    /// Pure and total: never mutates the snapshot, never fails.
    #[must_use]
    pub fn matches(&self, node: NodeRef<'_>) -> bool {
        match self {
            Self::ById(id) => node.data().id == Some(*id),
            Self::ByText(text) => node.data().text.as_deref() == Some(text.as_str()),
            Self::ByDescription(desc) => {
                node.data().description.as_deref() == Some(desc.as_str())
            }
            Self::ByEffectiveVisibility(visibility) => node.data().visibility == *visibility,
            Self::IsRoot => node.is_root(),
            Self::And(list) => list.iter().all(|m| m.matches(node)),
            Self::Or(list) => list.iter().any(|m| m.matches(node)),
            Self::Not(inner) => !inner.matches(node),
            Self::WithParent(inner) => node.parent().is_some_and(|p| inner.matches(p)),
            Self::IsDescendantOf(inner) => node.ancestors().any(|a| inner.matches(a)),
        }
    }
}

impl std::fmt::Display for Matcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ById(id) => write!(f, "id={id}"),
            Self::ByText(text) => write!(f, "text={text:?}"),
            Self::ByDescription(desc) => write!(f, "description={desc:?}"),
            Self::ByEffectiveVisibility(visibility) => write!(f, "visibility={visibility}"),
            Self::IsRoot => write!(f, "is-root"),
            Self::And(list) => write_joined(f, list, " and "),
            Self::Or(list) => write_joined(f, list, " or "),
            Self::Not(inner) => write!(f, "not({inner})"),
            Self::WithParent(inner) => write!(f, "parent({inner})"),
            Self::IsDescendantOf(inner) => write!(f, "descendant-of({inner})"),
        }
    }
}

fn write_joined(
    f: &mut std::fmt::Formatter<'_>,
    list: &[Matcher],
    sep: &str,
) -> std::fmt::Result {
    write!(f, "(")?;
    for (i, m) in list.iter().enumerate() {
        if i > 0 {
            write!(f, "{sep}")?;
        }
        write!(f, "{m}")?;
    }
    write!(f, ")")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::{ElementData, Snapshot, SnapshotBuilder};

    fn leaf_tree() -> Snapshot {
        // root
        // └── child (id=5, text="OK", desc="confirm")
        let mut builder = SnapshotBuilder::new(ElementData::new());
        builder.add_child(
            builder.root_id(),
            ElementData::new()
                .with_id(5)
                .with_text("OK")
                .with_description("confirm"),
        );
        builder.build()
    }

    fn child_of<'a>(snapshot: &'a Snapshot) -> crate::element::NodeRef<'a> {
        snapshot.root().children().next().unwrap()
    }

    mod leaf_tests {
        use super::*;

        #[test]
        fn test_by_id() {
            let snapshot = leaf_tree();
            let child = child_of(&snapshot);
            assert!(Matcher::by_id(5).matches(child));
            assert!(!Matcher::by_id(6).matches(child));
            assert!(!Matcher::by_id(5).matches(snapshot.root()));
        }

        #[test]
        fn test_by_text_is_exact() {
            let snapshot = leaf_tree();
            let child = child_of(&snapshot);
            assert!(Matcher::by_text("OK").matches(child));
            assert!(!Matcher::by_text("ok").matches(child));
            assert!(!Matcher::by_text("OK ").matches(child));
        }

        #[test]
        fn test_by_description() {
            let snapshot = leaf_tree();
            let child = child_of(&snapshot);
            assert!(Matcher::by_description("confirm").matches(child));
            assert!(!Matcher::by_description("cancel").matches(child));
        }

        #[test]
        fn test_by_visibility() {
            let snapshot = Snapshot::with_root(
                ElementData::new().with_visibility(Visibility::Invisible),
            );
            assert!(Matcher::by_visibility(Visibility::Invisible).matches(snapshot.root()));
            assert!(!Matcher::by_visibility(Visibility::Visible).matches(snapshot.root()));
        }

        #[test]
        fn test_is_root() {
            let snapshot = leaf_tree();
            assert!(Matcher::is_root().matches(snapshot.root()));
            assert!(!Matcher::is_root().matches(child_of(&snapshot)));
        }

        #[test]
        fn test_missing_attribute_fails_leaf() {
            // Total over malformed input: absent fields fail, never error.
            let snapshot = Snapshot::with_root(ElementData::new());
            assert!(!Matcher::by_id(1).matches(snapshot.root()));
            assert!(!Matcher::by_text("x").matches(snapshot.root()));
            assert!(!Matcher::by_description("x").matches(snapshot.root()));
        }
    }

    mod combinator_tests {
        use super::*;

        #[test]
        fn test_and_requires_all() {
            let snapshot = leaf_tree();
            let child = child_of(&snapshot);
            assert!(Matcher::by_id(5).and(Matcher::by_text("OK")).matches(child));
            assert!(!Matcher::by_id(5).and(Matcher::by_text("NO")).matches(child));
        }

        #[test]
        fn test_and_chain_stays_flat() {
            let m = Matcher::by_id(1)
                .and(Matcher::by_text("a"))
                .and(Matcher::by_description("b"));
            match m {
                Matcher::And(list) => assert_eq!(list.len(), 3),
                other => panic!("expected And, got {other:?}"),
            }
        }

        #[test]
        fn test_or_requires_any() {
            let snapshot = leaf_tree();
            let child = child_of(&snapshot);
            assert!(Matcher::by_id(9).or(Matcher::by_text("OK")).matches(child));
            assert!(!Matcher::by_id(9).or(Matcher::by_text("NO")).matches(child));
        }

        #[test]
        fn test_not_inverts() {
            let snapshot = leaf_tree();
            let child = child_of(&snapshot);
            assert!(Matcher::by_id(9).negate().matches(child));
            assert!(!Matcher::by_id(5).negate().matches(child));
        }

        #[test]
        fn test_with_parent() {
            let snapshot = leaf_tree();
            let child = child_of(&snapshot);
            assert!(Matcher::with_parent(Matcher::is_root()).matches(child));
            // The root has no parent, so WithParent always fails on it.
            assert!(!Matcher::with_parent(Matcher::is_root()).matches(snapshot.root()));
        }

        #[test]
        fn test_with_parent_nests_to_grandparent() {
            // root ── mid (id=10) ── leaf (id=11)
            let mut builder = SnapshotBuilder::new(ElementData::new());
            let mid = builder.add_child(builder.root_id(), ElementData::new().with_id(10));
            builder.add_child(mid, ElementData::new().with_id(11));
            let snapshot = builder.build();
            let leaf = snapshot
                .iter_preorder()
                .find(|n| n.data().id == Some(11))
                .unwrap();

            let grandparent_is_root =
                Matcher::with_parent(Matcher::with_parent(Matcher::is_root()));
            assert!(grandparent_is_root.matches(leaf));
        }

        #[test]
        fn test_is_descendant_of_strict_ancestors_only() {
            let mut builder = SnapshotBuilder::new(ElementData::new().with_id(1));
            let mid = builder.add_child(builder.root_id(), ElementData::new().with_id(2));
            builder.add_child(mid, ElementData::new().with_id(3));
            let snapshot = builder.build();
            let leaf = snapshot
                .iter_preorder()
                .find(|n| n.data().id == Some(3))
                .unwrap();

            assert!(Matcher::descendant_of(Matcher::by_id(1)).matches(leaf));
            assert!(Matcher::descendant_of(Matcher::by_id(2)).matches(leaf));
            // A node is not its own ancestor.
            assert!(!Matcher::descendant_of(Matcher::by_id(3)).matches(leaf));
        }

        #[test]
        fn test_deep_nesting() {
            // "descendant of a container AND has this text AND is visible"
            let mut builder =
                SnapshotBuilder::new(ElementData::new().with_description("list"));
            builder.add_child(
                builder.root_id(),
                ElementData::new().with_text("Item 3"),
            );
            let snapshot = builder.build();
            let item = snapshot.root().children().next().unwrap();

            let m = Matcher::descendant_of(Matcher::by_description("list"))
                .and(Matcher::by_text("Item 3"))
                .and(Matcher::by_visibility(Visibility::Visible));
            assert!(m.matches(item));
        }
    }

    mod display_tests {
        use super::*;

        #[test]
        fn test_leaf_descriptions() {
            assert_eq!(Matcher::by_id(42).to_string(), "id=42");
            assert_eq!(Matcher::by_text("OK").to_string(), "text=\"OK\"");
            assert_eq!(
                Matcher::by_visibility(Visibility::Gone).to_string(),
                "visibility=gone"
            );
            assert_eq!(Matcher::is_root().to_string(), "is-root");
        }

        #[test]
        fn test_combinator_descriptions() {
            let m = Matcher::by_id(1).and(Matcher::by_text("a"));
            assert_eq!(m.to_string(), "(id=1 and text=\"a\")");

            let m = Matcher::by_id(1).or(Matcher::by_id(2));
            assert_eq!(m.to_string(), "(id=1 or id=2)");

            assert_eq!(Matcher::by_id(1).negate().to_string(), "not(id=1)");
            assert_eq!(
                Matcher::with_parent(Matcher::by_id(3)).to_string(),
                "parent(id=3)"
            );
            assert_eq!(
                Matcher::descendant_of(Matcher::by_id(3)).to_string(),
                "descendant-of(id=3)"
            );
        }
    }

    mod serde_tests {
        use super::*;

        #[test]
        fn test_matcher_round_trips_through_json() {
            let m = Matcher::descendant_of(Matcher::by_description("list"))
                .and(Matcher::by_text("Item 3"));
            let json = serde_json::to_string(&m).unwrap();
            let back: Matcher = serde_json::from_str(&json).unwrap();
            assert_eq!(m, back);
        }
    }
}
