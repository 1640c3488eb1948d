//! Assertions over resolved elements.

use serde::{Deserialize, Serialize};

use crate::element::{Snapshot, Visibility};
use crate::matcher::Matcher;
use crate::resolver::resolve;
use crate::result::{ApuntarError, ApuntarResult};

/// A predicate asserted against the elements a matcher resolves to
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum AssertionSpec {
    /// Exactly one match, effectively visible with non-zero on-screen area
    Displayed,
    /// No match is visible-with-area; zero matches also succeeds
    NotDisplayed,
    /// Exactly one visible match whose text equals this exactly
    /// (case-sensitive, no trimming)
    TextEquals(String),
}

impl std::fmt::Display for AssertionSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Displayed => write!(f, "displayed"),
            Self::NotDisplayed => write!(f, "not-displayed"),
            Self::TextEquals(text) => write!(f, "text-equals({text:?})"),
        }
    }
}

/// Evaluate `spec` for the nodes `matcher` resolves to in `snapshot`
///
/// `Displayed` and `TextEquals` require exactly one qualifying match.
/// `NotDisplayed` tolerates zero matches by design — an element that was
/// never in the tree is as "not displayed" as one that is hidden. This
/// asymmetry with `Displayed` is deliberate.
///
/// # Errors
///
/// `AssertionFailed` when the predicate is false; `AmbiguousMatch` when
/// `TextEquals` resolves to several visible candidates.
pub fn check(
    snapshot: &Snapshot,
    matcher: &Matcher,
    spec: &AssertionSpec,
) -> ApuntarResult<()> {
    match spec {
        AssertionSpec::Displayed => check_displayed(snapshot, matcher),
        AssertionSpec::NotDisplayed => check_not_displayed(snapshot, matcher),
        AssertionSpec::TextEquals(expected) => check_text_equals(snapshot, matcher, expected),
    }
}

fn check_displayed(snapshot: &Snapshot, matcher: &Matcher) -> ApuntarResult<()> {
    let resolved = resolve(snapshot, matcher);
    if resolved.len() != 1 {
        return Err(failed(
            AssertionSpec::Displayed,
            matcher,
            format!("matched {} nodes, expected exactly one", resolved.len()),
        ));
    }
    let node = snapshot.node(resolved.ids()[0]);
    if node.is_displayed() {
        Ok(())
    } else {
        Err(failed(
            AssertionSpec::Displayed,
            matcher,
            format!(
                "sole match has visibility={} and {} on-screen area",
                node.data().visibility,
                if node.data().has_onscreen_area {
                    "non-zero"
                } else {
                    "zero"
                }
            ),
        ))
    }
}

fn check_not_displayed(snapshot: &Snapshot, matcher: &Matcher) -> ApuntarResult<()> {
    let resolved = resolve(snapshot, matcher);
    let shown = resolved
        .ids()
        .iter()
        .filter(|&&id| snapshot.node(id).is_displayed())
        .count();
    if shown == 0 {
        Ok(())
    } else {
        Err(failed(
            AssertionSpec::NotDisplayed,
            matcher,
            format!("{shown} of {} matched nodes displayed", resolved.len()),
        ))
    }
}

fn check_text_equals(
    snapshot: &Snapshot,
    matcher: &Matcher,
    expected: &str,
) -> ApuntarResult<()> {
    let visible = matcher
        .clone()
        .and(Matcher::by_visibility(Visibility::Visible));
    let node = resolve(snapshot, &visible).require_single().map_err(|e| {
        match e {
            // Zero visible matches means the predicate is false, not a
            // resolution bug; ambiguity still surfaces as ambiguity.
            ApuntarError::NoMatch { matcher } => failed_raw(
                AssertionSpec::TextEquals(expected.to_string()),
                matcher,
                "no visible match".to_string(),
            ),
            other => other,
        }
    })?;
    let actual = snapshot.node(node).text();
    if actual == Some(expected) {
        Ok(())
    } else {
        Err(failed(
            AssertionSpec::TextEquals(expected.to_string()),
            matcher,
            format!("actual text was {actual:?}"),
        ))
    }
}

fn failed(spec: AssertionSpec, matcher: &Matcher, message: String) -> ApuntarError {
    failed_raw(spec, matcher.to_string(), message)
}

fn failed_raw(spec: AssertionSpec, matcher: String, message: String) -> ApuntarError {
    ApuntarError::AssertionFailed {
        assertion: spec.to_string(),
        matcher,
        message,
    }
}
