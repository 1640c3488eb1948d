//! Semantic actions and their executor.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::host::UiHost;
use crate::resolver::ResolvedSet;
use crate::result::ApuntarResult;

/// A semantic action applied to a resolved element (or to the UI loop)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Action {
    /// Dispatch a click gesture
    Click,
    /// Dispatch a long-click gesture
    LongClick,
    /// Replace the node's text, then dismiss the soft keyboard.
    /// The two steps are a fixed sequence, not independently invokable.
    ReplaceText(String),
    /// Dismiss the soft keyboard only
    CloseSoftInput,
    /// Block the UI loop for at least this many milliseconds
    Sleep(u64),
}

impl Action {
    /// Whether this action targets a resolved node (as opposed to the loop
    /// or the input affordance)
    #[must_use]
    pub const fn targets_node(&self) -> bool {
        matches!(self, Self::Click | Self::LongClick | Self::ReplaceText(_))
    }
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Click => write!(f, "click"),
            Self::LongClick => write!(f, "long-click"),
            Self::ReplaceText(value) => write!(f, "replace-text({value:?})"),
            Self::CloseSoftInput => write!(f, "close-soft-input"),
            Self::Sleep(ms) => write!(f, "sleep({ms}ms)"),
        }
    }
}

/// Apply `action` to the resolved target on the host's UI loop
///
/// Node-targeting actions enforce the uniqueness contract before any dispatch
/// is attempted: zero matches fail with `NoMatch`, more than one with
/// `AmbiguousMatch`, and no partial side effect ever occurs.
///
/// # Errors
///
/// `NoMatch`/`AmbiguousMatch` on cardinality violations; `DispatchFailed`
/// when the host rejects the gesture or edit.
pub fn perform<H: UiHost>(
    host: &H,
    resolved: &ResolvedSet,
    action: &Action,
) -> ApuntarResult<()> {
    if action.targets_node() {
        let target = resolved.require_single()?;
        debug!(action = %action, target = target.index(), "dispatching action");
        match action {
            Action::Click => host.click(target)?,
            Action::LongClick => host.long_click(target)?,
            Action::ReplaceText(value) => {
                host.replace_text(target, value)?;
                host.close_soft_input()?;
            }
            _ => unreachable!("targets_node covers exactly these variants"),
        }
        return Ok(());
    }

    match action {
        Action::CloseSoftInput => host.close_soft_input(),
        Action::Sleep(ms) => {
            host.force_delay(Duration::from_millis(*ms));
            Ok(())
        }
        _ => unreachable!("node-targeting variants handled above"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::{ElementData, Snapshot, SnapshotBuilder};
    use crate::matcher::Matcher;
    use crate::mock::{HostEvent, MockHost};
    use crate::resolver::resolve;
    use crate::result::ApuntarError;

    fn host_with_two_ok() -> MockHost {
        let mut builder = SnapshotBuilder::new(ElementData::new());
        builder.add_child(builder.root_id(), ElementData::new().with_text("OK"));
        builder.add_child(builder.root_id(), ElementData::new().with_text("OK"));
        MockHost::new(builder.build())
    }

    mod display_tests {
        use super::*;

        #[test]
        fn test_action_descriptions() {
            assert_eq!(Action::Click.to_string(), "click");
            assert_eq!(Action::LongClick.to_string(), "long-click");
            assert_eq!(
                Action::ReplaceText("hi".into()).to_string(),
                "replace-text(\"hi\")"
            );
            assert_eq!(Action::CloseSoftInput.to_string(), "close-soft-input");
            assert_eq!(Action::Sleep(250).to_string(), "sleep(250ms)");
        }

        #[test]
        fn test_targets_node() {
            assert!(Action::Click.targets_node());
            assert!(Action::LongClick.targets_node());
            assert!(Action::ReplaceText(String::new()).targets_node());
            assert!(!Action::CloseSoftInput.targets_node());
            assert!(!Action::Sleep(0).targets_node());
        }
    }

    mod cardinality_tests {
        use super::*;

        #[test]
        fn test_click_fails_fast_on_zero_matches() {
            let host = host_with_two_ok();
            let snapshot = host.snapshot();
            let resolved = resolve(&snapshot, &Matcher::by_text("missing"));
            let result = perform(&host, &resolved, &Action::Click);
            assert!(matches!(result, Err(ApuntarError::NoMatch { .. })));
            // No dispatch was attempted.
            assert!(host.events().is_empty());
        }

        #[test]
        fn test_click_fails_fast_on_two_matches() {
            let host = host_with_two_ok();
            let snapshot = host.snapshot();
            let resolved = resolve(&snapshot, &Matcher::by_text("OK"));
            let result = perform(&host, &resolved, &Action::Click);
            assert!(matches!(
                result,
                Err(ApuntarError::AmbiguousMatch { count: 2, .. })
            ));
            assert!(host.events().is_empty());
        }

        #[test]
        fn test_replace_text_fails_fast_without_partial_effects() {
            let host = host_with_two_ok();
            let snapshot = host.snapshot();
            let resolved = resolve(&snapshot, &Matcher::by_text("OK"));
            let result = perform(&host, &resolved, &Action::ReplaceText("x".into()));
            assert!(result.is_err());
            assert!(host.events().is_empty());
        }
    }

    mod dispatch_tests {
        use super::*;

        #[test]
        fn test_click_dispatches_once() {
            let host = MockHost::new(Snapshot::with_root(ElementData::new().with_id(1)));
            let snapshot = host.snapshot();
            let resolved = resolve(&snapshot, &Matcher::by_id(1));
            perform(&host, &resolved, &Action::Click).unwrap();
            let events = host.events();
            assert_eq!(events.len(), 1);
            assert!(matches!(events[0], HostEvent::Click(_)));
        }

        #[test]
        fn test_replace_text_then_closes_soft_input() {
            let host = MockHost::new(Snapshot::with_root(ElementData::new().with_id(7)));
            let snapshot = host.snapshot();
            let resolved = resolve(&snapshot, &Matcher::by_id(7));
            perform(&host, &resolved, &Action::ReplaceText("hello".into())).unwrap();
            let events = host.events();
            assert_eq!(events.len(), 2);
            assert!(matches!(events[0], HostEvent::ReplaceText(_, ref v) if v == "hello"));
            assert!(matches!(events[1], HostEvent::CloseSoftInput));
        }

        #[test]
        fn test_close_soft_input_alone() {
            let host = MockHost::new(Snapshot::with_root(ElementData::new()));
            let snapshot = host.snapshot();
            let resolved = resolve(&snapshot, &Matcher::by_id(99));
            // CloseSoftInput ignores the (empty) resolved set.
            perform(&host, &resolved, &Action::CloseSoftInput).unwrap();
            assert_eq!(host.events(), vec![HostEvent::CloseSoftInput]);
        }

        #[test]
        fn test_sleep_delegates_to_force_delay() {
            let host = MockHost::new(Snapshot::with_root(ElementData::new()));
            let snapshot = host.snapshot();
            let resolved = resolve(&snapshot, &Matcher::is_root());
            perform(&host, &resolved, &Action::Sleep(10)).unwrap();
            assert_eq!(host.events(), vec![HostEvent::ForceDelay(10)]);
        }
    }

    mod serde_tests {
        use super::*;

        #[test]
        fn test_action_round_trips_through_json() {
            let action = Action::ReplaceText("hello".into());
            let json = serde_json::to_string(&action).unwrap();
            let back: Action = serde_json::from_str(&json).unwrap();
            assert_eq!(action, back);
        }
    }
}
