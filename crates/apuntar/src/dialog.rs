//! System prompt bridge.
//!
//! System dialogs (permission prompts and the like) live on a device-level
//! surface outside application control and may legitimately be absent — a
//! previously granted "don't ask again" produces no dialog at all. The bridge
//! is therefore best-effort by contract: failures to locate or click the
//! prompt button are logged and reported in the returned [`PromptOutcome`],
//! never propagated as errors. This is the only non-propagating failure path
//! in the crate; everywhere else failures surface to the caller.

use tracing::{debug, warn};

use crate::host::DeviceHost;
use crate::matcher::Matcher;
use crate::resolver::resolve;
use crate::result::{ApuntarError, ApuntarResult};

/// Outcome of a best-effort prompt resolution
///
/// Failure variants are informational; the call itself has already succeeded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptOutcome {
    /// The prompt button was found and clicked
    Clicked,
    /// No element on the device surface carried the normalized label
    NotFound,
    /// The button was found but the tap could not be delivered
    TapFailed,
}

/// Normalize a prompt label: trim surrounding whitespace, uppercase the first
/// character, lowercase the rest
///
/// Matches the capitalization the host platform uses for prompt buttons
/// ("Allow", "Deny"). Idempotent and total. If the platform's localization
/// changes its capitalization rules this fixed transform stops matching; that
/// fragility is accepted here.
#[must_use]
pub fn normalize_label(label: &str) -> String {
    let trimmed = label.trim();
    let mut chars = trimmed.chars();
    let Some(first) = chars.next() else {
        return String::new();
    };
    // Uppercasing can expand one char into several ("ß" becomes "SS");
    // only the first output char may stay uppercase, or a second pass
    // would produce a different string.
    let mut upper = first.to_uppercase();
    let head = upper.next().unwrap_or(first);
    std::iter::once(head)
        .chain(upper.flat_map(char::to_lowercase))
        .chain(chars.flat_map(char::to_lowercase))
        .collect()
}

/// Find the button labeled `label` on the device surface and click it,
/// best-effort
///
/// The label is normalized first (see [`normalize_label`]); the search is for
/// exact text equality against the normalized form. When several elements
/// carry the label, the first in traversal order is tapped — uniqueness is
/// not enforced on a surface the application does not own.
///
/// # Errors
///
/// `InvalidArgument` if `label` is empty or whitespace-only. Locate/tap
/// failures are logged via `tracing` and reported in the outcome, never as
/// errors.
pub fn resolve_system_prompt<D: DeviceHost>(
    device: &D,
    label: &str,
) -> ApuntarResult<PromptOutcome> {
    let normalized = normalize_label(label);
    if normalized.is_empty() {
        return Err(ApuntarError::InvalidArgument {
            message: "prompt label must be non-empty".to_string(),
        });
    }

    let snapshot = device.device_snapshot();
    let resolved = resolve(&snapshot, &Matcher::by_text(normalized.clone()));
    let Some(&target) = resolved.ids().first() else {
        warn!(label = %normalized, "system prompt not found; continuing");
        return Ok(PromptOutcome::NotFound);
    };

    match device.tap(target) {
        Ok(()) => {
            debug!(label = %normalized, "system prompt clicked");
            Ok(PromptOutcome::Clicked)
        }
        Err(err) => {
            warn!(label = %normalized, error = %err, "system prompt tap failed; continuing");
            Ok(PromptOutcome::TapFailed)
        }
    }
}
