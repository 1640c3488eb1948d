//! The caller-facing engine.
//!
//! An [`Engine`] wraps one [`UiHost`] handle and exposes the public operation
//! surface: build a matcher, resolve it against a fresh snapshot, wait for
//! the UI loop to go idle, then act or assert on the unique target. All
//! operations are synchronous and issued one at a time; handles to the
//! device surface and navigation service are passed explicitly per call, so
//! independent engines can coexist in one process.

use std::time::Duration;

use crate::action::{perform, Action};
use crate::assertion::{check, AssertionSpec};
use crate::config::EngineConfig;
use crate::dialog::{self, PromptOutcome};
use crate::host::{DeviceHost, NavigationHost, UiHost};
use crate::matcher::Matcher;
use crate::resolver::resolve;
use crate::result::{ApuntarError, ApuntarResult};
use crate::sync::Synchronizer;

/// Element-matching and action-dispatch engine over one UI host
#[derive(Debug)]
pub struct Engine<H: UiHost> {
    host: H,
    config: EngineConfig,
    sync: Synchronizer,
}

impl<H: UiHost> Engine<H> {
    /// Create an engine with the default configuration
    #[must_use]
    pub fn new(host: H) -> Self {
        Self::with_config(host, EngineConfig::default())
    }

    /// Create an engine with an explicit configuration
    #[must_use]
    pub fn with_config(host: H, config: EngineConfig) -> Self {
        let sync = Synchronizer::with_poll_interval(config.poll_interval());
        Self { host, config, sync }
    }

    /// The wrapped host handle
    #[must_use]
    pub const fn host(&self) -> &H {
        &self.host
    }

    /// The engine configuration
    #[must_use]
    pub const fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Block until the UI loop is idle, using the configured timeout
    fn settle(&self) -> ApuntarResult<()> {
        self.settle_within(self.config.idle_timeout())
    }

    fn settle_within(&self, timeout: Duration) -> ApuntarResult<()> {
        self.sync.await_idle(&self.host, timeout)?;
        Ok(())
    }

    // ------------------------------------------------------------------
    // Click operations
    // ------------------------------------------------------------------

    /// Click the single displayed element `matcher` resolves to
    ///
    /// # Errors
    ///
    /// `Timeout` if the UI loop never idles; `NoMatch`/`AmbiguousMatch` if
    /// the matcher does not resolve to exactly one displayed node;
    /// `DispatchFailed` if the host rejects the gesture.
    pub fn click(&self, matcher: &Matcher) -> ApuntarResult<()> {
        self.act(matcher, &Action::Click, self.config.idle_timeout())
    }

    /// [`Self::click`] with a per-call idle timeout
    ///
    /// # Errors
    ///
    /// As [`Self::click`].
    pub fn click_with_timeout(
        &self,
        matcher: &Matcher,
        timeout: Duration,
    ) -> ApuntarResult<()> {
        self.act(matcher, &Action::Click, timeout)
    }

    /// Click the element matching `matcher` whose parent matches `parent`
    ///
    /// # Errors
    ///
    /// As [`Self::click`].
    pub fn click_within_parent(
        &self,
        matcher: &Matcher,
        parent: &Matcher,
    ) -> ApuntarResult<()> {
        let composed = matcher.clone().and(Matcher::with_parent(parent.clone()));
        self.click(&composed)
    }

    /// Click the element with this widget id
    ///
    /// # Errors
    ///
    /// As [`Self::click`].
    pub fn click_id(&self, id: u32) -> ApuntarResult<()> {
        self.click(&Matcher::by_id(id))
    }

    /// Click the element with this exact text
    ///
    /// # Errors
    ///
    /// As [`Self::click`].
    pub fn click_text(&self, text: impl Into<String>) -> ApuntarResult<()> {
        self.click(&Matcher::by_text(text))
    }

    /// Click the element with this accessibility description
    ///
    /// # Errors
    ///
    /// As [`Self::click`].
    pub fn click_description(&self, description: impl Into<String>) -> ApuntarResult<()> {
        self.click(&Matcher::by_description(description))
    }

    /// Click the element carrying both this widget id and this text
    ///
    /// # Errors
    ///
    /// As [`Self::click`].
    pub fn click_id_with_text(&self, id: u32, text: impl Into<String>) -> ApuntarResult<()> {
        self.click(&Matcher::by_id(id).and(Matcher::by_text(text)))
    }

    /// Click the element carrying both this widget id and this accessibility
    /// description
    ///
    /// # Errors
    ///
    /// As [`Self::click`].
    pub fn click_id_with_description(
        &self,
        id: u32,
        description: impl Into<String>,
    ) -> ApuntarResult<()> {
        self.click(&Matcher::by_id(id).and(Matcher::by_description(description)))
    }

    /// Click the element with this description under a parent with this id
    ///
    /// # Errors
    ///
    /// As [`Self::click`].
    pub fn click_description_within_parent(
        &self,
        description: impl Into<String>,
        parent_id: u32,
    ) -> ApuntarResult<()> {
        self.click_within_parent(
            &Matcher::by_description(description),
            &Matcher::by_id(parent_id),
        )
    }

    /// Long-click the item with `text` somewhere inside a container matching
    /// `container`
    ///
    /// Generalized list-item lookup: the target must have the exact text, be
    /// effectively visible, and have a strict ancestor matching `container`.
    ///
    /// # Errors
    ///
    /// `InvalidArgument` if `text` is empty; otherwise as [`Self::click`].
    pub fn long_click_item(
        &self,
        container: &Matcher,
        text: &str,
    ) -> ApuntarResult<()> {
        if text.is_empty() {
            return Err(ApuntarError::InvalidArgument {
                message: "item text must be non-empty".to_string(),
            });
        }
        let matcher = Matcher::by_text(text)
            .and(Matcher::descendant_of(container.clone()))
            .and(Matcher::by_visibility(crate::element::Visibility::Visible));
        self.act(&matcher, &Action::LongClick, self.config.idle_timeout())
    }

    // ------------------------------------------------------------------
    // Text input
    // ------------------------------------------------------------------

    /// Replace the text of the editable element with this widget id, then
    /// dismiss the soft keyboard
    ///
    /// # Errors
    ///
    /// As [`Self::click`], judged against the id matcher.
    pub fn input_text(&self, id: u32, text: impl Into<String>) -> ApuntarResult<()> {
        self.settle()?;
        let snapshot = self.host.snapshot();
        let resolved = resolve(&snapshot, &Matcher::by_id(id));
        perform(&self.host, &resolved, &Action::ReplaceText(text.into()))
    }

    // ------------------------------------------------------------------
    // Assertions
    // ------------------------------------------------------------------

    /// Assert exactly one match exists and is displayed
    ///
    /// # Errors
    ///
    /// `Timeout` or `AssertionFailed`.
    pub fn assert_displayed(&self, matcher: &Matcher) -> ApuntarResult<()> {
        self.check(matcher, &AssertionSpec::Displayed)
    }

    /// Assert no displayed match exists (zero matches also passes)
    ///
    /// # Errors
    ///
    /// `Timeout` or `AssertionFailed`.
    pub fn assert_not_displayed(&self, matcher: &Matcher) -> ApuntarResult<()> {
        self.check(matcher, &AssertionSpec::NotDisplayed)
    }

    /// Assert the single visible match has exactly this text
    ///
    /// # Errors
    ///
    /// `Timeout`, `AmbiguousMatch`, or `AssertionFailed`.
    pub fn assert_text_equals(
        &self,
        matcher: &Matcher,
        text: impl Into<String>,
    ) -> ApuntarResult<()> {
        self.check(matcher, &AssertionSpec::TextEquals(text.into()))
    }

    /// Assert the element with this widget id is displayed
    ///
    /// # Errors
    ///
    /// As [`Self::assert_displayed`].
    pub fn assert_id_displayed(&self, id: u32) -> ApuntarResult<()> {
        self.assert_displayed(&Matcher::by_id(id))
    }

    /// Assert the element with this widget id and this text is displayed
    ///
    /// # Errors
    ///
    /// As [`Self::assert_displayed`].
    pub fn assert_text_with_id(&self, text: impl Into<String>, id: u32) -> ApuntarResult<()> {
        self.assert_displayed(&Matcher::by_text(text).and(Matcher::by_id(id)))
    }

    // ------------------------------------------------------------------
    // Waiting and bridges
    // ------------------------------------------------------------------

    /// Block the UI loop for at least `min_millis`
    ///
    /// Last-resort delay; prefer the idle waiting every operation already
    /// performs. Guarantees a lower bound only.
    pub fn wait_for(&self, min_millis: u64) {
        self.sync
            .force_delay(&self.host, Duration::from_millis(min_millis));
    }

    /// Best-effort: click a system prompt button labeled `label` on the
    /// device surface
    ///
    /// # Errors
    ///
    /// `InvalidArgument` for an empty label; locate/tap failures are logged
    /// and reported in the [`PromptOutcome`], never as errors.
    pub fn resolve_system_prompt<D: DeviceHost>(
        &self,
        device: &D,
        label: &str,
    ) -> ApuntarResult<PromptOutcome> {
        dialog::resolve_system_prompt(device, label)
    }

    /// Send the foreground process to the system home surface
    ///
    /// # Errors
    ///
    /// Whatever the navigation service reports; the engine adds nothing.
    pub fn navigate_home<N: NavigationHost>(&self, nav: &N) -> ApuntarResult<()> {
        nav.go_home()
    }

    /// Bring `destination` to the foreground
    ///
    /// # Errors
    ///
    /// Whatever the navigation service reports; the engine adds nothing.
    pub fn navigate_to<N: NavigationHost>(
        &self,
        nav: &N,
        destination: &str,
    ) -> ApuntarResult<()> {
        nav.bring_to_front(destination)
    }

    // ------------------------------------------------------------------
    // Internals
    // ------------------------------------------------------------------

    fn act(&self, matcher: &Matcher, action: &Action, timeout: Duration) -> ApuntarResult<()> {
        self.settle_within(timeout)?;
        let snapshot = self.host.snapshot();
        let resolved = resolve(&snapshot, matcher).displayed_only(&snapshot);
        perform(&self.host, &resolved, action)
    }

    fn check(&self, matcher: &Matcher, spec: &AssertionSpec) -> ApuntarResult<()> {
        self.settle()?;
        let snapshot = self.host.snapshot();
        check(&snapshot, matcher, spec)
    }
}
