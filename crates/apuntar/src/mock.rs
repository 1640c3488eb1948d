//! Recording host for tests.
//!
//! [`MockHost`] implements all three collaborator traits against an in-memory
//! element store. Every gesture, edit, and navigation request is recorded as
//! a [`HostEvent`] so tests can assert exactly what the engine dispatched —
//! and in what order.

use std::sync::Mutex;
use std::time::Duration;

use crate::element::{NodeId, Snapshot};
use crate::host::{DeviceHost, NavigationHost, UiHost};
use crate::result::{ApuntarError, ApuntarResult};

/// One observable interaction with the mock host
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostEvent {
    /// Click dispatched to a node
    Click(NodeId),
    /// Long-click dispatched to a node
    LongClick(NodeId),
    /// Text replaced on a node
    ReplaceText(NodeId, String),
    /// Soft input dismissed
    CloseSoftInput,
    /// UI loop blocked for this many milliseconds
    ForceDelay(u64),
    /// Tap dispatched on the device surface
    Tap(NodeId),
    /// Navigation to the home surface
    Home,
    /// Named destination brought to the foreground
    BringToFront(String),
}

/// In-memory host simulating a live UI for tests
///
/// The mock owns a mutable element store and emits an immutable snapshot per
/// query, the way a real host's UI loop owns element state. `replace_text`
/// mutates the store, so a later snapshot observes the new text.
#[derive(Debug)]
pub struct MockHost {
    snapshot: Mutex<Snapshot>,
    device_snapshot: Mutex<Option<Snapshot>>,
    busy_checks: Mutex<u32>,
    events: Mutex<Vec<HostEvent>>,
    fail_dispatch: Mutex<Option<String>>,
}

impl MockHost {
    /// Create a mock whose application surface shows `snapshot`
    #[must_use]
    pub fn new(snapshot: Snapshot) -> Self {
        Self {
            snapshot: Mutex::new(snapshot),
            device_snapshot: Mutex::new(None),
            busy_checks: Mutex::new(0),
            events: Mutex::new(Vec::new()),
            fail_dispatch: Mutex::new(None),
        }
    }

    /// Set the device-level surface used by the system prompt bridge
    ///
    /// Without one, the device surface is an empty root — no prompt present.
    pub fn set_device_snapshot(&self, snapshot: Snapshot) {
        *self.device_snapshot.lock().unwrap() = Some(snapshot);
    }

    /// Report "busy" for the next `checks` idle polls, then idle
    pub fn set_busy_checks(&self, checks: u32) {
        *self.busy_checks.lock().unwrap() = checks;
    }

    /// Make the next gesture/edit dispatch fail with this message
    pub fn fail_next_dispatch(&self, message: impl Into<String>) {
        *self.fail_dispatch.lock().unwrap() = Some(message.into());
    }

    /// Everything dispatched so far, in order
    #[must_use]
    pub fn events(&self) -> Vec<HostEvent> {
        self.events.lock().unwrap().clone()
    }

    /// Number of recorded events matching `predicate`
    #[must_use]
    pub fn count_events(&self, predicate: impl Fn(&HostEvent) -> bool) -> usize {
        self.events.lock().unwrap().iter().filter(|e| predicate(e)).count()
    }

    fn record(&self, event: HostEvent) {
        self.events.lock().unwrap().push(event);
    }

    fn take_failure(&self, action: &str) -> ApuntarResult<()> {
        match self.fail_dispatch.lock().unwrap().take() {
            Some(message) => Err(ApuntarError::DispatchFailed {
                action: action.to_string(),
                message,
            }),
            None => Ok(()),
        }
    }
}

impl UiHost for MockHost {
    fn snapshot(&self) -> Snapshot {
        self.snapshot.lock().unwrap().clone()
    }

    fn is_idle(&self) -> bool {
        let mut busy = self.busy_checks.lock().unwrap();
        if *busy == 0 {
            true
        } else {
            *busy = busy.saturating_sub(1);
            false
        }
    }

    fn click(&self, node: NodeId) -> ApuntarResult<()> {
        self.take_failure("click")?;
        self.record(HostEvent::Click(node));
        Ok(())
    }

    fn long_click(&self, node: NodeId) -> ApuntarResult<()> {
        self.take_failure("long-click")?;
        self.record(HostEvent::LongClick(node));
        Ok(())
    }

    fn replace_text(&self, node: NodeId, value: &str) -> ApuntarResult<()> {
        self.take_failure("replace-text")?;
        self.snapshot.lock().unwrap().set_text(node, value);
        self.record(HostEvent::ReplaceText(node, value.to_string()));
        Ok(())
    }

    fn close_soft_input(&self) -> ApuntarResult<()> {
        self.record(HostEvent::CloseSoftInput);
        Ok(())
    }

    fn force_delay(&self, min: Duration) {
        self.record(HostEvent::ForceDelay(min.as_millis() as u64));
        std::thread::sleep(min);
    }
}

impl DeviceHost for MockHost {
    fn device_snapshot(&self) -> Snapshot {
        self.device_snapshot
            .lock()
            .unwrap()
            .clone()
            .unwrap_or_else(|| Snapshot::with_root(crate::element::ElementData::new()))
    }

    fn tap(&self, node: NodeId) -> ApuntarResult<()> {
        self.take_failure("tap")?;
        self.record(HostEvent::Tap(node));
        Ok(())
    }
}

impl NavigationHost for MockHost {
    fn go_home(&self) -> ApuntarResult<()> {
        self.record(HostEvent::Home);
        Ok(())
    }

    fn bring_to_front(&self, destination: &str) -> ApuntarResult<()> {
        self.record(HostEvent::BringToFront(destination.to_string()));
        Ok(())
    }
}
