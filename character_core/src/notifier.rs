//! Player-facing messages for rejected actions.

use std::cell::RefCell;
use std::rc::Rc;

use tracing::info;

/// Receives short messages meant for the player, such as "shield needs a
/// sword". Hosts route them to a HUD; the core never renders anything.
pub trait Notifier {
    fn notify(&mut self, message: &str);
}

/// Writes messages to the log.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&mut self, message: &str) {
        info!(target: "character_core::notify", message);
    }
}

/// Keeps every message. Clones share the same buffer, so a test can hand one
/// clone to a character and read from the other.
#[derive(Debug, Clone, Default)]
pub struct RecordingNotifier {
    messages: Rc<RefCell<Vec<String>>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn messages(&self) -> Vec<String> {
        self.messages.borrow().clone()
    }

    pub fn clear(&self) {
        self.messages.borrow_mut().clear();
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&mut self, message: &str) {
        self.messages.borrow_mut().push(message.to_string());
    }
}
