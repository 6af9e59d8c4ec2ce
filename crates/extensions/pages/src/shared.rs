//! Helpers shared by the keyboard-navigation handlers.

use kioskpilot_dom::{Document, Event, NodeId, find_button_by_text};
use tracing::warn;

/// Whether the event targets an element the user is typing into. Keyboard
/// shortcuts must not fire while text entry has focus.
pub fn targets_text_entry(dom: &Document, event: &Event) -> bool {
    event
        .target()
        .filter(|&t| dom.contains(t))
        .map(|t| matches!(dom.tag(t).as_str(), "input" | "textarea"))
        .unwrap_or(false)
}

/// Focus the first button containing `text`, logging a warning when the
/// button is missing. Returns whether a button was focused.
pub fn focus_button_by_text(dom: &Document, text: &str) -> bool {
    match find_button_by_text(dom, text) {
        Some(button) => {
            dom.focus(button);
            true
        }
        None => {
            warn!("Button not found: {}", text);
            false
        }
    }
}

/// The focused element, if it is still alive.
pub fn live_active_element(dom: &Document) -> Option<NodeId> {
    dom.active_element().filter(|&id| dom.contains(id))
}
