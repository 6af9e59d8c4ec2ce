//! PIN entry page: keyboard numpad shortcuts.

use std::sync::Arc;

use parking_lot::Mutex;

use kioskpilot_dom::{Document, EventKind, ListenerId, simulate_click};
use kioskpilot_protocols::{PageContext, PageHandler};

/// Maps digits and Backspace onto the on-screen numpad buttons so a PIN can
/// be typed on a physical keyboard.
#[derive(Default)]
pub struct PinEntryPage {
    listener: Mutex<Option<ListenerId>>,
}

impl PinEntryPage {
    pub fn new() -> Self {
        Self::default()
    }
}

/// `data-testid` of the numpad button a key maps to, if any.
fn numpad_test_id(key: &str) -> Option<String> {
    let mut chars = key.chars();
    match (chars.next(), chars.next()) {
        (Some(digit), None) if digit.is_ascii_digit() => Some(format!("numpad-{}", digit)),
        _ if key == "Backspace" => Some("numpad-backspace".to_string()),
        _ => None,
    }
}

impl PageHandler for PinEntryPage {
    fn name(&self) -> &str {
        "pin-entry"
    }

    fn detect(&self, dom: &Document) -> bool {
        dom.first_attribute_prefix("data-testid", "numpad-").is_some()
    }

    fn setup(&self, ctx: &PageContext) {
        let dom = Arc::clone(&ctx.dom);
        let id = ctx
            .dom
            .add_document_listener(EventKind::KeyDown, move |_, event| {
                let Some(test_id) = event.key().and_then(numpad_test_id) else {
                    return;
                };
                if let Some(button) = dom.first_with_attribute("data-testid", &test_id) {
                    event.prevent_default();
                    simulate_click(&dom, button);
                }
            });
        *self.listener.lock() = Some(id);
    }

    fn cleanup(&self, ctx: &PageContext) {
        if let Some(id) = self.listener.lock().take() {
            ctx.dom.remove_listener(id);
        }
    }
}
