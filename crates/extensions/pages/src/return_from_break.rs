//! Break status page: keyboard navigation back to work.

use std::sync::Arc;

use once_cell::sync::Lazy;
use parking_lot::Mutex;
use regex::Regex;

use kioskpilot_dom::{Document, Event, EventKind, ListenerId};
use kioskpilot_protocols::{PageContext, PageHandler};

use crate::shared::{focus_button_by_text, targets_text_entry};

static ON_BREAK_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)you're on.*break").expect("valid regex"));
static END_BREAK_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)end break and clock").expect("valid regex"));

const CLOCK_IN_BUTTON: &str = "end break and clock in";
const CLOCK_OUT_BUTTON: &str = "end break and clock out";

/// Keyboard navigation while on break: ArrowUp/`i`/`k` focus "end break and
/// clock in", ArrowDown/`o`/`j` focus "end break and clock out".
#[derive(Default)]
pub struct ReturnFromBreakPage {
    listener: Mutex<Option<ListenerId>>,
}

impl ReturnFromBreakPage {
    pub fn new() -> Self {
        Self::default()
    }
}

fn handle_keydown(dom: &Document, event: &mut Event) {
    if targets_text_entry(dom, event) {
        return;
    }
    let key = event.key().unwrap_or_default().to_lowercase();

    match key.as_str() {
        "arrowup" | "i" | "k" => {
            if focus_button_by_text(dom, CLOCK_IN_BUTTON) {
                event.prevent_default();
            }
        }
        "arrowdown" | "o" | "j" => {
            if focus_button_by_text(dom, CLOCK_OUT_BUTTON) {
                event.prevent_default();
            }
        }
        _ => {}
    }
}

impl PageHandler for ReturnFromBreakPage {
    fn name(&self) -> &str {
        "return-from-break"
    }

    fn detect(&self, dom: &Document) -> bool {
        let has_break_heading = dom
            .elements_by_tag("h1")
            .into_iter()
            .any(|h| ON_BREAK_RE.is_match(&dom.text_content(h)));
        let has_end_break_buttons = dom
            .elements_by_tag("button")
            .into_iter()
            .any(|b| END_BREAK_RE.is_match(&dom.text_content(b)));
        has_break_heading && has_end_break_buttons
    }

    fn setup(&self, ctx: &PageContext) {
        let id = ctx
            .dom
            .add_document_listener(EventKind::KeyDown, |dom, event| {
                handle_keydown(dom, event);
            });
        *self.listener.lock() = Some(id);

        // Enter should end the break and clock straight back in.
        focus_button_by_text(&ctx.dom, CLOCK_IN_BUTTON);
    }

    fn cleanup(&self, ctx: &PageContext) {
        if let Some(id) = self.listener.lock().take() {
            ctx.dom.remove_listener(id);
        }
    }
}
