//! Clocked-in status page: break/clock-out keyboard navigation and popup
//! auto-focus.

use std::sync::Arc;

use once_cell::sync::Lazy;
use parking_lot::Mutex;
use regex::Regex;
use tracing::{info, warn};

use kioskpilot_dom::{
    Document, EventKind, ListenerId, find_button_by_text, find_close_button,
};
use kioskpilot_protocols::{PageContext, PageHandler};

use crate::shared::{focus_button_by_text, live_active_element, targets_text_entry};

static CLOCKED_IN_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)you're clocked in").expect("valid regex"));

const BREAK_BUTTON: &str = "take a break";
const CLOCK_OUT_BUTTON: &str = "clock out";

/// Keyboard navigation for the clocked-in status screen: ArrowUp/`b`/`k`
/// focus the break button, ArrowDown/`c`/`j` focus clock-out, Escape closes
/// the confirmation popup. A meal-break popup is auto-focused as it appears.
#[derive(Default)]
pub struct ClockOutPage {
    listener: Mutex<Option<ListenerId>>,
}

impl ClockOutPage {
    pub fn new() -> Self {
        Self::default()
    }
}

fn handle_keydown(dom: &Document, event: &mut kioskpilot_dom::Event) {
    if targets_text_entry(dom, event) {
        return;
    }
    let key = event.key().unwrap_or_default().to_lowercase();

    match key.as_str() {
        "arrowup" | "b" | "k" => {
            if focus_button_by_text(dom, BREAK_BUTTON) {
                event.prevent_default();
            }
        }
        "arrowdown" | "c" | "j" => {
            if focus_button_by_text(dom, CLOCK_OUT_BUTTON) {
                event.prevent_default();
            }
        }
        "escape" => {
            if let Some(close) = find_close_button(dom) {
                dom.dispatch(close, EventKind::Click);
                event.prevent_default();
            } else {
                // Expected whenever no popup is open.
                warn!("Close button not found");
            }
        }
        _ => {}
    }
}

impl PageHandler for ClockOutPage {
    fn name(&self) -> &str {
        "clock-out"
    }

    fn detect(&self, dom: &Document) -> bool {
        let has_status_heading = dom
            .elements_by_tag("h1")
            .into_iter()
            .any(|h| CLOCKED_IN_RE.is_match(&dom.text_content(h)));
        let has_theme_container = dom
            .query(|dom, id| dom.has_style(id, "--backgroundColor"))
            .is_some();
        has_status_heading && has_theme_container
    }

    fn setup(&self, ctx: &PageContext) {
        let id = ctx
            .dom
            .add_document_listener(EventKind::KeyDown, |dom, event| {
                handle_keydown(dom, event);
            });
        *self.listener.lock() = Some(id);

        focus_button_by_text(&ctx.dom, BREAK_BUTTON);
    }

    fn cleanup(&self, ctx: &PageContext) {
        if let Some(id) = self.listener.lock().take() {
            ctx.dom.remove_listener(id);
        }
    }

    /// Auto-focus the meal-break popup button as soon as it renders.
    fn on_dom_change(&self, ctx: &PageContext) {
        if let Some(meal) = find_button_by_text(&ctx.dom, "meal") {
            if live_active_element(&ctx.dom) != Some(meal) {
                info!("Meal button detected, auto-focusing");
                ctx.dom.focus(meal);
            }
        }
    }
}
