//! Lookup and interaction helpers shared by the page handlers.

use std::sync::Arc;
use std::time::Duration;

use tokio::runtime::Handle;
use tracing::trace;

use crate::document::Document;
use crate::event::EventKind;
use crate::node::NodeId;
use crate::style::CLICK_FX_CLASS;

/// How long the press-effect class stays on a clicked element.
const CLICK_FX_DURATION: Duration = Duration::from_millis(200);

/// Simulate a human-like click: a short press effect plus the
/// `mousedown`/`mouseup`/`click` sequence the host app's framework listens
/// for.
///
/// The press-effect removal is a fire-and-forget timer; it re-checks that
/// the element still exists before touching it. Without a Tokio runtime the
/// effect class is simply not applied.
pub fn simulate_click(dom: &Arc<Document>, node: NodeId) {
    if !dom.contains(node) {
        return;
    }

    if let Ok(handle) = Handle::try_current() {
        dom.add_class(node, CLICK_FX_CLASS);
        let dom = Arc::clone(dom);
        handle.spawn(async move {
            tokio::time::sleep(CLICK_FX_DURATION).await;
            if dom.contains(node) {
                dom.remove_class(node, CLICK_FX_CLASS);
            }
        });
    } else {
        trace!("no runtime, skipping click press effect");
    }

    for kind in [EventKind::MouseDown, EventKind::MouseUp, EventKind::Click] {
        dom.dispatch(node, kind);
    }
}

/// Find a button by its text content, case-insensitive substring match.
/// Avoids fragile class names.
pub fn find_button_by_text(dom: &Document, text: &str) -> Option<NodeId> {
    let needle = text.to_lowercase();
    dom.query(|dom, id| {
        dom.tag(id) == "button" && dom.text_content(id).to_lowercase().contains(&needle)
    })
}

/// Find the close button via its ARIA label, robust against class changes.
pub fn find_close_button(dom: &Document) -> Option<NodeId> {
    dom.query(|dom, id| {
        dom.tag(id) == "button" && dom.attribute(id, "aria-label").as_deref() == Some("Close")
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixture() -> Arc<Document> {
        let dom = Arc::new(Document::new());
        let body = dom.body();
        let a = dom.add_element(body, "button");
        dom.set_text(a, "Take a break");
        let b = dom.add_element(body, "button");
        dom.set_text(b, "Clock out");
        dom.set_attribute(b, "aria-label", "Close");
        dom
    }

    #[test]
    fn finds_button_by_text_case_insensitive() {
        let dom = fixture();
        let found = find_button_by_text(&dom, "take a BREAK").unwrap();
        assert_eq!(dom.text_content(found), "Take a break");
    }

    #[test]
    fn missing_button_text_yields_none() {
        let dom = fixture();
        assert!(find_button_by_text(&dom, "end break").is_none());
    }

    #[test]
    fn finds_close_button_by_aria_label() {
        let dom = fixture();
        let close = find_close_button(&dom).unwrap();
        assert_eq!(dom.text_content(close), "Clock out");
    }

    #[tokio::test]
    async fn simulate_click_dispatches_full_mouse_sequence() {
        let dom = fixture();
        let button = find_button_by_text(&dom, "clock out").unwrap();

        let seen = Arc::new(parking_lot::Mutex::new(Vec::new()));
        for kind in [EventKind::MouseDown, EventKind::MouseUp, EventKind::Click] {
            let seen = seen.clone();
            dom.add_element_listener(button, kind, move |_, event| {
                seen.lock().push(event.kind());
            });
        }

        simulate_click(&dom, button);
        assert_eq!(
            *seen.lock(),
            vec![EventKind::MouseDown, EventKind::MouseUp, EventKind::Click]
        );
        // Press effect applied while the revert timer is pending.
        assert!(dom.has_class(button, CLICK_FX_CLASS));
    }

    #[tokio::test(start_paused = true)]
    async fn press_effect_is_reverted_after_the_timer() {
        let dom = fixture();
        let button = find_button_by_text(&dom, "clock out").unwrap();
        simulate_click(&dom, button);
        assert!(dom.has_class(button, CLICK_FX_CLASS));

        tokio::time::sleep(CLICK_FX_DURATION * 2).await;
        assert!(!dom.has_class(button, CLICK_FX_CLASS));
    }
}
