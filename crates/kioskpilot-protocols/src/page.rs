//! Page handler contract.

use std::sync::Arc;

use kioskpilot_dom::Document;

use crate::preference::PreferenceStore;

/// What a handler gets to work with during an activation.
///
/// Cloneable and cheap; every lifecycle call receives the same context.
#[derive(Clone)]
pub struct PageContext {
    /// The live host-page DOM.
    pub dom: Arc<Document>,
    /// The shared preference store.
    pub prefs: Arc<dyn PreferenceStore>,
}

impl PageContext {
    pub fn new(dom: Arc<Document>, prefs: Arc<dyn PreferenceStore>) -> Self {
        Self { dom, prefs }
    }
}

/// Core trait for page handlers: a detector plus an optional capability
/// bundle.
///
/// The router guarantees at most one handler is active at a time and always
/// runs the old handler's [`cleanup`](PageHandler::cleanup) before the next
/// handler's [`setup`](PageHandler::setup). The lifecycle hooks default to
/// no-ops, preserving the "call if present" contract.
///
/// Handlers may start asynchronous work (preference lookups, feedback
/// timers), but continuations must re-validate at resolution time that they
/// still apply; `cleanup` can run before in-flight work resolves and the
/// router never cancels it.
pub trait PageHandler: Send + Sync + 'static {
    /// Stable page name used in logs and diagnostics.
    fn name(&self) -> &str;

    /// Pure, fast predicate over the current DOM shape. Called on every
    /// mutation batch; must not have side effects.
    fn detect(&self, dom: &Document) -> bool;

    /// Called once per activation, after `detect` returned true. May attach
    /// listeners and mutate the DOM.
    fn setup(&self, ctx: &PageContext) {
        let _ = ctx;
    }

    /// Reverse every subscription `setup` created. Must be safe to call even
    /// if `setup` attached nothing.
    fn cleanup(&self, ctx: &PageContext) {
        let _ = ctx;
    }

    /// Invoked when the DOM mutated but the page did not change. Must be
    /// cheap and safe to call repeatedly; used for re-applying idempotent
    /// augmentations.
    fn on_dom_change(&self, ctx: &PageContext) {
        let _ = ctx;
    }
}
