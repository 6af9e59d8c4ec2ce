use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use parking_lot::Mutex;

use kioskpilot_dom::Document;
use kioskpilot_protocols::{
    PageContext, PageHandler, PreferenceError, PreferenceKey, PreferenceStore,
};

use super::*;
use crate::registry::PageRegistry;

struct NullStore;

#[async_trait]
impl PreferenceStore for NullStore {
    async fn get(&self, _key: PreferenceKey) -> Result<Option<String>, PreferenceError> {
        Ok(None)
    }

    async fn set(&self, _key: PreferenceKey, _value: &str) -> Result<(), PreferenceError> {
        Ok(())
    }
}

/// Handler double with a switchable detector and a shared call log.
struct Probe {
    name: &'static str,
    matching: AtomicBool,
    log: Arc<Mutex<Vec<String>>>,
}

impl Probe {
    fn new(name: &'static str, log: Arc<Mutex<Vec<String>>>) -> Arc<Self> {
        Arc::new(Self {
            name,
            matching: AtomicBool::new(false),
            log,
        })
    }

    fn set_matching(&self, on: bool) {
        self.matching.store(on, Ordering::SeqCst);
    }

    fn record(&self, call: &str) {
        self.log.lock().push(format!("{}:{}", self.name, call));
    }
}

impl PageHandler for Probe {
    fn name(&self) -> &str {
        self.name
    }

    fn detect(&self, _dom: &Document) -> bool {
        self.matching.load(Ordering::SeqCst)
    }

    fn setup(&self, _ctx: &PageContext) {
        self.record("setup");
    }

    fn cleanup(&self, _ctx: &PageContext) {
        self.record("cleanup");
    }

    fn on_dom_change(&self, _ctx: &PageContext) {
        self.record("dom-change");
    }
}

fn router_with(pages: &[Arc<Probe>]) -> PageRouter {
    let mut registry = PageRegistry::new();
    for page in pages {
        registry.register(page.clone()).unwrap();
    }
    let ctx = PageContext::new(Arc::new(Document::new()), Arc::new(NullStore));
    PageRouter::new(Arc::new(registry), ctx)
}

#[test]
fn no_match_yields_no_active_page() {
    let log = Arc::new(Mutex::new(Vec::new()));
    let a = Probe::new("a", log.clone());
    let router = router_with(&[a]);

    assert!(router.detect_current_page().is_none());
    router.check_page_change();
    assert_eq!(router.current_page_name(), None);
    assert!(log.lock().is_empty());
}

#[test]
fn single_match_activates_that_page() {
    let log = Arc::new(Mutex::new(Vec::new()));
    let a = Probe::new("a", log.clone());
    let b = Probe::new("b", log.clone());
    b.set_matching(true);
    let router = router_with(&[a, b]);

    router.check_page_change();
    assert_eq!(router.current_page_name().as_deref(), Some("b"));
    assert_eq!(*log.lock(), vec!["b:setup"]);
}

#[test]
fn ambiguous_detection_activates_no_handler() {
    let log = Arc::new(Mutex::new(Vec::new()));
    let a = Probe::new("a", log.clone());
    let b = Probe::new("b", log.clone());
    a.set_matching(true);
    b.set_matching(true);
    let router = router_with(&[a, b]);

    assert!(router.detect_current_page().is_none());
    router.check_page_change();
    assert_eq!(router.current_page_name(), None);
    assert!(log.lock().is_empty());
}

#[test]
fn repeated_check_transitions_at_most_once() {
    let log = Arc::new(Mutex::new(Vec::new()));
    let a = Probe::new("a", log.clone());
    a.set_matching(true);
    let router = router_with(&[a]);

    router.check_page_change();
    router.check_page_change();

    // Second pass is a no-op transition: one setup, then a dom-change
    // forwarded to the still-active handler.
    assert_eq!(*log.lock(), vec!["a:setup", "a:dom-change"]);
}

#[test]
fn no_dom_change_in_the_same_pass_as_setup() {
    let log = Arc::new(Mutex::new(Vec::new()));
    let a = Probe::new("a", log.clone());
    a.set_matching(true);
    let router = router_with(&[a]);

    router.check_page_change();
    assert_eq!(*log.lock(), vec!["a:setup"]);
}

#[test]
fn cleanup_completes_before_next_setup() {
    let log = Arc::new(Mutex::new(Vec::new()));
    let a = Probe::new("a", log.clone());
    let b = Probe::new("b", log.clone());
    a.set_matching(true);
    let router = router_with(&[a.clone(), b.clone()]);

    router.check_page_change();
    a.set_matching(false);
    b.set_matching(true);
    router.check_page_change();

    assert_eq!(*log.lock(), vec!["a:setup", "a:cleanup", "b:setup"]);
    assert_eq!(router.current_page_name().as_deref(), Some("b"));
}

#[test]
fn losing_all_matches_resets_to_no_page() {
    let log = Arc::new(Mutex::new(Vec::new()));
    let a = Probe::new("a", log.clone());
    a.set_matching(true);
    let router = router_with(&[a.clone()]);

    router.check_page_change();
    a.set_matching(false);
    router.check_page_change();

    assert_eq!(*log.lock(), vec!["a:setup", "a:cleanup"]);
    assert_eq!(router.current_page_name(), None);
}

#[test]
fn ambiguity_after_activation_deactivates_the_handler() {
    let log = Arc::new(Mutex::new(Vec::new()));
    let a = Probe::new("a", log.clone());
    let b = Probe::new("b", log.clone());
    a.set_matching(true);
    let router = router_with(&[a.clone(), b.clone()]);

    router.check_page_change();
    b.set_matching(true);
    router.check_page_change();

    // The enhancement layer goes inert until the DOM disambiguates.
    assert_eq!(*log.lock(), vec!["a:setup", "a:cleanup"]);
    assert_eq!(router.current_page_name(), None);
}
