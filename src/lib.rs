//! # Kioskpilot
//!
//! Page-detection and handler-lifecycle engine for a kiosk time-clock UI.
//! It watches a live document, decides which known page is currently
//! rendered, and keeps exactly one page handler active at a time as the
//! single-page app swaps screens in place.
//!
//! [`attach`] wires everything together: the stock page handlers, a
//! [`PageRouter`] enforcing the at-most-one-active lifecycle, and a
//! [`MutationWatcher`] that re-runs detection whenever the document's
//! structure changes.
//!
//! ```no_run
//! use std::sync::Arc;
//! use kioskpilot::{Document, MemoryPreferenceStore, attach};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let dom = Arc::new(Document::new());
//! let prefs = Arc::new(MemoryPreferenceStore::new());
//! let script = attach(&dom, prefs)?;
//! // ... the watcher now reacts to DOM mutations ...
//! script.shutdown().await;
//! # Ok(())
//! # }
//! ```

use std::sync::Arc;

use tracing::info;

pub use kioskpilot_core::{MutationWatcher, PageRegistry, PageRouter};
pub use kioskpilot_dom::{Document, NodeId, inject_styles};
pub use kioskpilot_pages::{
    ClockOutPage, PinEntryPage, ProjectSelectPage, ReturnFromBreakPage, UserListPage,
};
pub use kioskpilot_prefs_memory::{MemoryPreferenceStore, PreferenceSummary};
pub use kioskpilot_protocols::{
    PageContext, PageError, PageHandler, PreferenceError, PreferenceKey, PreferenceStore,
};

/// The stock page handlers, in registration order.
pub fn default_pages() -> Vec<Arc<dyn PageHandler>> {
    vec![
        Arc::new(UserListPage::new()),
        Arc::new(PinEntryPage::new()),
        Arc::new(ProjectSelectPage::new()),
        Arc::new(ClockOutPage::new()),
        Arc::new(ReturnFromBreakPage::new()),
    ]
}

/// A running engine attached to one document.
pub struct ContentScript {
    router: Arc<PageRouter>,
    watcher: MutationWatcher,
}

impl ContentScript {
    /// Name of the currently active page, if any.
    pub fn current_page(&self) -> Option<String> {
        self.router.current_page_name()
    }

    /// Force a detection pass outside the mutation stream.
    pub fn check_now(&self) {
        self.router.check_page_change();
    }

    pub fn router(&self) -> &Arc<PageRouter> {
        &self.router
    }

    /// Stop watching. In-flight handler continuations are not cancelled;
    /// they re-validate the DOM before taking effect.
    pub async fn shutdown(self) {
        self.watcher.shutdown().await;
    }
}

/// Attach the engine to a document with the stock pages. Must run inside a
/// Tokio runtime; the watcher and the handlers spawn background tasks.
pub fn attach(
    dom: &Arc<Document>,
    prefs: Arc<dyn PreferenceStore>,
) -> Result<ContentScript, PageError> {
    attach_pages(dom, prefs, default_pages())
}

/// [`attach`] with a custom page set.
pub fn attach_pages(
    dom: &Arc<Document>,
    prefs: Arc<dyn PreferenceStore>,
    pages: Vec<Arc<dyn PageHandler>>,
) -> Result<ContentScript, PageError> {
    inject_styles(dom);

    let mut registry = PageRegistry::new();
    for page in pages {
        registry.register(page)?;
    }
    info!("Registered pages: {:?}", registry.names());

    let ctx = PageContext::new(Arc::clone(dom), prefs);
    let router = Arc::new(PageRouter::new(Arc::new(registry), ctx));

    // Subscribe before the initial pass so a mutation racing the pass is
    // never dropped.
    let watcher = MutationWatcher::spawn(dom, Arc::clone(&router));
    router.check_page_change();

    Ok(ContentScript { router, watcher })
}
