//! The mutation watcher: one process-wide subscription feeding the router.

use std::sync::Arc;

use tokio::task::JoinHandle;
use tracing::debug;

use kioskpilot_dom::Document;

use crate::router::PageRouter;

/// Pumps batched DOM mutation records into [`PageRouter::check_page_change`].
///
/// Install it *before* the first manual `check_page_change` call so organic
/// mutations are not missed, then run one explicit initial detection to
/// cover a page that was already rendered. Pending records are drained
/// before each router invocation, so rapid mutation bursts coalesce into a
/// single detection pass.
pub struct MutationWatcher {
    task: JoinHandle<()>,
}

impl MutationWatcher {
    /// Subscribe to the document and start the pump task.
    ///
    /// Requires a running Tokio runtime.
    pub fn spawn(dom: &Document, router: Arc<PageRouter>) -> Self {
        let mut rx = dom.subscribe();
        let task = tokio::spawn(async move {
            while rx.recv().await.is_some() {
                // Coalesce whatever else is already queued into this tick.
                while rx.try_recv().is_ok() {}
                router.check_page_change();
            }
            debug!("mutation channel closed, watcher stopping");
        });
        Self { task }
    }

    /// Stop the pump task. The watcher is installed for the lifetime of the
    /// content script in production; this exists so tests can join it.
    pub async fn shutdown(self) {
        self.task.abort();
        let _ = self.task.await;
    }
}

#[cfg(test)]
#[path = "watcher_tests.rs"]
mod tests;
