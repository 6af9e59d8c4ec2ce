//! The lifecycle core: detection, transition protocol, and the single
//! `current page` state.

use std::sync::Arc;

use parking_lot::Mutex;
use tracing::{error, info};

use kioskpilot_protocols::{PageContext, PageHandler};

use crate::registry::PageRegistry;

/// Routes DOM changes to at most one active page handler.
///
/// The only persistent state is `current`: `None` at startup, set on first
/// successful detection, swapped on each transition, reset to `None` when no
/// page matches. Detection and transitions run synchronously inside the
/// caller's tick, so a pass always commits before the next batch is
/// processed.
pub struct PageRouter {
    registry: Arc<PageRegistry>,
    ctx: PageContext,
    current: Mutex<Option<Arc<dyn PageHandler>>>,
}

impl PageRouter {
    pub fn new(registry: Arc<PageRegistry>, ctx: PageContext) -> Self {
        Self {
            registry,
            ctx,
            current: Mutex::new(None),
        }
    }

    /// Evaluate every registered detector against the current DOM, in
    /// registration order, collecting all matches.
    ///
    /// Zero matches or an ambiguous result (two or more detectors matching)
    /// both yield `None`; ambiguity is additionally reported as a non-fatal
    /// diagnostic so no handler is activated on a guess.
    pub fn detect_current_page(&self) -> Option<Arc<dyn PageHandler>> {
        let matches: Vec<&Arc<dyn PageHandler>> = self
            .registry
            .pages()
            .iter()
            .filter(|page| page.detect(&self.ctx.dom))
            .collect();

        match matches.as_slice() {
            [] => None,
            [page] => Some(Arc::clone(page)),
            conflicting => {
                let names: Vec<&str> = conflicting.iter().map(|p| p.name()).collect();
                error!(
                    "Multiple pages fulfilled detection criteria, activating none: {:?}",
                    names
                );
                None
            }
        }
    }

    /// Re-evaluation entry point, called on every mutation batch and once at
    /// startup.
    ///
    /// On a page change (by identity, including `None` transitions) the old
    /// handler's `cleanup` runs strictly before the new handler's `setup`
    /// and the result is committed unconditionally. On no change, the active
    /// handler's `on_dom_change` is forwarded exactly once.
    pub fn check_page_change(&self) {
        let mut current = self.current.lock();
        let detected = self.detect_current_page();

        let unchanged = match (current.as_ref(), detected.as_ref()) {
            (Some(old), Some(new)) => Arc::ptr_eq(old, new),
            (None, None) => true,
            _ => false,
        };

        if unchanged {
            if let Some(page) = current.as_ref() {
                page.on_dom_change(&self.ctx);
            }
            return;
        }

        // Cleanup must complete before any new setup so stale listeners
        // cannot fire against the next page.
        if let Some(old) = current.as_ref() {
            old.cleanup(&self.ctx);
        }
        if let Some(new) = detected.as_ref() {
            info!("Detected page: {}", new.name());
            new.setup(&self.ctx);
        }
        *current = detected;
    }

    /// Name of the currently active page, if any.
    pub fn current_page_name(&self) -> Option<String> {
        self.current.lock().as_ref().map(|p| p.name().to_string())
    }

    pub fn context(&self) -> &PageContext {
        &self.ctx
    }
}

#[cfg(test)]
#[path = "router_tests.rs"]
mod tests;
