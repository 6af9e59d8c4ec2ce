//! Ordered page registry.

use std::sync::Arc;

use kioskpilot_protocols::{PageError, PageHandler};

/// The fixed, ordered set of pages known at startup.
///
/// Registration order is detection order. The set is built once and then
/// shared immutably with the router.
#[derive(Default)]
pub struct PageRegistry {
    pages: Vec<Arc<dyn PageHandler>>,
}

impl PageRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a page. Names must be unique.
    pub fn register(&mut self, page: Arc<dyn PageHandler>) -> Result<(), PageError> {
        let name = page.name().to_string();
        if self.pages.iter().any(|p| p.name() == name) {
            return Err(PageError::AlreadyRegistered(name));
        }
        self.pages.push(page);
        Ok(())
    }

    /// All pages in registration order.
    pub fn pages(&self) -> &[Arc<dyn PageHandler>] {
        &self.pages
    }

    pub fn names(&self) -> Vec<String> {
        self.pages.iter().map(|p| p.name().to_string()).collect()
    }

    pub fn len(&self) -> usize {
        self.pages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }
}
