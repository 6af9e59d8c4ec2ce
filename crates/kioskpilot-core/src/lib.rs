//! # Kioskpilot Core
//!
//! The page-detection and handler-lifecycle state machine.
//!
//! ## Components
//!
//! - [`PageRegistry`] - the fixed, ordered set of registered pages
//! - [`PageRouter`] - holds the single `current page` state, runs detection,
//!   and drives setup/cleanup transitions
//! - [`MutationWatcher`] - pumps batched DOM mutation records into the
//!   router's re-evaluation entry point
//!
//! The router is fully synchronous: one detection pass always completes and
//! commits before the next mutation batch is processed. Handlers may do
//! asynchronous work internally, but the router itself never suspends.

pub mod registry;
pub mod router;
pub mod watcher;

pub use registry::PageRegistry;
pub use router::PageRouter;
pub use watcher::MutationWatcher;
