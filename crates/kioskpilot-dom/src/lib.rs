//! # Kioskpilot DOM
//!
//! In-memory DOM model the page handlers and the router run against.
//!
//! The host page is represented as an arena of elements behind a single
//! [`Document`]. The document supports the operations the enhancement layer
//! needs: structural queries, element creation and mutation, synthetic event
//! dispatch (`mousedown`/`mouseup`/`click`, `input`, `change`, `keydown`),
//! focus tracking, and a mutation channel that batches structural changes
//! for the router's re-evaluation loop.
//!
//! All reads and writes go through `&Document`; listener callbacks run with
//! no internal lock held, so they may freely query and mutate the document.

pub mod document;
pub mod event;
pub mod helpers;
pub mod node;
pub mod style;

pub use document::{Document, MutationRecord};
pub use event::{DispatchOutcome, Event, EventKind, ListenerId};
pub use helpers::{find_button_by_text, find_close_button, simulate_click};
pub use node::NodeId;
pub use style::inject_styles;
