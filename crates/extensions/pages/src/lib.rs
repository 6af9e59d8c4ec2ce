//! # Kioskpilot Pages Extension
//!
//! The five page handlers for the kiosk time-clock UI. Each one pairs a
//! DOM-shape detector with the convenience behavior for that screen:
//!
//! - `user-list`: per-user "Set as default" buttons, search autofill,
//!   Enter-to-select
//! - `pin-entry`: keyboard numpad shortcuts
//! - `project-select`: default-project autofill and a save-default button
//! - `clock-out`: break/clock-out keyboard navigation, popup auto-focus
//! - `return-from-break`: end-break keyboard navigation
//!
//! Handlers spawn background work for preference lookups and feedback
//! timers, so their lifecycle hooks must run inside a Tokio runtime. Every
//! continuation re-validates the DOM state it targets before applying its
//! effect; cleanup may have run in the meantime and the router does not
//! cancel in-flight work.

pub mod clock_out;
pub mod pin_entry;
pub mod project_select;
pub mod return_from_break;
pub mod shared;
pub mod user_list;

pub use clock_out::ClockOutPage;
pub use pin_entry::PinEntryPage;
pub use project_select::ProjectSelectPage;
pub use return_from_break::ReturnFromBreakPage;
pub use user_list::UserListPage;
