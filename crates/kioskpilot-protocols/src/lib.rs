//! # Kioskpilot Protocols
//!
//! Shared contracts between the lifecycle core, the page handlers, and the
//! preference store backends.
//!
//! - [`PageHandler`] - the capability bundle every page implements
//! - [`PageContext`] - what a handler gets to work with during an activation
//! - [`PreferenceStore`] - asynchronous string-valued preference storage
//! - Error enums for registration and preference failures

pub mod error;
pub mod page;
pub mod preference;

pub use error::{PageError, PreferenceError};
pub use page::{PageContext, PageHandler};
pub use preference::{PreferenceKey, PreferenceStore};
