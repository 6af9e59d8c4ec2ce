//! Error types shared across the workspace.

use thiserror::Error;

/// Errors from page registration and routing.
#[derive(Debug, Error)]
pub enum PageError {
    #[error("Page already registered: {0}")]
    AlreadyRegistered(String),

    #[error("Page not found: {0}")]
    NotFound(String),
}

/// Errors from the preference store. Each call fails independently.
#[derive(Debug, Error)]
pub enum PreferenceError {
    #[error("Preference backend failure: {0}")]
    Backend(String),

    #[error("Preference store unavailable")]
    Unavailable,
}
