//! Preference store protocol.
//!
//! Two string-valued preferences survive across sessions: the default
//! employee name and the default project. Calls are asynchronous and fail
//! independently; concurrent writers are last-write-wins.

use std::fmt;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::PreferenceError;

/// The persisted preference keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PreferenceKey {
    /// Default employee name, autofilled into the user search.
    DefaultUser,
    /// Default project, preselected on the project-select page.
    DefaultProject,
}

impl PreferenceKey {
    /// Stable storage key string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::DefaultUser => "default_user_name",
            Self::DefaultProject => "default_project_name",
        }
    }
}

impl fmt::Display for PreferenceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Core trait for preference store backends.
#[async_trait]
pub trait PreferenceStore: Send + Sync {
    /// Read a preference. `Ok(None)` means no value has been set.
    async fn get(&self, key: PreferenceKey) -> Result<Option<String>, PreferenceError>;

    /// Write a preference, replacing any previous value.
    async fn set(&self, key: PreferenceKey, value: &str) -> Result<(), PreferenceError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn storage_keys_are_stable() {
        assert_eq!(PreferenceKey::DefaultUser.as_str(), "default_user_name");
        assert_eq!(PreferenceKey::DefaultProject.as_str(), "default_project_name");
    }

    #[test]
    fn display_matches_storage_key() {
        assert_eq!(
            PreferenceKey::DefaultProject.to_string(),
            "default_project_name"
        );
    }
}
