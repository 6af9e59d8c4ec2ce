//! # Kioskpilot Memory Preference Store
//!
//! An in-process [`PreferenceStore`] backed by a mutex-guarded map. The
//! default store for tests and embedded use; a deployment that needs
//! persistence supplies its own store implementation instead.

use std::collections::HashMap;

use async_trait::async_trait;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use tracing::debug;

use kioskpilot_protocols::{PreferenceError, PreferenceKey, PreferenceStore};

/// In-memory preference store. Cheap to clone the values out, safe to share
/// behind an `Arc`.
#[derive(Default)]
pub struct MemoryPreferenceStore {
    values: Mutex<HashMap<PreferenceKey, String>>,
    fail_writes: bool,
}

impl MemoryPreferenceStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store whose writes fail with a backend error. For exercising
    /// error paths in handler tests.
    pub fn failing_writes() -> Self {
        Self {
            values: Mutex::new(HashMap::new()),
            fail_writes: true,
        }
    }

    /// Seed a value without going through the async interface.
    pub fn seed(&self, key: PreferenceKey, value: &str) {
        self.values.lock().insert(key, value.to_string());
    }
}

#[async_trait]
impl PreferenceStore for MemoryPreferenceStore {
    async fn get(&self, key: PreferenceKey) -> Result<Option<String>, PreferenceError> {
        Ok(self.values.lock().get(&key).cloned())
    }

    async fn set(&self, key: PreferenceKey, value: &str) -> Result<(), PreferenceError> {
        if self.fail_writes {
            return Err(PreferenceError::Backend(
                "in-memory store configured to reject writes".to_string(),
            ));
        }
        debug!("Preference updated: {} = {}", key, value);
        self.values.lock().insert(key, value.to_string());
        Ok(())
    }
}

/// A read-only snapshot of the stored defaults, with display placeholders
/// for unset values. This is what a settings screen renders.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PreferenceSummary {
    pub default_user: Option<String>,
    pub default_project: Option<String>,
}

impl PreferenceSummary {
    /// Load both defaults from a store.
    pub async fn load(store: &dyn PreferenceStore) -> Result<Self, PreferenceError> {
        Ok(Self {
            default_user: store.get(PreferenceKey::DefaultUser).await?,
            default_project: store.get(PreferenceKey::DefaultProject).await?,
        })
    }

    pub fn default_user_display(&self) -> &str {
        self.default_user.as_deref().unwrap_or("No default user set")
    }

    pub fn default_project_display(&self) -> &str {
        self.default_project
            .as_deref()
            .unwrap_or("No default project set")
    }
}
