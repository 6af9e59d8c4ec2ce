//! Node identifiers and element storage.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Handle to an element in a [`Document`](crate::Document) arena.
///
/// Ids are never reused within one document, so a stale handle to a removed
/// element stays invalid rather than silently aliasing a newer element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct NodeId(pub(crate) u32);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Backing data for one element.
#[derive(Debug, Clone, Default)]
pub(crate) struct ElementData {
    /// Tag name, lowercase.
    pub(crate) tag: String,
    pub(crate) attributes: BTreeMap<String, String>,
    /// Inline style properties, including CSS custom properties.
    pub(crate) style: BTreeMap<String, String>,
    pub(crate) classes: Vec<String>,
    /// Direct text of this element only, not of descendants.
    pub(crate) text: String,
    /// Current value for inputs and selects.
    pub(crate) value: String,
    pub(crate) disabled: bool,
    pub(crate) parent: Option<NodeId>,
    pub(crate) children: Vec<NodeId>,
}

impl ElementData {
    pub(crate) fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_ascii_lowercase(),
            ..Self::default()
        }
    }
}
