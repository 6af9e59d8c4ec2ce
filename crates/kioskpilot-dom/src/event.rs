//! Synthetic events and listener management.
//!
//! Listeners are registered against the document (global keydown shortcuts)
//! or against a single element (button clicks, select changes). Element
//! dispatch bubbles from the target up through its ancestors and finally to
//! document-level listeners, honoring `stop_propagation`. Callbacks run with
//! no document lock held.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::document::Document;
use crate::node::NodeId;

/// The event types the host app's rendering framework reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventKind {
    KeyDown,
    MouseDown,
    MouseUp,
    Click,
    Input,
    Change,
}

impl EventKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::KeyDown => "keydown",
            Self::MouseDown => "mousedown",
            Self::MouseUp => "mouseup",
            Self::Click => "click",
            Self::Input => "input",
            Self::Change => "change",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A live event passed to listeners during one dispatch.
pub struct Event {
    kind: EventKind,
    key: Option<String>,
    target: Option<NodeId>,
    default_prevented: bool,
    propagation_stopped: bool,
}

impl Event {
    fn new(kind: EventKind, key: Option<String>, target: Option<NodeId>) -> Self {
        Self {
            kind,
            key,
            target,
            default_prevented: false,
            propagation_stopped: false,
        }
    }

    pub fn kind(&self) -> EventKind {
        self.kind
    }

    /// The key for keydown events (`"5"`, `"Enter"`, `"ArrowUp"`, ...).
    pub fn key(&self) -> Option<&str> {
        self.key.as_deref()
    }

    /// The element the event was dispatched at. For keydown this is the
    /// focused element, if any.
    pub fn target(&self) -> Option<NodeId> {
        self.target
    }

    pub fn prevent_default(&mut self) {
        self.default_prevented = true;
    }

    pub fn is_default_prevented(&self) -> bool {
        self.default_prevented
    }

    /// Stop the event from bubbling past the current element.
    pub fn stop_propagation(&mut self) {
        self.propagation_stopped = true;
    }
}

/// What a completed dispatch reported back.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DispatchOutcome {
    /// Whether any listener called [`Event::prevent_default`].
    pub default_prevented: bool,
}

/// Handle for removing a registered listener.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ListenerId(u64);

pub(crate) type ListenerFn = dyn Fn(&Document, &mut Event) + Send + Sync;

#[derive(Clone, Copy, PartialEq, Eq)]
pub(crate) enum ListenerTarget {
    Document,
    Element(NodeId),
}

pub(crate) struct ListenerEntry {
    pub(crate) target: ListenerTarget,
    pub(crate) kind: EventKind,
    pub(crate) callback: Arc<ListenerFn>,
}

impl Document {
    /// Register a document-level listener (e.g. global keyboard shortcuts).
    pub fn add_document_listener<F>(&self, kind: EventKind, callback: F) -> ListenerId
    where
        F: Fn(&Document, &mut Event) + Send + Sync + 'static,
    {
        self.insert_listener(ListenerTarget::Document, kind, Arc::new(callback))
    }

    /// Register a listener on one element.
    pub fn add_element_listener<F>(&self, node: NodeId, kind: EventKind, callback: F) -> ListenerId
    where
        F: Fn(&Document, &mut Event) + Send + Sync + 'static,
    {
        self.insert_listener(ListenerTarget::Element(node), kind, Arc::new(callback))
    }

    fn insert_listener(
        &self,
        target: ListenerTarget,
        kind: EventKind,
        callback: Arc<ListenerFn>,
    ) -> ListenerId {
        let mut inner = self.inner.write();
        let id = ListenerId(inner.next_listener);
        inner.next_listener += 1;
        inner.listeners.insert(
            id,
            ListenerEntry {
                target,
                kind,
                callback,
            },
        );
        id
    }

    /// Remove a listener. Returns whether it was still registered.
    pub fn remove_listener(&self, id: ListenerId) -> bool {
        self.inner.write().listeners.remove(&id).is_some()
    }

    /// Number of currently registered listeners, document and element level.
    pub fn listener_count(&self) -> usize {
        self.inner.read().listeners.len()
    }

    /// Dispatch a keydown against the document. The focused element, if any,
    /// becomes the event target so listeners can ignore keys typed into
    /// inputs.
    pub fn dispatch_keydown(&self, key: &str) -> DispatchOutcome {
        let target = self.active_element();
        let mut event = Event::new(EventKind::KeyDown, Some(key.to_string()), target);
        for callback in self.document_listeners(EventKind::KeyDown) {
            callback(self, &mut event);
        }
        DispatchOutcome {
            default_prevented: event.default_prevented,
        }
    }

    /// Dispatch an event at an element, bubbling through its ancestors and
    /// then to document-level listeners.
    ///
    /// Disabled elements swallow mouse events the way real controls do.
    pub fn dispatch(&self, node: NodeId, kind: EventKind) -> DispatchOutcome {
        if self.contains(node)
            && self.is_disabled(node)
            && matches!(
                kind,
                EventKind::MouseDown | EventKind::MouseUp | EventKind::Click
            )
        {
            return DispatchOutcome {
                default_prevented: false,
            };
        }
        let mut event = Event::new(kind, None, Some(node));

        let mut hop = Some(node);
        while let Some(current) = hop {
            for callback in self.element_listeners(current, kind) {
                callback(self, &mut event);
            }
            if event.propagation_stopped {
                return DispatchOutcome {
                    default_prevented: event.default_prevented,
                };
            }
            hop = if self.contains(current) {
                self.parent(current)
            } else {
                None
            };
        }

        for callback in self.document_listeners(kind) {
            callback(self, &mut event);
        }
        DispatchOutcome {
            default_prevented: event.default_prevented,
        }
    }

    fn document_listeners(&self, kind: EventKind) -> Vec<Arc<ListenerFn>> {
        let inner = self.inner.read();
        let mut ids: Vec<&ListenerId> = inner
            .listeners
            .iter()
            .filter(|(_, e)| e.target == ListenerTarget::Document && e.kind == kind)
            .map(|(id, _)| id)
            .collect();
        ids.sort();
        ids.into_iter()
            .map(|id| inner.listeners[id].callback.clone())
            .collect()
    }

    fn element_listeners(&self, node: NodeId, kind: EventKind) -> Vec<Arc<ListenerFn>> {
        let inner = self.inner.read();
        let mut ids: Vec<&ListenerId> = inner
            .listeners
            .iter()
            .filter(|(_, e)| e.target == ListenerTarget::Element(node) && e.kind == kind)
            .map(|(id, _)| id)
            .collect();
        ids.sort();
        ids.into_iter()
            .map(|id| inner.listeners[id].callback.clone())
            .collect()
    }
}

#[cfg(test)]
#[path = "event_tests.rs"]
mod tests;
