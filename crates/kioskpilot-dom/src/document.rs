//! The document arena: structure, queries, focus, and the mutation channel.

use std::collections::HashMap;

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tracing::trace;

use crate::event::{ListenerEntry, ListenerId, ListenerTarget};
use crate::node::{ElementData, NodeId};

/// One batched structural change: children added to or removed from a node.
///
/// Mirrors the childList-style observation the router relies on. Non-structural
/// writes (attributes, text, values, styles) do not produce records.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MutationRecord {
    /// The parent whose child list changed.
    pub target: NodeId,
    #[serde(default)]
    pub added: Vec<NodeId>,
    #[serde(default)]
    pub removed: Vec<NodeId>,
}

pub(crate) struct DocumentInner {
    /// Slot per id; `None` marks a removed element. Ids are never reused.
    pub(crate) nodes: Vec<Option<ElementData>>,
    pub(crate) root: NodeId,
    pub(crate) head: NodeId,
    pub(crate) body: NodeId,
    /// The focused element, if any.
    pub(crate) active: Option<NodeId>,
    pub(crate) listeners: HashMap<ListenerId, ListenerEntry>,
    pub(crate) next_listener: u64,
    pub(crate) subscribers: Vec<mpsc::UnboundedSender<MutationRecord>>,
}

impl DocumentInner {
    pub(crate) fn element(&self, id: NodeId) -> &ElementData {
        self.nodes
            .get(id.0 as usize)
            .and_then(|slot| slot.as_ref())
            .unwrap_or_else(|| panic!("stale node id {}", id))
    }

    fn element_mut(&mut self, id: NodeId) -> &mut ElementData {
        self.nodes
            .get_mut(id.0 as usize)
            .and_then(|slot| slot.as_mut())
            .unwrap_or_else(|| panic!("stale node id {}", id))
    }

    fn alive(&self, id: NodeId) -> bool {
        matches!(self.nodes.get(id.0 as usize), Some(Some(_)))
    }

    fn push(&mut self, data: ElementData) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(Some(data));
        id
    }

    /// Document-order traversal from `from`, ids appended to `out`.
    fn collect_order(&self, from: NodeId, out: &mut Vec<NodeId>) {
        out.push(from);
        for &child in &self.element(from).children {
            self.collect_order(child, out);
        }
    }

    fn collect_text(&self, from: NodeId, out: &mut String) {
        out.push_str(&self.element(from).text);
        for &child in &self.element(from).children {
            self.collect_text(child, out);
        }
    }
}

/// A live, shared DOM tree.
///
/// Created with an `html`/`head`/`body` skeleton. Safe to share as
/// `Arc<Document>`: all operations take `&self` and lock internally, and
/// event listeners are invoked with no lock held.
pub struct Document {
    pub(crate) inner: RwLock<DocumentInner>,
}

impl Document {
    pub fn new() -> Self {
        let mut inner = DocumentInner {
            nodes: Vec::new(),
            root: NodeId(0),
            head: NodeId(0),
            body: NodeId(0),
            active: None,
            listeners: HashMap::new(),
            next_listener: 0,
            subscribers: Vec::new(),
        };
        let root = inner.push(ElementData::new("html"));
        let head = inner.push(ElementData::new("head"));
        let body = inner.push(ElementData::new("body"));
        inner.element_mut(head).parent = Some(root);
        inner.element_mut(body).parent = Some(root);
        inner.element_mut(root).children = vec![head, body];
        inner.root = root;
        inner.head = head;
        inner.body = body;
        Self {
            inner: RwLock::new(inner),
        }
    }

    pub fn root(&self) -> NodeId {
        self.inner.read().root
    }

    pub fn head(&self) -> NodeId {
        self.inner.read().head
    }

    pub fn body(&self) -> NodeId {
        self.inner.read().body
    }

    /// Whether the id refers to an element still in the arena.
    pub fn contains(&self, id: NodeId) -> bool {
        self.inner.read().alive(id)
    }

    // -- structure ---------------------------------------------------------

    /// Create a detached element. Attach it with [`Document::append_child`].
    pub fn create_element(&self, tag: &str) -> NodeId {
        self.inner.write().push(ElementData::new(tag))
    }

    /// Attach `child` as the last child of `parent` and publish a mutation
    /// record.
    ///
    /// # Panics
    ///
    /// Panics if either id is stale or `child` already has a parent.
    pub fn append_child(&self, parent: NodeId, child: NodeId) {
        {
            let mut inner = self.inner.write();
            assert!(inner.alive(parent), "stale parent {}", parent);
            assert!(
                inner.element(child).parent.is_none(),
                "node {} is already attached",
                child
            );
            inner.element_mut(child).parent = Some(parent);
            inner.element_mut(parent).children.push(child);
        }
        self.publish(MutationRecord {
            target: parent,
            added: vec![child],
            removed: Vec::new(),
        });
    }

    /// Convenience: create an element and append it in one step.
    pub fn add_element(&self, parent: NodeId, tag: &str) -> NodeId {
        let id = self.create_element(tag);
        self.append_child(parent, id);
        id
    }

    /// Remove an element and its whole subtree, dropping any listeners
    /// attached to removed elements and clearing focus if it was inside.
    pub fn remove_node(&self, id: NodeId) {
        let parent = {
            let mut inner = self.inner.write();
            if !inner.alive(id) {
                return;
            }
            let mut subtree = Vec::new();
            inner.collect_order(id, &mut subtree);

            let parent = inner.element(id).parent;
            if let Some(parent) = parent {
                inner.element_mut(parent).children.retain(|&c| c != id);
            }
            for &dead in &subtree {
                inner.nodes[dead.0 as usize] = None;
                if inner.active == Some(dead) {
                    inner.active = None;
                }
            }
            inner.listeners.retain(|_, entry| match entry.target {
                ListenerTarget::Document => true,
                ListenerTarget::Element(node) => !subtree.contains(&node),
            });
            parent
        };
        if let Some(parent) = parent {
            self.publish(MutationRecord {
                target: parent,
                added: Vec::new(),
                removed: vec![id],
            });
        }
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.inner.read().element(id).parent
    }

    pub fn children(&self, id: NodeId) -> Vec<NodeId> {
        self.inner.read().element(id).children.clone()
    }

    // -- element reads -----------------------------------------------------

    pub fn tag(&self, id: NodeId) -> String {
        self.inner.read().element(id).tag.clone()
    }

    pub fn attribute(&self, id: NodeId, name: &str) -> Option<String> {
        self.inner.read().element(id).attributes.get(name).cloned()
    }

    pub fn has_attribute(&self, id: NodeId, name: &str) -> bool {
        self.inner.read().element(id).attributes.contains_key(name)
    }

    /// Direct text of this element only.
    pub fn own_text(&self, id: NodeId) -> String {
        self.inner.read().element(id).text.clone()
    }

    /// Concatenated text of the element and all descendants, document order.
    pub fn text_content(&self, id: NodeId) -> String {
        let inner = self.inner.read();
        let mut out = String::new();
        inner.collect_text(id, &mut out);
        out
    }

    pub fn value(&self, id: NodeId) -> String {
        self.inner.read().element(id).value.clone()
    }

    pub fn is_disabled(&self, id: NodeId) -> bool {
        self.inner.read().element(id).disabled
    }

    pub fn style(&self, id: NodeId, property: &str) -> Option<String> {
        self.inner.read().element(id).style.get(property).cloned()
    }

    pub fn has_style(&self, id: NodeId, property: &str) -> bool {
        self.inner.read().element(id).style.contains_key(property)
    }

    pub fn has_class(&self, id: NodeId, class: &str) -> bool {
        self.inner.read().element(id).classes.iter().any(|c| c == class)
    }

    // -- element writes ----------------------------------------------------

    pub fn set_attribute(&self, id: NodeId, name: &str, value: &str) {
        let mut inner = self.inner.write();
        inner
            .element_mut(id)
            .attributes
            .insert(name.to_string(), value.to_string());
    }

    pub fn remove_attribute(&self, id: NodeId, name: &str) {
        self.inner.write().element_mut(id).attributes.remove(name);
    }

    pub fn set_text(&self, id: NodeId, text: &str) {
        self.inner.write().element_mut(id).text = text.to_string();
    }

    pub fn set_value(&self, id: NodeId, value: &str) {
        self.inner.write().element_mut(id).value = value.to_string();
    }

    pub fn set_style(&self, id: NodeId, property: &str, value: &str) {
        let mut inner = self.inner.write();
        inner
            .element_mut(id)
            .style
            .insert(property.to_string(), value.to_string());
    }

    pub fn set_disabled(&self, id: NodeId, disabled: bool) {
        self.inner.write().element_mut(id).disabled = disabled;
    }

    pub fn add_class(&self, id: NodeId, class: &str) {
        let mut inner = self.inner.write();
        let classes = &mut inner.element_mut(id).classes;
        if !classes.iter().any(|c| c == class) {
            classes.push(class.to_string());
        }
    }

    pub fn remove_class(&self, id: NodeId, class: &str) {
        self.inner.write().element_mut(id).classes.retain(|c| c != class);
    }

    // -- focus -------------------------------------------------------------

    pub fn focus(&self, id: NodeId) {
        let mut inner = self.inner.write();
        if inner.alive(id) {
            inner.active = Some(id);
        }
    }

    pub fn active_element(&self) -> Option<NodeId> {
        self.inner.read().active
    }

    // -- queries -----------------------------------------------------------

    /// All elements in document order matching the predicate.
    ///
    /// The predicate runs with no lock held, so it may use any accessor on
    /// the document, including [`Document::text_content`].
    pub fn query_all<F>(&self, predicate: F) -> Vec<NodeId>
    where
        F: Fn(&Document, NodeId) -> bool,
    {
        let order = {
            let inner = self.inner.read();
            let mut order = Vec::new();
            inner.collect_order(inner.root, &mut order);
            order
        };
        order
            .into_iter()
            .filter(|&id| self.contains(id) && predicate(self, id))
            .collect()
    }

    /// First element in document order matching the predicate.
    pub fn query<F>(&self, predicate: F) -> Option<NodeId>
    where
        F: Fn(&Document, NodeId) -> bool,
    {
        self.query_all(predicate).into_iter().next()
    }

    pub fn elements_by_tag(&self, tag: &str) -> Vec<NodeId> {
        let tag = tag.to_ascii_lowercase();
        self.query_all(|dom, id| dom.tag(id) == tag)
    }

    pub fn first_by_tag(&self, tag: &str) -> Option<NodeId> {
        self.elements_by_tag(tag).into_iter().next()
    }

    pub fn first_with_attribute(&self, name: &str, value: &str) -> Option<NodeId> {
        self.query(|dom, id| dom.attribute(id, name).as_deref() == Some(value))
    }

    /// First element whose attribute `name` starts with `prefix`.
    pub fn first_attribute_prefix(&self, name: &str, prefix: &str) -> Option<NodeId> {
        self.query(|dom, id| {
            dom.attribute(id, name)
                .is_some_and(|v| v.starts_with(prefix))
        })
    }

    /// Descendants of `root` (excluding `root` itself) matching the predicate.
    pub fn query_within<F>(&self, root: NodeId, predicate: F) -> Vec<NodeId>
    where
        F: Fn(&Document, NodeId) -> bool,
    {
        let order = {
            let inner = self.inner.read();
            let mut order = Vec::new();
            inner.collect_order(root, &mut order);
            order
        };
        order
            .into_iter()
            .skip(1)
            .filter(|&id| self.contains(id) && predicate(self, id))
            .collect()
    }

    // -- mutation channel --------------------------------------------------

    /// Subscribe to structural mutation records.
    ///
    /// Delivery is asynchronous over an unbounded channel, so mutations made
    /// from inside a listener or router tick never re-enter the subscriber
    /// synchronously.
    pub fn subscribe(&self) -> mpsc::UnboundedReceiver<MutationRecord> {
        let (tx, rx) = mpsc::unbounded_channel();
        self.inner.write().subscribers.push(tx);
        rx
    }

    fn publish(&self, record: MutationRecord) {
        let mut inner = self.inner.write();
        trace!(parent = %record.target, "dom mutation");
        inner
            .subscribers
            .retain(|tx| tx.send(record.clone()).is_ok());
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[path = "document_tests.rs"]
mod tests;
