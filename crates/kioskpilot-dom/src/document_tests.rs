use std::sync::Arc;

use super::*;
use crate::event::EventKind;

#[test]
fn new_document_has_skeleton() {
    let dom = Document::new();
    assert_eq!(dom.tag(dom.root()), "html");
    assert_eq!(dom.children(dom.root()), vec![dom.head(), dom.body()]);
    assert_eq!(dom.parent(dom.body()), Some(dom.root()));
}

#[test]
fn append_and_read_back() {
    let dom = Document::new();
    let div = dom.add_element(dom.body(), "DIV");
    dom.set_text(div, "hello");
    dom.set_attribute(div, "role", "list");

    assert_eq!(dom.tag(div), "div");
    assert_eq!(dom.own_text(div), "hello");
    assert_eq!(dom.attribute(div, "role").as_deref(), Some("list"));
    assert!(dom.contains(div));
}

#[test]
fn text_content_is_recursive_in_document_order() {
    let dom = Document::new();
    let li = dom.add_element(dom.body(), "li");
    dom.set_text(li, "A");
    let inner = dom.add_element(li, "div");
    dom.set_text(inner, "B");
    let after = dom.add_element(li, "span");
    dom.set_text(after, "C");

    assert_eq!(dom.text_content(li), "ABC");
}

#[test]
fn query_matches_in_document_order() {
    let dom = Document::new();
    let first = dom.add_element(dom.body(), "button");
    let _second = dom.add_element(dom.body(), "button");

    assert_eq!(dom.first_by_tag("button"), Some(first));
    assert_eq!(dom.elements_by_tag("button").len(), 2);
}

#[test]
fn attribute_prefix_query() {
    let dom = Document::new();
    let btn = dom.add_element(dom.body(), "button");
    dom.set_attribute(btn, "data-testid", "numpad-5");

    assert_eq!(dom.first_attribute_prefix("data-testid", "numpad-"), Some(btn));
    assert!(dom.first_attribute_prefix("data-testid", "keypad-").is_none());
}

#[test]
fn query_within_excludes_the_root() {
    let dom = Document::new();
    let ul = dom.add_element(dom.body(), "ul");
    let li = dom.add_element(ul, "li");
    let stray = dom.add_element(dom.body(), "li");

    let found = dom.query_within(ul, |dom, id| dom.tag(id) == "li");
    assert_eq!(found, vec![li]);
    assert!(!found.contains(&stray));
}

#[test]
fn remove_node_drops_subtree_and_focus() {
    let dom = Document::new();
    let ul = dom.add_element(dom.body(), "ul");
    let li = dom.add_element(ul, "li");
    dom.focus(li);
    assert_eq!(dom.active_element(), Some(li));

    dom.remove_node(ul);
    assert!(!dom.contains(ul));
    assert!(!dom.contains(li));
    assert_eq!(dom.active_element(), None);
    assert!(dom.children(dom.body()).is_empty());
}

#[test]
fn removing_a_subtree_drops_its_element_listeners() {
    let dom = Document::new();
    let div = dom.add_element(dom.body(), "div");
    dom.add_element_listener(div, EventKind::Click, |_, _| {});
    dom.add_document_listener(EventKind::KeyDown, |_, _| {});
    assert_eq!(dom.listener_count(), 2);

    dom.remove_node(div);
    assert_eq!(dom.listener_count(), 1);
}

#[test]
fn subscribers_receive_structural_mutations() {
    let dom = Document::new();
    let mut rx = dom.subscribe();

    let div = dom.add_element(dom.body(), "div");
    let record = rx.try_recv().expect("append should publish a record");
    assert_eq!(record.target, dom.body());
    assert_eq!(record.added, vec![div]);

    dom.remove_node(div);
    let record = rx.try_recv().expect("removal should publish a record");
    assert_eq!(record.removed, vec![div]);
}

#[test]
fn attribute_writes_do_not_publish_mutations() {
    let dom = Document::new();
    let div = dom.add_element(dom.body(), "div");
    let mut rx = dom.subscribe();

    dom.set_attribute(div, "data-x", "1");
    dom.set_text(div, "text");
    dom.set_value(div, "v");
    assert!(rx.try_recv().is_err());
}

#[test]
fn shared_document_is_usable_across_threads() {
    let dom = Arc::new(Document::new());
    let clone = Arc::clone(&dom);
    let handle = std::thread::spawn(move || clone.add_element(clone.body(), "div"));
    let div = handle.join().unwrap();
    assert!(dom.contains(div));
}

#[test]
#[should_panic(expected = "stale node id")]
fn stale_id_panics() {
    let dom = Document::new();
    let div = dom.add_element(dom.body(), "div");
    dom.remove_node(div);
    let _ = dom.tag(div);
}
