//! User list page: search autofill from the stored default user, per-user
//! "Set as default" buttons, and Enter-to-select on the search box.

use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tracing::{error, info, warn};

use kioskpilot_dom::style::USER_DEFAULT_BUTTON_CLASS;
use kioskpilot_dom::{Document, EventKind, ListenerId, NodeId, simulate_click};
use kioskpilot_protocols::{PageContext, PageHandler, PreferenceKey};

use crate::shared::live_active_element;

/// Idempotency guard: this list item already carries a default button.
const BUTTON_MARKER: &str = "data-kioskpilot-user-default-button";

/// How long "Default saved!" feedback stays on a button before it settles
/// into the regular label.
const FEEDBACK_REVERT_DELAY: Duration = Duration::from_secs(2);

/// How long to let the result list settle after Enter before picking the
/// single match. The list re-renders as the search narrows.
const SEARCH_SETTLE_DELAY: Duration = Duration::from_millis(300);

fn search_input(dom: &Document) -> Option<NodeId> {
    dom.query(|dom, node| {
        dom.tag(node) == "input"
            && dom.attribute(node, "placeholder").as_deref() == Some("Search")
    })
}

fn result_list(dom: &Document) -> Option<NodeId> {
    dom.query(|dom, node| {
        dom.tag(node) == "ul" && dom.attribute(node, "role").as_deref() == Some("list")
    })
}

/// List items that represent a user. Items without an avatar image are
/// placeholders in the markup and are skipped.
fn visible_result_items(dom: &Document) -> Vec<NodeId> {
    let Some(list) = result_list(dom) else {
        return Vec::new();
    };
    dom.children(list)
        .into_iter()
        .filter(|&item| dom.tag(item) == "li")
        .filter(|&item| {
            let has_avatar = !dom
                .query_within(item, |dom, node| dom.tag(node) == "img")
                .is_empty();
            if !has_avatar {
                warn!("List item without an avatar image, skipping");
            }
            has_avatar
        })
        .collect()
}

/// The user's display name inside a list item. The name sits in the large
/// heading; the avatar alt text is the fallback.
fn user_name_from_item(dom: &Document, item: NodeId) -> Option<String> {
    let heading = dom
        .query_within(item, |dom, node| {
            dom.style(node, "font-size").as_deref() == Some("2rem")
        })
        .into_iter()
        .next();
    if let Some(heading) = heading {
        let name = dom.text_content(heading).trim().to_string();
        if !name.is_empty() {
            return Some(name);
        }
    }
    let alt = dom
        .query_within(item, |dom, node| dom.tag(node) == "img")
        .into_iter()
        .next()
        .and_then(|img| dom.attribute(img, "alt"))
        .filter(|alt| !alt.trim().is_empty());
    match alt {
        Some(alt) => {
            warn!("Falling back to avatar alt text for user name: {}", alt);
            Some(alt.trim().to_string())
        }
        None => {
            warn!("Could not determine the user name for a list item");
            None
        }
    }
}

fn update_button_state(dom: &Document, button: NodeId, is_default: bool) {
    if !dom.contains(button) {
        return;
    }
    if is_default {
        dom.set_text(button, "Default");
        dom.set_style(button, "background-color", "#2e7d32");
    } else {
        dom.set_text(button, "Set as default");
        dom.set_style(button, "background-color", "#757575");
    }
}

fn item_button(dom: &Document, item: NodeId) -> Option<NodeId> {
    dom.query_within(item, |dom, node| {
        dom.has_class(node, USER_DEFAULT_BUTTON_CLASS)
    })
    .into_iter()
    .next()
}

/// Relabel every default button from the cached default, except `skip`
/// (a button showing transient save feedback).
fn refresh_buttons(dom: &Document, default: Option<&str>, skip: Option<NodeId>) {
    for item in visible_result_items(dom) {
        let Some(button) = item_button(dom, item) else {
            continue;
        };
        if skip == Some(button) {
            continue;
        }
        let is_default = user_name_from_item(dom, item).as_deref() == default;
        update_button_state(dom, button, is_default);
    }
}

/// Autofills the search box with the stored default user, puts a
/// "Set as default" button on each result, and lets Enter pick the single
/// remaining match once the list has settled.
pub struct UserListPage {
    listener: Mutex<Option<ListenerId>>,
    cached_default: Arc<Mutex<Option<String>>>,
    revert_delay: Duration,
    settle_delay: Duration,
}

impl UserListPage {
    pub fn new() -> Self {
        Self {
            listener: Mutex::new(None),
            cached_default: Arc::new(Mutex::new(None)),
            revert_delay: FEEDBACK_REVERT_DELAY,
            settle_delay: SEARCH_SETTLE_DELAY,
        }
    }

    /// Override the feedback revert delay (tests).
    pub fn with_revert_delay(mut self, delay: Duration) -> Self {
        self.revert_delay = delay;
        self
    }

    /// Override the search settle delay (tests).
    pub fn with_settle_delay(mut self, delay: Duration) -> Self {
        self.settle_delay = delay;
        self
    }

    /// Put a default button on every visible item that lacks one.
    fn add_buttons(&self, ctx: &PageContext) {
        for item in visible_result_items(&ctx.dom) {
            if ctx.dom.has_attribute(item, BUTTON_MARKER) {
                continue;
            }
            let Some(name) = user_name_from_item(&ctx.dom, item) else {
                continue;
            };

            let button = ctx.dom.create_element("button");
            ctx.dom.add_class(button, USER_DEFAULT_BUTTON_CLASS);
            let is_default = self.cached_default.lock().as_deref() == Some(name.as_str());
            update_button_state(&ctx.dom, button, is_default);

            let dom = Arc::clone(&ctx.dom);
            let prefs = Arc::clone(&ctx.prefs);
            let cache = Arc::clone(&self.cached_default);
            let revert_delay = self.revert_delay;
            ctx.dom
                .add_element_listener(button, EventKind::Click, move |_, event| {
                    // The click must not also select the user.
                    event.stop_propagation();

                    // Optimistic: relabel from the cache right away, persist
                    // in the background.
                    *cache.lock() = Some(name.clone());
                    refresh_buttons(&dom, Some(name.as_str()), Some(button));
                    dom.set_text(button, "Default saved!");

                    let dom = Arc::clone(&dom);
                    let prefs = Arc::clone(&prefs);
                    let cache = Arc::clone(&cache);
                    let name = name.clone();
                    tokio::spawn(async move {
                        if let Err(e) = prefs.set(PreferenceKey::DefaultUser, &name).await {
                            error!("Failed to save default user: {}", e);
                        }
                        tokio::time::sleep(revert_delay).await;
                        // Another user may have been made default meanwhile.
                        if dom.contains(button)
                            && cache.lock().as_deref() == Some(name.as_str())
                        {
                            update_button_state(&dom, button, true);
                        }
                    });
                });

            ctx.dom.append_child(item, button);
            ctx.dom.set_attribute(item, BUTTON_MARKER, "true");
        }
    }

    /// Enter in the search box clicks the single remaining result, after
    /// giving the re-rendered list time to settle.
    fn install_enter_listener(&self, ctx: &PageContext) {
        let mut slot = self.listener.lock();
        if slot.is_some() {
            return;
        }
        let dom = Arc::clone(&ctx.dom);
        let settle_delay = self.settle_delay;
        let id = ctx
            .dom
            .add_document_listener(EventKind::KeyDown, move |_, event| {
                if event.key() != Some("Enter") {
                    return;
                }
                let Some(input) = search_input(&dom) else {
                    return;
                };
                if live_active_element(&dom) != Some(input) {
                    return;
                }
                let dom = Arc::clone(&dom);
                tokio::spawn(async move {
                    tokio::time::sleep(settle_delay).await;
                    let Some(input) = search_input(&dom) else {
                        return;
                    };
                    let query = dom.value(input).trim().to_lowercase();
                    if query.is_empty() {
                        return;
                    }
                    let matches: Vec<NodeId> = visible_result_items(&dom)
                        .into_iter()
                        .filter(|&item| {
                            user_name_from_item(&dom, item)
                                .is_some_and(|n| n.to_lowercase().contains(&query))
                        })
                        .collect();
                    if let [item] = matches[..] {
                        info!("Search settled on a single user, selecting");
                        simulate_click(&dom, item);
                    }
                });
            });
        *slot = Some(id);
    }
}

impl Default for UserListPage {
    fn default() -> Self {
        Self::new()
    }
}

/// Type the default user into an untouched search box and focus it.
fn try_autofill(dom: &Document, name: &str) {
    let Some(input) = search_input(dom) else {
        return;
    };
    if live_active_element(dom) == Some(input) {
        return;
    }
    if !dom.value(input).is_empty() {
        return;
    }
    info!("Autofilling search with default user: {}", name);
    dom.set_value(input, name);
    dom.dispatch(input, EventKind::Input);
    dom.focus(input);
}

impl PageHandler for UserListPage {
    fn name(&self) -> &str {
        "user-list"
    }

    fn detect(&self, dom: &Document) -> bool {
        search_input(dom).is_some() && result_list(dom).is_some()
    }

    fn setup(&self, ctx: &PageContext) {
        self.add_buttons(ctx);
        self.install_enter_listener(ctx);

        let dom = Arc::clone(&ctx.dom);
        let prefs = Arc::clone(&ctx.prefs);
        let cache = Arc::clone(&self.cached_default);
        tokio::spawn(async move {
            match prefs.get(PreferenceKey::DefaultUser).await {
                Ok(default) => {
                    *cache.lock() = default.clone();
                    if let Some(name) = &default {
                        try_autofill(&dom, name);
                    }
                    refresh_buttons(&dom, default.as_deref(), None);
                }
                Err(e) => error!("Failed to load default user: {}", e),
            }
        });
    }

    fn cleanup(&self, ctx: &PageContext) {
        if let Some(id) = self.listener.lock().take() {
            ctx.dom.remove_listener(id);
        }
    }

    fn on_dom_change(&self, ctx: &PageContext) {
        // The list re-renders as the search narrows; new items need buttons.
        self.add_buttons(ctx);
    }
}

#[cfg(test)]
#[path = "user_list_tests.rs"]
mod tests;
