//! Project selection page: default-project autofill and a "Set as default"
//! control next to the selector.

use std::sync::Arc;
use std::time::Duration;

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{error, warn};

use kioskpilot_dom::style::DEFAULT_BUTTON_CLASS;
use kioskpilot_dom::{Document, EventKind, NodeId};
use kioskpilot_protocols::{PageContext, PageHandler, PreferenceKey, PreferenceStore};

static CLOCK_IN_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)clock\s+in").expect("valid regex"));

/// Idempotency guard: the stored default has been applied to this select.
const DEFAULT_APPLIED_MARKER: &str = "data-kioskpilot-default-applied";
/// Idempotency guard: the save button has been added for this select.
const BUTTON_ADDED_MARKER: &str = "data-kioskpilot-default-button-added";

/// How long success/failure feedback stays on the save button before the
/// state is re-checked. Tunable, not correctness-critical.
const FEEDBACK_REVERT_DELAY: Duration = Duration::from_secs(2);

/// States of the save-default button.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SaveButtonState {
    SetDefault,
    CurrentDefault,
    Success,
    Loading,
    FailToSave,
}

impl SaveButtonState {
    fn label(self) -> &'static str {
        match self {
            Self::SetDefault => "Set as default",
            Self::CurrentDefault => "Current default",
            Self::Success => "Default saved!",
            Self::Loading => "Loading...",
            Self::FailToSave => "Failed to save",
        }
    }

    /// Success stays disabled while showing feedback; failure allows retry.
    fn disabled(self) -> bool {
        matches!(self, Self::CurrentDefault | Self::Success | Self::Loading)
    }

    fn css_class(self) -> &'static str {
        match self {
            Self::SetDefault => "normal-button",
            Self::CurrentDefault | Self::Loading => "disabled-button",
            Self::Success => "success-button",
            Self::FailToSave => "error-button",
        }
    }
}

const STATE_CLASSES: [&str; 4] = [
    "normal-button",
    "disabled-button",
    "success-button",
    "error-button",
];

fn apply_button_state(dom: &Document, button: NodeId, state: SaveButtonState) {
    if !dom.contains(button) {
        return;
    }
    dom.set_text(button, state.label());
    dom.set_disabled(button, state.disabled());
    for class in STATE_CLASSES {
        dom.remove_class(button, class);
    }
    dom.add_class(button, state.css_class());
}

/// Text of the currently selected option, trimmed.
fn selected_project_name(dom: &Document, select: NodeId) -> String {
    if !dom.contains(select) {
        return String::new();
    }
    let value = dom.value(select);
    dom.children(select)
        .into_iter()
        .filter(|&child| dom.tag(child) == "option")
        .find(|&child| dom.attribute(child, "value").unwrap_or_default() == value)
        .map(|child| dom.text_content(child).trim().to_string())
        .unwrap_or_default()
}

fn find_option_by_name(dom: &Document, select: NodeId, name: &str) -> Option<NodeId> {
    dom.children(select)
        .into_iter()
        .filter(|&child| dom.tag(child) == "option")
        .find(|&child| dom.text_content(child).trim() == name)
}

/// Bring the save button in line with the store and the current selection.
/// Always re-reads both at resolution time; the page may have moved on
/// while the store call was in flight.
async fn refresh_save_state(
    dom: &Arc<Document>,
    prefs: &Arc<dyn PreferenceStore>,
    select: NodeId,
    button: NodeId,
) {
    let stored = match prefs.get(PreferenceKey::DefaultProject).await {
        Ok(stored) => stored,
        Err(e) => {
            error!("Failed to load default project: {}", e);
            None
        }
    };
    if !dom.contains(button) {
        return;
    }
    let selected = selected_project_name(dom, select);
    let state = if !selected.is_empty() && stored.as_deref() == Some(selected.as_str()) {
        SaveButtonState::CurrentDefault
    } else {
        SaveButtonState::SetDefault
    };
    apply_button_state(dom, button, state);
}

/// Preselects the stored default project and offers a "Set as default"
/// button next to the selector. Focuses the clock-in button so Enter clocks
/// in immediately.
pub struct ProjectSelectPage {
    revert_delay: Duration,
}

impl ProjectSelectPage {
    pub fn new() -> Self {
        Self {
            revert_delay: FEEDBACK_REVERT_DELAY,
        }
    }

    /// Override the feedback revert delay (tests).
    pub fn with_revert_delay(mut self, delay: Duration) -> Self {
        self.revert_delay = delay;
        self
    }

    /// Apply the stored default to the select once, marker-guarded.
    fn apply_default_project(&self, ctx: &PageContext, select: NodeId) {
        if ctx.dom.has_attribute(select, DEFAULT_APPLIED_MARKER) {
            return;
        }
        let dom = Arc::clone(&ctx.dom);
        let prefs = Arc::clone(&ctx.prefs);
        tokio::spawn(async move {
            let default = match prefs.get(PreferenceKey::DefaultProject).await {
                Ok(Some(name)) => name,
                Ok(None) => return,
                Err(e) => {
                    error!("Failed to load default project: {}", e);
                    return;
                }
            };
            if !dom.contains(select) || dom.has_attribute(select, DEFAULT_APPLIED_MARKER) {
                return;
            }
            if let Some(option) = find_option_by_name(&dom, select, &default) {
                let value = dom.attribute(option, "value").unwrap_or_default();
                dom.set_value(select, &value);
                dom.dispatch(select, EventKind::Change);
                dom.set_attribute(select, DEFAULT_APPLIED_MARKER, "true");
            }
        });
    }

    /// Add the save-default button after the selector, marker-guarded.
    fn add_default_button(&self, ctx: &PageContext, select: NodeId) {
        let dom = &ctx.dom;
        if dom.has_attribute(select, BUTTON_ADDED_MARKER) {
            return;
        }
        let Some(container) = dom.parent(select).and_then(|p| dom.parent(p)) else {
            warn!("No outer container for the project selector, skipping default button");
            return;
        };

        let button = dom.create_element("button");
        dom.add_class(button, DEFAULT_BUTTON_CLASS);
        for (property, value) in [
            ("width", "80%"),
            ("margin-left", "auto"),
            ("margin-right", "auto"),
            ("margin-top", "1rem"),
            ("margin-bottom", "1rem"),
            ("display", "block"),
            ("align-self", "center"),
        ] {
            dom.set_style(button, property, value);
        }
        apply_button_state(dom, button, SaveButtonState::Loading);

        // Resolve Loading into the real state once the store answers.
        {
            let dom = Arc::clone(&ctx.dom);
            let prefs = Arc::clone(&ctx.prefs);
            tokio::spawn(async move {
                refresh_save_state(&dom, &prefs, select, button).await;
            });
        }

        // Selecting another project flips between Set-as-default and
        // Current-default.
        {
            let dom = Arc::clone(&ctx.dom);
            let prefs = Arc::clone(&ctx.prefs);
            ctx.dom
                .add_element_listener(select, EventKind::Change, move |_, _| {
                    let dom = Arc::clone(&dom);
                    let prefs = Arc::clone(&prefs);
                    tokio::spawn(async move {
                        refresh_save_state(&dom, &prefs, select, button).await;
                    });
                });
        }

        // Save on click, show transient feedback, then re-check instead of
        // blindly reverting.
        {
            let dom = Arc::clone(&ctx.dom);
            let prefs = Arc::clone(&ctx.prefs);
            let revert_delay = self.revert_delay;
            ctx.dom
                .add_element_listener(button, EventKind::Click, move |_, _| {
                    let name = selected_project_name(&dom, select);
                    if name.is_empty() {
                        return;
                    }
                    let dom = Arc::clone(&dom);
                    let prefs = Arc::clone(&prefs);
                    tokio::spawn(async move {
                        match prefs.set(PreferenceKey::DefaultProject, &name).await {
                            Ok(()) => {
                                apply_button_state(&dom, button, SaveButtonState::Success);
                            }
                            Err(e) => {
                                error!("Failed to save default project: {}", e);
                                apply_button_state(&dom, button, SaveButtonState::FailToSave);
                            }
                        }
                        tokio::time::sleep(revert_delay).await;
                        refresh_save_state(&dom, &prefs, select, button).await;
                    });
                });
        }

        dom.append_child(container, button);
        dom.set_attribute(select, BUTTON_ADDED_MARKER, "true");
    }
}

impl Default for ProjectSelectPage {
    fn default() -> Self {
        Self::new()
    }
}

fn focus_clock_in_button(dom: &Document) {
    let clock_in = dom
        .elements_by_tag("button")
        .into_iter()
        .find(|&b| CLOCK_IN_RE.is_match(&dom.text_content(b)));
    if let Some(button) = clock_in {
        if dom.active_element() != Some(button) {
            dom.focus(button);
        }
    }
}

impl PageHandler for ProjectSelectPage {
    fn name(&self) -> &str {
        "project-select"
    }

    fn detect(&self, dom: &Document) -> bool {
        let has_select = dom.first_by_tag("select").is_some();
        let has_clock_in = dom
            .elements_by_tag("button")
            .into_iter()
            .any(|b| CLOCK_IN_RE.is_match(&dom.text_content(b)));
        has_select && has_clock_in
    }

    fn setup(&self, ctx: &PageContext) {
        if let Some(select) = ctx.dom.first_by_tag("select") {
            self.apply_default_project(ctx, select);
            self.add_default_button(ctx, select);
        }
        focus_clock_in_button(&ctx.dom);
    }

    // No cleanup: the augmentations are marker-guarded DOM additions and
    // the element listeners die with their elements.
}

#[cfg(test)]
#[path = "project_select_tests.rs"]
mod tests;
