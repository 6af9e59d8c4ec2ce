//! Injected CSS for the controls the handlers add to the host page.

use crate::document::Document;

/// Press-effect class applied by [`simulate_click`](crate::simulate_click).
pub const CLICK_FX_CLASS: &str = "kioskpilot-click-fx";

/// Class for the "Set as default" button on the project-select page.
pub const DEFAULT_BUTTON_CLASS: &str = "kioskpilot-default-btn";

/// Class for the per-user "Set as default" buttons on the user list.
pub const USER_DEFAULT_BUTTON_CLASS: &str = "kioskpilot-user-default-btn";

/// Marker attribute guarding against double injection.
const STYLES_MARKER: &str = "data-kioskpilot-styles";

/// Append a `<style>` element with the enhancement-layer CSS to `<head>`.
/// Idempotent: a marker attribute guards against double injection.
pub fn inject_styles(dom: &Document) {
    if dom.first_with_attribute(STYLES_MARKER, "true").is_some() {
        return;
    }
    let style = dom.create_element("style");
    dom.set_attribute(style, STYLES_MARKER, "true");
    dom.set_text(style, &stylesheet());
    dom.append_child(dom.head(), style);
}

fn stylesheet() -> String {
    format!(
        r#"
    .{CLICK_FX_CLASS} {{
      transition: transform 0.15s ease, filter 0.15s ease !important;
      transform: scale(0.95) !important;
      filter: brightness(0.9) !important;
      background-color: rgba(0, 0, 0, 0.05) !important;
      cursor: pointer !important;
    }}
    .{DEFAULT_BUTTON_CLASS} {{
      margin-left: 1rem;
      padding: 0.5rem 1rem;
      border: 1px solid #ccc;
      border-radius: 4px;
      background: #f5f5f5;
      cursor: pointer;
      font-size: 14px;
      transition: background 0.2s ease;
    }}
    .{DEFAULT_BUTTON_CLASS}:hover {{
      background: #e0e0e0;
    }}
    .{USER_DEFAULT_BUTTON_CLASS} {{
      margin-left: auto;
      margin-right: 1rem;
      padding: 0.4rem 0.8rem;
      border: 1px solid #ccc;
      border-radius: 4px;
      background: #f5f5f5;
      cursor: pointer;
      font-size: 12px;
      transition: background 0.2s ease;
      white-space: nowrap;
    }}
    .{USER_DEFAULT_BUTTON_CLASS}:hover {{
      background: #e0e0e0;
    }}
    "#
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn injects_one_style_element_into_head() {
        let dom = Document::new();
        inject_styles(&dom);

        let styles = dom.elements_by_tag("style");
        assert_eq!(styles.len(), 1);
        assert_eq!(dom.parent(styles[0]), Some(dom.head()));
        assert!(dom.own_text(styles[0]).contains(CLICK_FX_CLASS));
    }

    #[test]
    fn repeated_injection_is_a_no_op() {
        let dom = Document::new();
        inject_styles(&dom);
        inject_styles(&dom);
        assert_eq!(dom.elements_by_tag("style").len(), 1);
    }
}
