//! Hide-stylesheet construction.
//!
//! `display: none` alone leaves layout gaps in some themes, so the
//! declaration block also zeroes size, spacing and overflow.

use crate::rules::BlockRule;

pub const HIDE_DECLARATIONS: &str = "display: none !important; visibility: hidden !important; \
     height: 0 !important; min-height: 0 !important; max-height: 0 !important; \
     margin: 0 !important; padding: 0 !important; overflow: hidden !important;";

/// One hide rule for a single selector, the engine's instant local
/// feedback after a confirmed block.
pub fn hide_rule(selector: &str) -> String {
    format!("{selector} {{ {HIDE_DECLARATIONS} }}")
}

/// Grouped stylesheet over a selector set; `None` when there is
/// nothing to hide.
pub fn stylesheet(selectors: &[String]) -> Option<String> {
    if selectors.is_empty() {
        None
    } else {
        Some(hide_rule(&selectors.join(", ")))
    }
}

/// Role-filtered emission: the stylesheet a given viewer receives.
/// Safe mode emits nothing.
pub fn stylesheet_for_viewer<'a>(
    rules: impl Iterator<Item = &'a BlockRule>,
    viewer_roles: &[String],
    safe_mode: bool,
) -> Option<String> {
    if safe_mode {
        return None;
    }
    let selectors: Vec<String> = rules
        .filter(|r| r.hidden_for_viewer(viewer_roles))
        .map(|r| r.selector.clone())
        .collect();
    stylesheet(&selectors)
}
