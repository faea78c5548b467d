//! Selector synthesis.
//!
//! An ordered cascade of strategies; the first one that yields a
//! usable selector wins. Pure over the snapshot: no side effects, and
//! deterministic for a fixed snapshot. Uniqueness checks run against
//! the same snapshot the caller will later match against.
//!
//! The cascade never fails for control flow. Exhaustion (no id, no
//! qualifying class, no matched attribute) degrades to the best
//! structural path built so far.

use crate::config::NavigationConfig;
use crate::heuristics::{is_generated_id, is_generic_class, qualifying_classes};
use shroud_dom::selector::{self, parse};
use shroud_dom::{DomSnapshot, Node, NodeId, escape_attr_value, escape_ident};
use url::Url;

/// Structural fallback stops after this many ancestor levels.
const MAX_STRUCTURAL_DEPTH: usize = 5;

/// Query parameters that identify a route; an anchor carrying one is
/// matched by parameter rather than full href, surviving path churn.
const ROUTING_PARAMS: [&str; 2] = ["page", "action"];

/// Attributes tried, in order, when id and classes are unusable.
const PRIORITY_ATTRS: [&str; 4] = ["name", "data-id", "data-slug", "src"];

/// Synthesize a CSS selector for `node`.
///
/// Returns an empty string only for an id that is not in the snapshot;
/// for any real node the result is non-empty and matches the node (or,
/// for anchor-derived selectors, its enclosing link).
pub fn synthesize(snapshot: &DomSnapshot, node: NodeId, nav: Option<&NavigationConfig>) -> String {
    let Some(el) = snapshot.get(node) else {
        return String::new();
    };

    // html and body map to their tag verbatim, ids and classes ignored
    if el.tag == "html" || el.tag == "body" {
        return el.tag.clone();
    }

    if let Some(nav) = nav
        && let Some(sel) = navigation_strategy(snapshot, el, nav)
    {
        return sel;
    }

    if let Some(sel) = anchor_strategy(snapshot, el) {
        return sel;
    }

    if let Some(id) = el.dom_id()
        && !is_generated_id(id)
    {
        return format!("#{}", escape_ident(id));
    }

    if let Some(sel) = class_strategy(el) {
        return sel;
    }

    if let Some(sel) = attribute_strategy(el) {
        return sel;
    }

    structural_fallback(snapshot, el)
}

/// The href of the nearest enclosing anchor, when usable. Drives the
/// access-restriction option in the dialog.
pub fn navigation_target(snapshot: &DomSnapshot, node: NodeId) -> Option<String> {
    let link = snapshot.closest(node, |n| n.tag == "a")?;
    link.attr("href")
        .filter(|h| !h.is_empty() && *h != "#")
        .map(str::to_string)
}

/// Surgical targeting inside a recognized navigation menu.
///
/// Submenu entries are always addressed through an href selector
/// scoped under the submenu container, never through the entry
/// element, so hiding one submenu item cannot take its parent menu
/// group with it. Top-level entries prefer their own hand-authored id,
/// then a class selector scoped to the menu container.
fn navigation_strategy(snapshot: &DomSnapshot, el: &Node, nav: &NavigationConfig) -> Option<String> {
    let root = parse(&nav.menu_root).ok()?;
    let entry = snapshot.closest(el.id, |n| {
        n.tag == "li"
            && snapshot
                .ancestors(n.id)
                .any(|a| selector::matches(snapshot, a.id, &root))
    })?;

    let in_submenu = snapshot
        .closest(el.id, |n| n.has_class(&nav.submenu_class))
        .is_some();

    if in_submenu {
        let link = snapshot.closest(el.id, |n| n.tag == "a")?;
        let href = link.attr("href").filter(|h| *h != "#" && h.len() > 3)?;
        return Some(format!(
            "{} .{} a[href=\"{}\"]",
            nav.menu_root,
            escape_ident(&nav.submenu_class),
            escape_attr_value(href)
        ));
    }

    if let Some(id) = entry.dom_id()
        && !is_generated_id(id)
    {
        return Some(format!("#{}", escape_ident(id)));
    }

    let classes = qualifying_classes(entry.classes());
    if !classes.is_empty() {
        return Some(format!(
            "{} li.{}",
            nav.menu_root,
            join_classes(&classes)
        ));
    }

    None
}

/// Link destinations are the most stable identifier for navigation
/// items: a framework may regenerate element ids on every render, but
/// the link target usually survives markup refactors. Only accepted
/// when verified unique against the snapshot.
fn anchor_strategy(snapshot: &DomSnapshot, el: &Node) -> Option<String> {
    let link = snapshot.closest(el.id, |n| n.tag == "a")?;
    let href = link.attr("href")?;
    if href.is_empty() || href == "#" {
        return None;
    }

    if let Some(resolved) = resolve_href(&snapshot.page.url, href) {
        for key in ROUTING_PARAMS {
            if let Some(value) = resolved
                .query_pairs()
                .find(|(k, _)| k == key)
                .map(|(_, v)| v.into_owned())
            {
                let candidate =
                    format!("a[href*=\"{}={}\"]", key, escape_attr_value(&value));
                if is_unique(snapshot, &candidate) {
                    return Some(candidate);
                }
            }
        }
    }

    if href.len() > 5 {
        let candidate = format!("a[href=\"{}\"]", escape_attr_value(href));
        if is_unique(snapshot, &candidate) {
            return Some(candidate);
        }
    }

    None
}

fn class_strategy(el: &Node) -> Option<String> {
    let classes = qualifying_classes(el.classes());
    if classes.is_empty() {
        return None;
    }
    // a single generic token would match far too broadly; fall through
    if classes.len() == 1 && is_generic_class(classes[0]) {
        return None;
    }
    Some(format!(".{}", join_classes(&classes)))
}

fn attribute_strategy(el: &Node) -> Option<String> {
    for attr in PRIORITY_ATTRS {
        if let Some(value) = el.attr(attr)
            && value.len() > 2
        {
            return Some(format!(
                "{}[{}=\"{}\"]",
                el.tag,
                attr,
                escape_attr_value(value)
            ));
        }
    }
    None
}

/// Last resort: a structural path from the nearest stable ancestor
/// down to the node. Anchors at the first ancestor with a
/// non-generated id; bounded depth keeps pathological documents from
/// producing unbounded selectors.
fn structural_fallback(snapshot: &DomSnapshot, el: &Node) -> String {
    let mut path: Vec<String> = Vec::new();
    let mut current = Some(el.id);
    let mut depth = 0;

    while let Some(id) = current {
        let Some(node) = snapshot.get(id) else { break };
        if node.tag == "html" || depth >= MAX_STRUCTURAL_DEPTH {
            break;
        }

        if let Some(dom_id) = node.dom_id()
            && !is_generated_id(dom_id)
        {
            // an id anchor is assumed unique; stop walking
            path.push(format!("#{}", escape_ident(dom_id)));
            break;
        }

        let mut segment = node.tag.clone();
        let classes = qualifying_classes(node.classes());
        if !classes.is_empty() {
            segment.push('.');
            segment.push_str(&join_classes(&classes));
        }
        let (position, siblings) = snapshot.same_tag_position(id);
        if siblings > 1 {
            segment.push_str(&format!(":nth-of-type({position})"));
        }

        path.push(segment);
        current = node.parent;
        depth += 1;
    }

    path.reverse();
    path.join(" ")
}

fn join_classes(classes: &[&str]) -> String {
    classes
        .iter()
        .map(|c| escape_ident(c))
        .collect::<Vec<_>>()
        .join(".")
}

fn resolve_href(base: &str, href: &str) -> Option<Url> {
    match Url::parse(href) {
        Ok(url) => Some(url),
        Err(_) => Url::parse(base).ok()?.join(href).ok(),
    }
}

fn is_unique(snapshot: &DomSnapshot, candidate: &str) -> bool {
    parse(candidate)
        .map(|list| selector::match_count(snapshot, &list) == 1)
        .unwrap_or(false)
}
