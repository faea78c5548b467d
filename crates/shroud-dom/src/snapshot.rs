//! Scanned DOM snapshot.
//!
//! The engine never touches a live document. A host shell (browser
//! extension, scanner script, or test fixture) serializes the element
//! tree into this protocol and ships it alongside interaction events.
//! Node ids are indices into the node table, assigned in document order
//! by the scanner, so iteration order is document order.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Identifier of a node within a snapshot.
pub type NodeId = u32;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DomSnapshot {
    pub page: PageInfo,
    pub nodes: Vec<Node>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PageInfo {
    pub url: String,
    pub title: String,
    pub viewport: ViewportInfo,
    pub scroll: ScrollInfo,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewportInfo {
    pub width: u32,
    pub height: u32,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ScrollInfo {
    pub x: f32,
    pub y: f32,
}

/// Bounding box in viewport coordinates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Node {
    pub id: NodeId,
    pub tag: String,
    #[serde(default)]
    pub attributes: HashMap<String, String>,
    /// Own text content, not including descendants.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default)]
    pub rect: Rect,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<NodeId>,
    #[serde(default)]
    pub children: Vec<NodeId>,
}

impl Node {
    /// The `id` attribute, if present and non-empty.
    pub fn dom_id(&self) -> Option<&str> {
        self.attributes.get("id").map(String::as_str).filter(|v| !v.is_empty())
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    /// Class tokens, whitespace-split.
    pub fn classes(&self) -> impl Iterator<Item = &str> {
        self.attributes
            .get("class")
            .map(String::as_str)
            .unwrap_or("")
            .split_whitespace()
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes().any(|c| c == class)
    }
}

impl DomSnapshot {
    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id as usize)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Nodes in document order.
    pub fn iter(&self) -> impl Iterator<Item = &Node> {
        self.nodes.iter()
    }

    pub fn parent(&self, id: NodeId) -> Option<&Node> {
        self.get(id).and_then(|n| n.parent).and_then(|p| self.get(p))
    }

    /// Ancestors of `id`, nearest first, not including `id` itself.
    pub fn ancestors(&self, id: NodeId) -> Ancestors<'_> {
        Ancestors {
            snapshot: self,
            next: self.get(id).and_then(|n| n.parent),
        }
    }

    /// Nearest node satisfying `pred`, starting at `id` itself and
    /// walking toward the root.
    pub fn closest<F>(&self, id: NodeId, pred: F) -> Option<&Node>
    where
        F: Fn(&Node) -> bool,
    {
        let start = self.get(id)?;
        if pred(start) {
            return Some(start);
        }
        self.ancestors(id).find(|n| pred(n))
    }

    /// 1-based position among same-tag siblings, and the sibling count.
    ///
    /// A node without a parent (or whose parent is missing) counts as
    /// the only one of its kind.
    pub fn same_tag_position(&self, id: NodeId) -> (usize, usize) {
        let Some(node) = self.get(id) else {
            return (1, 1);
        };
        let Some(parent) = node.parent.and_then(|p| self.get(p)) else {
            return (1, 1);
        };
        let same_tag: Vec<NodeId> = parent
            .children
            .iter()
            .copied()
            .filter(|&c| self.get(c).is_some_and(|n| n.tag == node.tag))
            .collect();
        let position = same_tag.iter().position(|&c| c == id).map_or(1, |p| p + 1);
        (position, same_tag.len())
    }

    /// Concatenated text of the node and its descendants, whitespace
    /// collapsed. The closest thing to `innerText` a snapshot offers.
    pub fn visible_text(&self, id: NodeId) -> String {
        let mut parts: Vec<&str> = Vec::new();
        self.collect_text(id, &mut parts);
        let mut out = String::new();
        for word in parts.iter().flat_map(|t| t.split_whitespace()) {
            if !out.is_empty() {
                out.push(' ');
            }
            out.push_str(word);
        }
        out
    }

    fn collect_text<'a>(&'a self, id: NodeId, parts: &mut Vec<&'a str>) {
        let Some(node) = self.get(id) else { return };
        if let Some(text) = &node.text {
            parts.push(text);
        }
        for &child in &node.children {
            self.collect_text(child, parts);
        }
    }
}

pub struct Ancestors<'a> {
    snapshot: &'a DomSnapshot,
    next: Option<NodeId>,
}

impl<'a> Iterator for Ancestors<'a> {
    type Item = &'a Node;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.snapshot.get(self.next?)?;
        self.next = node.parent;
        Some(node)
    }
}

/// Incremental snapshot construction, mainly for tests and fixtures.
pub struct SnapshotBuilder {
    page: PageInfo,
    nodes: Vec<Node>,
}

impl SnapshotBuilder {
    pub fn new(url: &str, title: &str) -> Self {
        Self {
            page: PageInfo {
                url: url.to_string(),
                title: title.to_string(),
                ..PageInfo::default()
            },
            nodes: Vec::new(),
        }
    }

    pub fn scroll(mut self, x: f32, y: f32) -> Self {
        self.page.scroll = ScrollInfo { x, y };
        self
    }

    /// Append an element under `parent` (`None` for the root) and
    /// return its id.
    pub fn element(&mut self, parent: Option<NodeId>, tag: &str, attrs: &[(&str, &str)]) -> NodeId {
        let id = self.nodes.len() as NodeId;
        let attributes = attrs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        self.nodes.push(Node {
            id,
            tag: tag.to_ascii_lowercase(),
            attributes,
            text: None,
            rect: Rect::default(),
            parent,
            children: Vec::new(),
        });
        if let Some(p) = parent
            && let Some(parent_node) = self.nodes.get_mut(p as usize)
        {
            parent_node.children.push(id);
        }
        id
    }

    pub fn text(&mut self, id: NodeId, text: &str) {
        if let Some(node) = self.nodes.get_mut(id as usize) {
            node.text = Some(text.to_string());
        }
    }

    pub fn rect(&mut self, id: NodeId, x: f32, y: f32, width: f32, height: f32) {
        if let Some(node) = self.nodes.get_mut(id as usize) {
            node.rect = Rect { x, y, width, height };
        }
    }

    pub fn finish(self) -> DomSnapshot {
        DomSnapshot {
            page: self.page,
            nodes: self.nodes,
        }
    }
}
