//! Selector matching over a snapshot: the `querySelectorAll`
//! equivalent the synthesizer verifies its candidates against.
//!
//! Complex selectors match right-to-left: the rightmost compound is
//! tested against the candidate node, then combinators walk ancestors
//! (with backtracking for the descendant combinator).

use super::ast::{AttrMatch, Combinator, ComplexSelector, CompoundSelector, SelectorList};
use crate::snapshot::{DomSnapshot, Node, NodeId};

/// True if the node matches any selector in the list.
pub fn matches(snapshot: &DomSnapshot, id: NodeId, list: &SelectorList) -> bool {
    list.selectors
        .iter()
        .any(|sel| matches_complex(snapshot, id, sel))
}

/// All matching nodes, document order.
pub fn query_all(snapshot: &DomSnapshot, list: &SelectorList) -> Vec<NodeId> {
    snapshot
        .iter()
        .filter(|n| matches(snapshot, n.id, list))
        .map(|n| n.id)
        .collect()
}

pub fn match_count(snapshot: &DomSnapshot, list: &SelectorList) -> usize {
    snapshot.iter().filter(|n| matches(snapshot, n.id, list)).count()
}

fn matches_complex(snapshot: &DomSnapshot, id: NodeId, sel: &ComplexSelector) -> bool {
    if sel.compounds.is_empty() {
        return false;
    }
    matches_at(snapshot, id, sel, sel.compounds.len() - 1)
}

fn matches_at(snapshot: &DomSnapshot, id: NodeId, sel: &ComplexSelector, idx: usize) -> bool {
    let Some(node) = snapshot.get(id) else {
        return false;
    };
    if !compound_matches(snapshot, node, &sel.compounds[idx]) {
        return false;
    }
    if idx == 0 {
        return true;
    }

    match sel.combinators[idx - 1] {
        Combinator::Child => node
            .parent
            .is_some_and(|p| matches_at(snapshot, p, sel, idx - 1)),
        Combinator::Descendant => {
            let mut current = node.parent;
            while let Some(p) = current {
                if matches_at(snapshot, p, sel, idx - 1) {
                    return true;
                }
                current = snapshot.get(p).and_then(|n| n.parent);
            }
            false
        }
    }
}

fn compound_matches(snapshot: &DomSnapshot, node: &Node, compound: &CompoundSelector) -> bool {
    if let Some(tag) = &compound.tag
        && !node.tag.eq_ignore_ascii_case(tag)
    {
        return false;
    }
    if let Some(id) = &compound.id
        && node.dom_id() != Some(id.as_str())
    {
        return false;
    }
    if !compound.classes.iter().all(|c| node.has_class(c)) {
        return false;
    }
    for attr in &compound.attrs {
        let value = node.attr(&attr.name);
        let ok = match &attr.op {
            AttrMatch::Exists => value.is_some(),
            AttrMatch::Equals(v) => value == Some(v.as_str()),
            AttrMatch::Substring(v) => value.is_some_and(|a| a.contains(v.as_str())),
            AttrMatch::Prefix(v) => value.is_some_and(|a| a.starts_with(v.as_str())),
        };
        if !ok {
            return false;
        }
    }
    if let Some(n) = compound.nth_of_type {
        let (position, _) = snapshot.same_tag_position(node.id);
        if position != n as usize {
            return false;
        }
    }
    true
}
