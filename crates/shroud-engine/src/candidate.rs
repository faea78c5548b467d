use serde::{Deserialize, Serialize};
use shroud_dom::{DomSnapshot, NodeId};

/// What a committed click produces: the synthesized selector plus
/// everything the dialog needs to describe it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SelectorCandidate {
    pub selector: String,
    /// Live match count against the snapshot. Always >= 1: the
    /// originating element matches its own selector by construction.
    pub match_count: usize,
    /// Best-effort human-readable guess.
    pub label: String,
    /// Present when the target is (or sits inside) a navigational
    /// link; enables the access-restriction option.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_url: Option<String>,
}

impl SelectorCandidate {
    /// More than one match is surfaced as a warning, not an error.
    pub fn is_ambiguous(&self) -> bool {
        self.match_count > 1
    }
}

const LABEL_MAX_CHARS: usize = 30;

/// Label guess: leading visible text, else id, else first class, else
/// tag name.
pub fn label_guess(snapshot: &DomSnapshot, id: NodeId) -> String {
    let text = snapshot.visible_text(id);
    if !text.is_empty() {
        return truncate(&text, LABEL_MAX_CHARS);
    }
    let Some(node) = snapshot.get(id) else {
        return String::new();
    };
    if let Some(dom_id) = node.dom_id() {
        return format!("#{dom_id}");
    }
    if let Some(class) = node.classes().next() {
        return format!(".{class}");
    }
    node.tag.clone()
}

fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        text.to_string()
    } else {
        text.chars().take(max_chars).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shroud_dom::SnapshotBuilder;

    #[test]
    fn label_prefers_text_then_id_then_class_then_tag() {
        let mut b = SnapshotBuilder::new("https://example.test/", "t");
        let html = b.element(None, "html", &[]);
        let body = b.element(Some(html), "body", &[]);
        let with_text = b.element(Some(body), "span", &[("id", "greeting")]);
        b.text(with_text, "Hello there");
        let with_id = b.element(Some(body), "div", &[("id", "sidebar")]);
        let with_class = b.element(Some(body), "div", &[("class", "notice dismissible")]);
        let bare = b.element(Some(body), "hr", &[]);
        let snap = b.finish();

        assert_eq!(label_guess(&snap, with_text), "Hello there");
        assert_eq!(label_guess(&snap, with_id), "#sidebar");
        assert_eq!(label_guess(&snap, with_class), ".notice");
        assert_eq!(label_guess(&snap, bare), "hr");
    }

    #[test]
    fn long_text_is_truncated_to_thirty_chars() {
        let mut b = SnapshotBuilder::new("https://example.test/", "t");
        let html = b.element(None, "html", &[]);
        let p = b.element(Some(html), "p", &[]);
        b.text(p, "This banner text runs well past the thirty character cutoff");
        let snap = b.finish();

        let label = label_guess(&snap, p);
        assert_eq!(label.chars().count(), 30);
        assert!(label.starts_with("This banner"));
    }
}
