/// A comma-separated selector list; the unit of parsing and matching.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectorList {
    pub selectors: Vec<ComplexSelector>,
}

/// Compound selectors joined by combinators, source order.
///
/// `combinators[i]` sits between `compounds[i]` and `compounds[i + 1]`,
/// so `combinators.len() == compounds.len() - 1`.
#[derive(Debug, Clone, PartialEq)]
pub struct ComplexSelector {
    pub compounds: Vec<CompoundSelector>,
    pub combinators: Vec<Combinator>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Combinator {
    Descendant,
    Child,
}

/// One element-level test: optional type plus simple selectors.
///
/// All stored strings are unescaped; matching compares raw values.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CompoundSelector {
    /// Lowercased tag name; `None` for universal or untyped compounds.
    pub tag: Option<String>,
    pub id: Option<String>,
    pub classes: Vec<String>,
    pub attrs: Vec<AttrSelector>,
    pub nth_of_type: Option<u32>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AttrSelector {
    pub name: String,
    pub op: AttrMatch,
}

#[derive(Debug, Clone, PartialEq)]
pub enum AttrMatch {
    /// `[attr]`
    Exists,
    /// `[attr="value"]`
    Equals(String),
    /// `[attr*="value"]`
    Substring(String),
    /// `[attr^="value"]`
    Prefix(String),
}
