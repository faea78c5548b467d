//! String-level stability heuristics, kept free of any DOM types so
//! they can be tested in isolation.

use regex::Regex;
use std::sync::LazyLock;

/// Class prefix reserved for the tool's own injected UI (hover
/// indicator, dialog, toasts). Never selectable, never emitted in a
/// synthesized selector.
pub const RESERVED_CLASS_PREFIX: &str = "shroud-";

/// Framework noise prefixes excluded from class selectors.
const NOISE_PREFIXES: [&str; 1] = ["ng-"];

static GENERATED_ID: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d{3,}|[-_]\d+").expect("generated-id pattern"));

/// True when an id looks framework-generated and therefore unstable
/// across reloads: a run of 3+ consecutive digits, or a `-`/`_`
/// separator immediately followed by digits (list-row ids, UI-library
/// sequence ids).
pub fn is_generated_id(id: &str) -> bool {
    GENERATED_ID.is_match(id)
}

/// Class tokens usable in a synthesized selector: not our own UI, not
/// framework noise, not purely numeric, longer than two characters.
pub fn qualifying_classes<'a>(classes: impl Iterator<Item = &'a str>) -> Vec<&'a str> {
    classes
        .filter(|c| {
            c.len() > 2
                && !c.starts_with(RESERVED_CLASS_PREFIX)
                && !NOISE_PREFIXES.iter().any(|p| c.starts_with(p))
                && !c.chars().all(|ch| ch.is_ascii_digit())
        })
        .collect()
}

/// Short, hyphen-free tokens (`wrap`, `box`) are too generic to carry
/// a selector alone.
pub fn is_generic_class(class: &str) -> bool {
    !class.contains('-') && class.len() < 6
}
