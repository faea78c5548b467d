//! CSS escaping for literals inserted into selector syntax.
//!
//! `escape_ident` follows the CSSOM `CSS.escape` serialization rules;
//! `escape_attr_value` covers the narrower double-quoted attribute
//! value context. Every literal the synthesizer emits goes through one
//! of these before concatenation.

use std::fmt::Write;

/// Escape a string for use as a CSS identifier (id or class token).
pub fn escape_ident(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let chars: Vec<char> = value.chars().collect();

    for (i, &c) in chars.iter().enumerate() {
        match c {
            '\u{0}' => out.push('\u{FFFD}'),
            '\u{1}'..='\u{1f}' | '\u{7f}' => {
                let _ = write!(out, "\\{:x} ", c as u32);
            }
            '0'..='9' if i == 0 || (i == 1 && chars[0] == '-') => {
                let _ = write!(out, "\\{:x} ", c as u32);
            }
            '-' if i == 0 && chars.len() == 1 => out.push_str("\\-"),
            '-' | '_' => out.push(c),
            c if c >= '\u{80}' || c.is_ascii_alphanumeric() => out.push(c),
            c => {
                out.push('\\');
                out.push(c);
            }
        }
    }
    out
}

/// Escape a string for insertion between double quotes in an attribute
/// selector: `[attr="<here>"]`.
pub fn escape_attr_value(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            c => out.push(c),
        }
    }
    out
}
