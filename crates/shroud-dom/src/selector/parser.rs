use super::ast::{
    AttrMatch, AttrSelector, Combinator, ComplexSelector, CompoundSelector, SelectorList,
};
use pest::Parser;
use pest::iterators::Pair;
use pest_derive::Parser;
use thiserror::Error;

#[derive(Parser)]
#[grammar = "selector/selector.pest"]
pub struct SelectorParser;

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("selector syntax error: {0}")]
    Syntax(#[from] Box<pest::error::Error<Rule>>),
    #[error("empty selector")]
    Empty,
    #[error("invalid nth-of-type index: {0}")]
    InvalidIndex(std::num::ParseIntError),
}

pub fn parse(input: &str) -> Result<SelectorList, ParseError> {
    if input.trim().is_empty() {
        return Err(ParseError::Empty);
    }

    let mut pairs =
        SelectorParser::parse(Rule::selector_list, input).map_err(Box::new)?;
    let Some(list) = pairs.next() else {
        return Err(ParseError::Empty);
    };

    let mut selectors = Vec::new();
    for inner in list.into_inner() {
        if inner.as_rule() == Rule::complex {
            selectors.push(parse_complex(inner)?);
        }
    }
    if selectors.is_empty() {
        return Err(ParseError::Empty);
    }
    Ok(SelectorList { selectors })
}

fn parse_complex(pair: Pair<Rule>) -> Result<ComplexSelector, ParseError> {
    let mut compounds = Vec::new();
    let mut combinators = Vec::new();

    for inner in pair.into_inner() {
        match inner.as_rule() {
            Rule::compound => compounds.push(parse_compound(inner)?),
            Rule::combinator => {
                let child = inner.into_inner().any(|p| p.as_rule() == Rule::child);
                combinators.push(if child {
                    Combinator::Child
                } else {
                    Combinator::Descendant
                });
            }
            _ => {}
        }
    }

    Ok(ComplexSelector {
        compounds,
        combinators,
    })
}

fn parse_compound(pair: Pair<Rule>) -> Result<CompoundSelector, ParseError> {
    let mut compound = CompoundSelector::default();

    for inner in pair.into_inner() {
        match inner.as_rule() {
            Rule::type_sel => {
                for t in inner.into_inner() {
                    if t.as_rule() == Rule::tag_name {
                        compound.tag = Some(unescape(t.as_str()).to_ascii_lowercase());
                    }
                    // universal selector leaves `tag` as None
                }
            }
            Rule::simple => parse_simple(inner, &mut compound)?,
            _ => {}
        }
    }

    Ok(compound)
}

fn parse_simple(pair: Pair<Rule>, compound: &mut CompoundSelector) -> Result<(), ParseError> {
    for inner in pair.into_inner() {
        match inner.as_rule() {
            Rule::id_sel => {
                if let Some(ident) = first_rule(inner, Rule::ident) {
                    compound.id = Some(unescape(&ident));
                }
            }
            Rule::class_sel => {
                if let Some(ident) = first_rule(inner, Rule::ident) {
                    compound.classes.push(unescape(&ident));
                }
            }
            Rule::attr_sel => compound.attrs.push(parse_attr(inner)),
            Rule::nth_of_type => {
                if let Some(index) = first_rule(inner, Rule::index) {
                    compound.nth_of_type =
                        Some(index.parse().map_err(ParseError::InvalidIndex)?);
                }
            }
            _ => {}
        }
    }
    Ok(())
}

fn parse_attr(pair: Pair<Rule>) -> AttrSelector {
    let mut name = String::new();
    let mut op = None;
    let mut value = None;

    for inner in pair.into_inner() {
        match inner.as_rule() {
            Rule::attr_name => name = inner.as_str().to_string(),
            Rule::attr_op => {
                op = inner.into_inner().next().map(|o| o.as_rule());
            }
            Rule::attr_value => value = Some(parse_attr_value(inner)),
            _ => {}
        }
    }

    let op = match (op, value) {
        (Some(Rule::substring_op), Some(v)) => AttrMatch::Substring(v),
        (Some(Rule::prefix_op), Some(v)) => AttrMatch::Prefix(v),
        (Some(_), Some(v)) => AttrMatch::Equals(v),
        _ => AttrMatch::Exists,
    };

    AttrSelector { name, op }
}

fn parse_attr_value(pair: Pair<Rule>) -> String {
    for inner in pair.into_inner() {
        match inner.as_rule() {
            Rule::quoted => {
                for chars in inner.into_inner() {
                    if matches!(chars.as_rule(), Rule::dq_chars | Rule::sq_chars) {
                        return unescape(chars.as_str());
                    }
                }
            }
            Rule::bare_value => return inner.as_str().to_string(),
            _ => {}
        }
    }
    String::new()
}

fn first_rule(pair: Pair<Rule>, rule: Rule) -> Option<String> {
    pair.into_inner()
        .find(|p| p.as_rule() == rule)
        .map(|p| p.as_str().to_string())
}

/// Resolve CSS escape sequences: `\HH...` hex escapes (1-6 digits plus
/// an optional trailing space) and single-character `\X` escapes.
fn unescape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars().peekable();

    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        let mut hex = String::new();
        while hex.len() < 6 && chars.peek().is_some_and(char::is_ascii_hexdigit) {
            if let Some(h) = chars.next() {
                hex.push(h);
            }
        }
        if hex.is_empty() {
            if let Some(escaped) = chars.next() {
                out.push(escaped);
            }
            continue;
        }
        if chars.peek() == Some(&' ') {
            chars.next();
        }
        match u32::from_str_radix(&hex, 16).ok().and_then(char::from_u32) {
            Some(ch) => out.push(ch),
            None => out.push('\u{FFFD}'),
        }
    }
    out
}
