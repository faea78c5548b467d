pub mod ast;
pub mod matcher;
pub mod parser;

pub use ast::{AttrMatch, AttrSelector, Combinator, ComplexSelector, CompoundSelector, SelectorList};
pub use matcher::{match_count, matches, query_all};
pub use parser::{ParseError, Rule, SelectorParser, parse};
