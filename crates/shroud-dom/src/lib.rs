pub mod escape;
pub mod selector;
pub mod snapshot;

pub use escape::{escape_attr_value, escape_ident};
pub use selector::{ParseError, SelectorList, match_count, matches, parse, query_all};
pub use snapshot::{DomSnapshot, Node, NodeId, PageInfo, Rect, SnapshotBuilder};
