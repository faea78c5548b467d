//! Session-only blocks: an ordered selector list living in the
//! client's ephemeral storage, never synced to the rule store. Read on
//! page load so session hides reapply before server-rendered styles
//! would land, avoiding a flash of unblocked content.

use crate::css;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SessionStore {
    selectors: Vec<String>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, selector: String) {
        self.selectors.push(selector);
    }

    pub fn selectors(&self) -> &[String] {
        &self.selectors
    }

    pub fn len(&self) -> usize {
        self.selectors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.selectors.is_empty()
    }

    /// The single clear-all action; session rules have no per-rule
    /// delete.
    pub fn clear(&mut self) {
        self.selectors.clear();
    }

    pub fn startup_stylesheet(&self) -> Option<String> {
        css::stylesheet(&self.selectors)
    }
}
