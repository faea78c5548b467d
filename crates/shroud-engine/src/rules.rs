//! Block rules and the rule store boundary.
//!
//! The engine only constructs rule payloads; persistence lives behind
//! [`RuleStore`]. Stores must enforce per-selector uniqueness and a
//! maximum rule count, rejecting with structured errors the engine
//! surfaces verbatim.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use thiserror::Error;

/// Stores may hold at most this many rules.
pub const DEFAULT_MAX_RULES: usize = 200;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BlockRule {
    pub selector: String,
    pub label: String,
    /// Role slugs the element is hidden for. Empty means hidden for
    /// everyone.
    #[serde(default)]
    pub hidden_for: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_url: Option<String>,
    /// Deny navigation to `target_url`, independent of visual hiding.
    #[serde(default)]
    pub hard_block: bool,
}

impl BlockRule {
    /// Visibility model: hidden when the viewer's roles intersect
    /// `hidden_for`, or when `hidden_for` is empty (global).
    pub fn hidden_for_viewer(&self, viewer_roles: &[String]) -> bool {
        self.hidden_for.is_empty()
            || viewer_roles.iter().any(|r| self.hidden_for.contains(r))
    }
}

/// Rule identity is the selector text; the key is its content hash.
pub fn rule_key(selector: &str) -> String {
    hex::encode(Sha256::digest(selector.as_bytes()))
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StoreError {
    #[error("selector already blocked")]
    AlreadyBlocked,
    #[error("block limit reached ({0}); delete some rules first")]
    LimitReached(usize),
    #[error("rule not found: {0}")]
    NotFound(String),
    #[error("store rejected the rule: {0}")]
    Rejected(String),
    #[error("transport error: {0}")]
    Transport(String),
}

/// Persists confirmed block rules over whatever channel the host
/// provides. One fire-and-forget submission per confirmed block; a
/// failure is reported post-hoc, never retried implicitly.
#[async_trait]
pub trait RuleStore: Send {
    /// Returns the new rule's id (the selector content hash).
    async fn submit(&mut self, rule: BlockRule) -> Result<String, StoreError>;

    async fn delete(&mut self, rule_id: &str) -> Result<(), StoreError>;

    async fn update_visibility(
        &mut self,
        rule_id: &str,
        hidden_for: Vec<String>,
    ) -> Result<(), StoreError>;
}

/// In-memory store used by tests and the CLI.
#[derive(Debug)]
pub struct MemoryRuleStore {
    rules: HashMap<String, BlockRule>,
    max_rules: usize,
}

impl Default for MemoryRuleStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryRuleStore {
    pub fn new() -> Self {
        Self::with_limit(DEFAULT_MAX_RULES)
    }

    pub fn with_limit(max_rules: usize) -> Self {
        Self { rules: HashMap::new(), max_rules }
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn get(&self, rule_id: &str) -> Option<&BlockRule> {
        self.rules.get(rule_id)
    }

    pub fn rules(&self) -> impl Iterator<Item = &BlockRule> {
        self.rules.values()
    }
}

#[async_trait]
impl RuleStore for MemoryRuleStore {
    async fn submit(&mut self, rule: BlockRule) -> Result<String, StoreError> {
        if rule.selector.trim().is_empty() {
            return Err(StoreError::Rejected("empty selector".into()));
        }
        if self.rules.len() >= self.max_rules {
            return Err(StoreError::LimitReached(self.max_rules));
        }
        let key = rule_key(&rule.selector);
        if self.rules.contains_key(&key) {
            return Err(StoreError::AlreadyBlocked);
        }
        self.rules.insert(key.clone(), rule);
        Ok(key)
    }

    async fn delete(&mut self, rule_id: &str) -> Result<(), StoreError> {
        self.rules
            .remove(rule_id)
            .map(|_| ())
            .ok_or_else(|| StoreError::NotFound(rule_id.to_string()))
    }

    async fn update_visibility(
        &mut self,
        rule_id: &str,
        hidden_for: Vec<String>,
    ) -> Result<(), StoreError> {
        match self.rules.get_mut(rule_id) {
            Some(rule) => {
                rule.hidden_for = hidden_for;
                Ok(())
            }
            None => Err(StoreError::NotFound(rule_id.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rule(selector: &str) -> BlockRule {
        BlockRule {
            selector: selector.into(),
            label: selector.into(),
            hidden_for: vec![],
            target_url: None,
            hard_block: false,
        }
    }

    #[tokio::test]
    async fn submit_keys_rules_by_content_hash() {
        let mut store = MemoryRuleStore::new();
        let id = store.submit(rule("#promo")).await.expect("stored");
        assert_eq!(id, rule_key("#promo"));
        assert_eq!(store.get(&id).map(|r| r.selector.as_str()), Some("#promo"));
    }

    #[tokio::test]
    async fn duplicates_and_overflow_are_structured_errors() {
        let mut store = MemoryRuleStore::with_limit(2);
        store.submit(rule("#a")).await.expect("first");
        assert_eq!(
            store.submit(rule("#a")).await,
            Err(StoreError::AlreadyBlocked)
        );
        store.submit(rule("#b")).await.expect("second");
        assert_eq!(
            store.submit(rule("#c")).await,
            Err(StoreError::LimitReached(2))
        );
    }

    #[tokio::test]
    async fn delete_and_update_visibility_round_trip() {
        let mut store = MemoryRuleStore::new();
        let id = store.submit(rule("#a")).await.expect("stored");

        store
            .update_visibility(&id, vec!["editor".into()])
            .await
            .expect("updated");
        assert_eq!(store.get(&id).map(|r| r.hidden_for.clone()), Some(vec!["editor".to_string()]));

        store.delete(&id).await.expect("deleted");
        assert!(store.is_empty());
        assert_eq!(
            store.delete(&id).await,
            Err(StoreError::NotFound(id.clone()))
        );
        assert!(matches!(
            store.update_visibility(&id, vec![]).await,
            Err(StoreError::NotFound(_))
        ));
    }

    #[test]
    fn rule_keys_are_stable_content_hashes() {
        let a = rule_key("#sidebar");
        let b = rule_key("#sidebar");
        assert_eq!(a, b);
        assert_eq!(a.len(), 64);
        assert_ne!(a, rule_key("#sidebar "));
    }

    #[test]
    fn visibility_intersects_viewer_roles() {
        let rule = BlockRule {
            selector: ".promo".into(),
            label: "Promo".into(),
            hidden_for: vec!["editor".into()],
            target_url: None,
            hard_block: false,
        };
        assert!(rule.hidden_for_viewer(&["editor".into(), "author".into()]));
        assert!(!rule.hidden_for_viewer(&["author".into()]));

        let global = BlockRule { hidden_for: vec![], ..rule };
        assert!(global.hidden_for_viewer(&["anyone".into()]));
        assert!(global.hidden_for_viewer(&[]));
    }
}
