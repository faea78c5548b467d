//! Orchestrates the synchronous engine against the asynchronous rule
//! store and the session store: raw events in, renderable effects out.
//!
//! The dialog is modal and the engine returns to Inactive before a
//! submission resolves, so at most one store call is ever in flight.

use crate::config::EngineConfig;
use crate::css;
use crate::engine::{InitError, SelectionEngine};
use crate::protocol::{Effect, EngineEvent, Notice};
use crate::rules::{BlockRule, RuleStore};
use crate::session::SessionStore;
use shroud_dom::DomSnapshot;
use tracing::debug;

pub struct BlockExecutor<S: RuleStore> {
    engine: SelectionEngine,
    store: S,
    session: SessionStore,
}

impl<S: RuleStore> BlockExecutor<S> {
    pub fn new(config: EngineConfig, store: S) -> Result<Self, InitError> {
        Ok(Self {
            engine: SelectionEngine::new(config)?,
            store,
            session: SessionStore::new(),
        })
    }

    pub fn engine(&self) -> &SelectionEngine {
        &self.engine
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    pub fn session(&self) -> &SessionStore {
        &self.session
    }

    /// Effects to apply on page load, before any interaction: session
    /// hides reapply ahead of the server-rendered styles.
    pub fn startup(&self) -> Vec<Effect> {
        if self.engine.config().safe_mode {
            return Vec::new();
        }
        match self.session.startup_stylesheet() {
            Some(stylesheet) => vec![Effect::InjectStyle { css: stylesheet }],
            None => Vec::new(),
        }
    }

    /// Process one event, resolving store-bound effects along the way.
    pub async fn dispatch(&mut self, snapshot: &DomSnapshot, event: EngineEvent) -> Vec<Effect> {
        let effects = self.engine.handle(snapshot, event);
        let mut out = Vec::with_capacity(effects.len());

        for effect in effects {
            match effect {
                Effect::PersistSession { selector } => {
                    self.session.append(selector.clone());
                    out.push(Effect::PersistSession { selector });
                }
                Effect::ClearSessionBlocks => {
                    self.session.clear();
                    out.push(Effect::ClearSessionBlocks);
                    out.push(Effect::Notify {
                        notice: Notice::info(
                            self.engine.config().labels.session_cleared.clone(),
                        ),
                    });
                }
                Effect::SubmitRule { rule } => out.extend(self.submit(rule).await),
                other => out.push(other),
            }
        }
        out
    }

    /// Single fire-and-forget submission. Success hides the element
    /// locally. Failure only notifies: no hide, store message surfaced
    /// verbatim, dialog reopenable for a retry.
    async fn submit(&mut self, rule: BlockRule) -> Vec<Effect> {
        let selector = rule.selector.clone();
        match self.store.submit(rule).await {
            Ok(rule_id) => {
                debug!(rule_id = %rule_id, selector = %selector, "rule persisted");
                vec![
                    Effect::InjectStyle {
                        css: css::hide_rule(&selector),
                    },
                    Effect::Notify {
                        notice: Notice::success(self.engine.config().labels.saved.clone()),
                    },
                ]
            }
            Err(e) => vec![Effect::Notify {
                notice: Notice::error(e.to_string()),
            }],
        }
    }
}
