//! The selection engine: a synchronous state machine over raw
//! interaction events.
//!
//! Two states, Inactive and Active. Every transition to Inactive does
//! a full reset (hover reference dropped, indicator hidden, any open
//! dialog closed) so nothing dangles between activations. All work is
//! synchronous; rule submission is handed to the executor as a
//! [`Effect::SubmitRule`] effect.

use crate::candidate::{SelectorCandidate, label_guess};
use crate::config::EngineConfig;
use crate::css;
use crate::dialog::{BlockDecision, DialogRequest};
use crate::heuristics::RESERVED_CLASS_PREFIX;
use crate::protocol::{Effect, EngineEvent, Notice, OverlayBox};
use crate::rules::BlockRule;
use crate::synthesize::{navigation_target, synthesize};
use shroud_dom::selector::{self, SelectorList, parse};
use shroud_dom::{DomSnapshot, NodeId};
use thiserror::Error;
use tracing::{debug, error, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Inactive,
    Active,
}

#[derive(Debug, Error)]
pub enum InitError {
    #[error("no auth token in configuration; engine not initialized")]
    MissingAuthToken,
}

/// What the open dialog is about.
#[derive(Debug, Clone)]
enum Pending {
    Block(SelectorCandidate),
    ClearSession,
}

pub struct SelectionEngine {
    config: EngineConfig,
    /// Exclusion list, parsed once; invalid entries are dropped with a
    /// warning rather than poisoning every commit.
    exclusions: Vec<SelectorList>,
    toggle: Option<SelectorList>,
    mode: Mode,
    hovered: Option<NodeId>,
    pending: Option<Pending>,
}

impl SelectionEngine {
    /// Refuses to initialize without a valid auth token: no listeners,
    /// no event processing.
    pub fn new(config: EngineConfig) -> Result<Self, InitError> {
        if config.auth_token.as_deref().is_none_or(str::is_empty) {
            return Err(InitError::MissingAuthToken);
        }

        let exclusions = config
            .exclusion_list
            .iter()
            .filter_map(|raw| match parse(raw) {
                Ok(list) => Some(list),
                Err(e) => {
                    warn!(selector = %raw, error = %e, "dropping invalid exclusion selector");
                    None
                }
            })
            .collect();
        let toggle = config
            .toggle_selector
            .as_deref()
            .and_then(|raw| parse(raw).ok());

        Ok(Self {
            config,
            exclusions,
            toggle,
            mode: Mode::Inactive,
            hovered: None,
            pending: None,
        })
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn is_active(&self) -> bool {
        self.mode == Mode::Active
    }

    pub fn hovered(&self) -> Option<NodeId> {
        self.hovered
    }

    pub fn dialog_open(&self) -> bool {
        self.pending.is_some()
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Process one raw event against the current snapshot.
    pub fn handle(&mut self, snapshot: &DomSnapshot, event: EngineEvent) -> Vec<Effect> {
        match event {
            EngineEvent::Toggle { force } => self.toggle_mode(force),
            EngineEvent::PointerOver { node } => self.pointer_over(snapshot, node),
            EngineEvent::Click { node } => self.click(snapshot, node),
            EngineEvent::KeyDown { key } => self.key_down(&key),
            EngineEvent::DialogConfirm { decision } => self.confirm(decision),
            EngineEvent::DialogCancel => self.cancel_dialog(),
            EngineEvent::ClearSession => self.request_clear_session(),
        }
    }

    fn toggle_mode(&mut self, force: Option<bool>) -> Vec<Effect> {
        let target_active = force.unwrap_or(self.mode == Mode::Inactive);
        if target_active {
            self.activate()
        } else {
            self.deactivate()
        }
    }

    fn activate(&mut self) -> Vec<Effect> {
        self.mode = Mode::Active;
        debug!("selection mode activated");
        vec![Effect::SetMode { active: true }]
    }

    /// Full reset: the state invariant is that a hover reference only
    /// exists while Active, and the indicator hides synchronously.
    fn deactivate(&mut self) -> Vec<Effect> {
        let had_dialog = self.pending.take().is_some();
        self.mode = Mode::Inactive;
        self.hovered = None;
        debug!("selection mode deactivated");

        let mut effects = Vec::new();
        if had_dialog {
            effects.push(Effect::CloseDialog);
        }
        effects.push(Effect::SetMode { active: false });
        effects.push(Effect::HideOverlay);
        effects
    }

    fn pointer_over(&mut self, snapshot: &DomSnapshot, node: NodeId) -> Vec<Effect> {
        if self.mode != Mode::Active || self.dialog_open() {
            return Vec::new();
        }
        // our own indicator and dialog must never be selectable
        if self.is_reserved_ui(snapshot, node) {
            self.hovered = None;
            return vec![Effect::HideOverlay];
        }
        let Some(el) = snapshot.get(node) else {
            self.hovered = None;
            return vec![Effect::HideOverlay];
        };

        self.hovered = Some(node);
        let scroll = &snapshot.page.scroll;
        vec![Effect::PositionOverlay {
            rect: OverlayBox {
                x: el.rect.x + scroll.x,
                y: el.rect.y + scroll.y,
                width: el.rect.width,
                height: el.rect.height,
            },
        }]
    }

    fn key_down(&mut self, key: &str) -> Vec<Effect> {
        if key != "Escape" {
            return Vec::new();
        }
        if self.dialog_open() {
            return self.cancel_dialog();
        }
        if self.mode == Mode::Active {
            return self.deactivate();
        }
        Vec::new()
    }

    /// Click means "commit to whatever is currently hovered", not
    /// "navigate". The toggle control and the dialog are the
    /// exception: clicks there pass through untouched.
    fn click(&mut self, snapshot: &DomSnapshot, node: NodeId) -> Vec<Effect> {
        if self.mode != Mode::Active {
            return Vec::new();
        }
        if self.is_pass_through(snapshot, node) {
            return Vec::new();
        }
        if self.dialog_open() {
            // modal: swallow stray clicks underneath
            return vec![Effect::SuppressDefault];
        }

        let mut effects = vec![Effect::SuppressDefault];
        if let Some(target) = self.hovered {
            effects.extend(self.commit(snapshot, target));
        }
        effects
    }

    fn commit(&mut self, snapshot: &DomSnapshot, target: NodeId) -> Vec<Effect> {
        let selector = synthesize(snapshot, target, self.config.navigation.as_ref());
        if selector.is_empty() {
            warn!(node = target, "synthesis produced no selector");
            return vec![Effect::Notify {
                notice: Notice::error(self.config.labels.synthesis_error.clone()),
            }];
        }

        // a malformed selector would poison every later match; treat
        // it like a synthesis failure and stay uncommitted
        let list = match parse(&selector) {
            Ok(list) => list,
            Err(e) => {
                error!(selector = %selector, error = %e, "synthesized selector failed to parse");
                return vec![Effect::Notify {
                    notice: Notice::error(self.config.labels.synthesis_error.clone()),
                }];
            }
        };

        if self.is_excluded(snapshot, target, &selector) {
            debug!(selector = %selector, "commit refused: excluded");
            return vec![Effect::Notify {
                notice: Notice::warning(self.config.labels.excluded_warning.clone()),
            }];
        }

        let match_count = selector::match_count(snapshot, &list);
        let candidate = SelectorCandidate {
            selector,
            match_count,
            label: label_guess(snapshot, target),
            target_url: navigation_target(snapshot, target),
        };
        let warning = candidate.is_ambiguous().then(|| {
            self.config
                .labels
                .ambiguous_warning
                .replace("{count}", &match_count.to_string())
        });

        let request = DialogRequest::Block {
            candidate: candidate.clone(),
            warning,
            roles: self.config.roles.clone(),
        };
        self.pending = Some(Pending::Block(candidate));
        vec![Effect::OpenDialog { request }]
    }

    fn confirm(&mut self, decision: Option<BlockDecision>) -> Vec<Effect> {
        match self.pending.take() {
            Some(Pending::Block(candidate)) => match decision {
                Some(decision) => self.confirm_block(candidate, decision),
                None => vec![Effect::CloseDialog],
            },
            Some(Pending::ClearSession) => {
                vec![Effect::CloseDialog, Effect::ClearSessionBlocks]
            }
            None => Vec::new(),
        }
    }

    fn confirm_block(
        &mut self,
        candidate: SelectorCandidate,
        decision: BlockDecision,
    ) -> Vec<Effect> {
        let selector = candidate.selector;
        let label = if decision.label.trim().is_empty() {
            selector.clone()
        } else {
            decision.label
        };

        let mut effects = vec![Effect::CloseDialog];
        if decision.session_only {
            // session blocks hide immediately; nothing to wait for
            effects.push(Effect::PersistSession {
                selector: selector.clone(),
            });
            effects.push(Effect::InjectStyle {
                css: css::hide_rule(&selector),
            });
            effects.extend(self.deactivate());
        } else {
            let rule = BlockRule {
                selector,
                label,
                hidden_for: decision.hidden_for,
                target_url: decision.target_url,
                hard_block: decision.hard_block,
            };
            // back to Inactive before the store resolves; the hide is
            // applied only once the store accepts, so what the user
            // sees never diverges from what is persisted
            effects.extend(self.deactivate());
            effects.push(Effect::SubmitRule { rule });
        }
        effects
    }

    /// Cancel leaves the engine Active-but-uncommitted.
    fn cancel_dialog(&mut self) -> Vec<Effect> {
        if self.pending.take().is_none() {
            return Vec::new();
        }
        vec![Effect::CloseDialog]
    }

    fn request_clear_session(&mut self) -> Vec<Effect> {
        if self.dialog_open() {
            return Vec::new();
        }
        self.pending = Some(Pending::ClearSession);
        vec![Effect::OpenDialog {
            request: DialogRequest::Confirm {
                title: self.config.labels.clear_session_title.clone(),
                message: self.config.labels.clear_session_message.clone(),
            },
        }]
    }

    fn is_pass_through(&self, snapshot: &DomSnapshot, node: NodeId) -> bool {
        if let Some(toggle) = &self.toggle
            && snapshot
                .closest(node, |n| selector::matches(snapshot, n.id, toggle))
                .is_some()
        {
            return true;
        }
        self.is_reserved_ui(snapshot, node)
    }

    fn is_reserved_ui(&self, snapshot: &DomSnapshot, node: NodeId) -> bool {
        snapshot
            .closest(node, |n| {
                n.classes().any(|c| c.starts_with(RESERVED_CLASS_PREFIX))
            })
            .is_some()
    }

    /// A commit is refused when the synthesized selector equals an
    /// exclusion entry, or when the node itself matches one.
    fn is_excluded(&self, snapshot: &DomSnapshot, node: NodeId, selector: &str) -> bool {
        if self.config.exclusion_list.iter().any(|e| e == selector) {
            return true;
        }
        self.exclusions
            .iter()
            .any(|list| selector::matches(snapshot, node, list))
    }
}
