//! The interaction dialog: a structured-input collector.
//!
//! Two render modes as a tagged variant, so a confirm prompt cannot
//! carry form fields and a block form cannot lose them. The dialog
//! never talks to storage; it assembles a decision and hands it back.
//!
//! Hosts render a request as a modal with a focus trap; Escape routes
//! back to the engine as a cancel.

use crate::candidate::SelectorCandidate;
use crate::config::Role;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DialogRequest {
    /// Simple title/message/two-buttons confirmation.
    Confirm { title: String, message: String },
    /// The rich block-element form.
    Block {
        candidate: SelectorCandidate,
        /// Specificity warning, present when the selector matches more
        /// than one element.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        warning: Option<String>,
        roles: Vec<Role>,
    },
}

/// What the block form yields on confirm.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BlockDecision {
    pub label: String,
    pub session_only: bool,
    /// Role slugs the element is hidden for; empty means everyone.
    pub hidden_for: Vec<String>,
    pub hard_block: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_url: Option<String>,
}

/// Form state for the block variant. Hosts mutate it from their UI
/// bindings and call [`BlockForm::decision`] on confirm.
#[derive(Debug, Clone)]
pub struct BlockForm {
    candidate: SelectorCandidate,
    label: String,
    session_only: bool,
    /// (slug, checked); seeded all-checked.
    roles: Vec<(String, bool)>,
    hard_block: bool,
}

impl BlockForm {
    pub fn new(candidate: SelectorCandidate, roles: &[Role]) -> Self {
        let label = candidate.label.clone();
        let roles = roles.iter().map(|r| (r.slug.clone(), true)).collect();
        Self {
            candidate,
            label,
            session_only: false,
            roles,
            hard_block: false,
        }
    }

    pub fn selector(&self) -> &str {
        &self.candidate.selector
    }

    /// Whether the restrict-access option is rendered at all.
    pub fn offers_hard_block(&self) -> bool {
        self.candidate.target_url.is_some()
    }

    pub fn set_label(&mut self, label: &str) {
        self.label = label.to_string();
    }

    pub fn set_session_only(&mut self, session_only: bool) {
        self.session_only = session_only;
    }

    pub fn set_role(&mut self, slug: &str, checked: bool) {
        if let Some(entry) = self.roles.iter_mut().find(|(s, _)| s == slug) {
            entry.1 = checked;
        }
    }

    /// Ignored when the candidate carries no target URL.
    pub fn set_hard_block(&mut self, hard_block: bool) {
        if self.offers_hard_block() {
            self.hard_block = hard_block;
        }
    }

    pub fn decision(self) -> BlockDecision {
        let hidden_for = self
            .roles
            .into_iter()
            .filter_map(|(slug, checked)| checked.then_some(slug))
            .collect();
        BlockDecision {
            label: self.label,
            session_only: self.session_only,
            hidden_for,
            hard_block: self.hard_block,
            target_url: self.candidate.target_url,
        }
    }
}
