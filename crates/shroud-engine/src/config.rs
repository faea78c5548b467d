//! Host-supplied configuration.
//!
//! The host must provide this before initialization; without a valid
//! auth token the engine refuses to start and attaches nothing.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Session/auth token minted by the host. `None` or empty means
    /// the engine must not initialize.
    pub auth_token: Option<String>,
    /// Selectors that must never become blockable (the tool's own
    /// controls and critical chrome).
    pub exclusion_list: Vec<String>,
    pub roles: Vec<Role>,
    pub labels: Labels,
    /// Kill switch: stored hides and hard blocks are not applied while
    /// set. Selection and commit still work.
    pub safe_mode: bool,
    /// Structural description of the host's navigation menu; enables
    /// the submenu-aware anchor strategy when present.
    pub navigation: Option<NavigationConfig>,
    /// Selector for the mode-toggle control; clicks on it pass through
    /// untouched while selection mode is active.
    pub toggle_selector: Option<String>,
    /// Request paths hard blocks may never deny (anti-lockout).
    pub protected_paths: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Role {
    pub slug: String,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NavigationConfig {
    /// Selector for the menu container, e.g. `#adminmenu`.
    pub menu_root: String,
    /// Class marking nested submenu containers, e.g. `wp-submenu`.
    pub submenu_class: String,
}

/// Localized strings; the defaults are the English set.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Labels {
    pub confirm_title: String,
    pub confirm: String,
    pub cancel: String,
    pub label: String,
    pub session_only: String,
    pub hidden_for: String,
    pub restrict_access: String,
    pub ambiguous_warning: String,
    pub excluded_warning: String,
    pub synthesis_error: String,
    pub saved: String,
    pub clear_session_title: String,
    pub clear_session_message: String,
    pub session_cleared: String,
}

impl Default for Labels {
    fn default() -> Self {
        Self {
            confirm_title: "Block Element".into(),
            confirm: "Hide Element".into(),
            cancel: "Cancel".into(),
            label: "Label (for your reference)".into(),
            session_only: "Hide for this session only".into(),
            hidden_for: "Hide for roles:".into(),
            restrict_access: "Restrict Access (Hard Block)".into(),
            ambiguous_warning:
                "Attention: this selector matches {count} elements. Block all of them?".into(),
            excluded_warning: "Safety warning: this element is critical and cannot be blocked."
                .into(),
            synthesis_error: "Could not generate a selector for this element.".into(),
            saved: "Element hidden.".into(),
            clear_session_title: "Clear Session Blocks".into(),
            clear_session_message: "Remove all blocks stored for this session?".into(),
            session_cleared: "Session blocks cleared.".into(),
        }
    }
}
