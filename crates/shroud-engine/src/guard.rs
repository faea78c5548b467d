//! Hard-block enforcement: deciding whether a navigation request is
//! denied by a rule, distinct from visually hiding the element that
//! pointed at it.

use crate::rules::BlockRule;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "decision", rename_all = "snake_case")]
pub enum NavigationDecision {
    Allow,
    Deny { target_url: String, label: String },
}

/// Check a request path against the hard-block rules.
///
/// Matching is a loose substring check, so a relative target like
/// `options-general.php` catches the full admin path. `protected_paths`
/// is the anti-lockout allowlist: paths listed there are never denied,
/// no matter what rules say.
pub fn enforce<'a>(
    rules: impl Iterator<Item = &'a BlockRule>,
    request_path: &str,
    viewer_roles: &[String],
    safe_mode: bool,
    protected_paths: &[String],
) -> NavigationDecision {
    if safe_mode {
        return NavigationDecision::Allow;
    }
    if protected_paths
        .iter()
        .any(|p| !p.is_empty() && request_path.contains(p.as_str()))
    {
        return NavigationDecision::Allow;
    }

    for rule in rules {
        if !rule.hard_block {
            continue;
        }
        let Some(target) = rule.target_url.as_deref().filter(|t| !t.is_empty()) else {
            continue;
        };
        if !rule.hidden_for_viewer(viewer_roles) {
            continue;
        }
        if request_path.contains(target) {
            return NavigationDecision::Deny {
                target_url: target.to_string(),
                label: rule.label.clone(),
            };
        }
    }

    NavigationDecision::Allow
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hard_rule(target: &str, hidden_for: &[&str]) -> BlockRule {
        BlockRule {
            selector: format!("a[href*=\"{target}\"]"),
            label: target.into(),
            hidden_for: hidden_for.iter().map(|s| s.to_string()).collect(),
            target_url: Some(target.into()),
            hard_block: true,
        }
    }

    #[test]
    fn denies_matching_path_for_blocked_role() {
        let rules = vec![hard_rule("options-general.php", &["editor"])];
        let decision = enforce(
            rules.iter(),
            "/admin/options-general.php?tab=basic",
            &["editor".into()],
            false,
            &[],
        );
        assert!(matches!(decision, NavigationDecision::Deny { .. }));
    }

    #[test]
    fn unlisted_role_passes() {
        let rules = vec![hard_rule("options-general.php", &["editor"])];
        let decision = enforce(
            rules.iter(),
            "/admin/options-general.php",
            &["admin".into()],
            false,
            &[],
        );
        assert_eq!(decision, NavigationDecision::Allow);
    }

    #[test]
    fn soft_rules_never_deny() {
        let mut rule = hard_rule("tools.php", &[]);
        rule.hard_block = false;
        let decision = enforce([rule].iter(), "/admin/tools.php", &[], false, &[]);
        assert_eq!(decision, NavigationDecision::Allow);
    }

    #[test]
    fn protected_paths_win_over_rules() {
        let rules = vec![hard_rule("index.php", &[])];
        let decision = enforce(
            rules.iter(),
            "/admin/index.php",
            &[],
            false,
            &["index.php".into()],
        );
        assert_eq!(decision, NavigationDecision::Allow);
    }

    #[test]
    fn safe_mode_disables_enforcement() {
        let rules = vec![hard_rule("plugins.php", &[])];
        let decision = enforce(rules.iter(), "/admin/plugins.php", &[], true, &[]);
        assert_eq!(decision, NavigationDecision::Allow);
    }
}
