use async_trait::async_trait;
use shroud_dom::{DomSnapshot, SnapshotBuilder};
use shroud_engine::config::{EngineConfig, Role};
use shroud_engine::dialog::BlockDecision;
use shroud_engine::executor::BlockExecutor;
use shroud_engine::protocol::{Effect, EngineEvent, NoticeLevel};
use shroud_engine::rules::{BlockRule, MemoryRuleStore, RuleStore, StoreError};

fn page() -> DomSnapshot {
    let mut b = SnapshotBuilder::new("https://site.test/admin.php", "Admin");
    let html = b.element(None, "html", &[]);
    let body = b.element(Some(html), "body", &[]);
    let _banner = b.element(Some(body), "div", &[("id", "promo-banner")]);
    let _footer = b.element(Some(body), "div", &[("id", "footer-note")]);
    b.finish()
}

const BANNER: u32 = 2;
const FOOTER: u32 = 3;

fn config() -> EngineConfig {
    EngineConfig {
        auth_token: Some("tok".into()),
        roles: vec![Role { slug: "editor".into(), name: "Editor".into() }],
        ..EngineConfig::default()
    }
}

fn decision(session_only: bool) -> BlockDecision {
    BlockDecision {
        label: "Banner".into(),
        session_only,
        hidden_for: vec!["editor".into()],
        hard_block: false,
        target_url: None,
    }
}

/// Drive toggle → hover → click → confirm for one node.
async fn block_node<S: RuleStore>(
    exec: &mut BlockExecutor<S>,
    snap: &DomSnapshot,
    node: u32,
    session_only: bool,
) -> Vec<Effect> {
    exec.dispatch(snap, EngineEvent::Toggle { force: Some(true) }).await;
    exec.dispatch(snap, EngineEvent::PointerOver { node }).await;
    exec.dispatch(snap, EngineEvent::Click { node }).await;
    exec.dispatch(
        snap,
        EngineEvent::DialogConfirm { decision: Some(decision(session_only)) },
    )
    .await
}

fn has_hide(effects: &[Effect], selector: &str) -> bool {
    effects.iter().any(|e| matches!(
        e,
        Effect::InjectStyle { css } if css.starts_with(&format!("{selector} {{"))
    ))
}

fn notice_level(effects: &[Effect]) -> Option<NoticeLevel> {
    effects.iter().find_map(|e| match e {
        Effect::Notify { notice } => Some(notice.level),
        _ => None,
    })
}

#[tokio::test]
async fn persistent_block_round_trips_through_the_store() {
    let snap = page();
    let mut exec = BlockExecutor::new(config(), MemoryRuleStore::new()).expect("init");

    let effects = block_node(&mut exec, &snap, BANNER, false).await;
    assert!(has_hide(&effects, "#promo-banner"));
    assert_eq!(notice_level(&effects), Some(NoticeLevel::Success));
    assert_eq!(exec.store().len(), 1);
    assert!(!exec.engine().is_active());

    let stored = exec.store().rules().next().expect("one rule");
    assert_eq!(stored.selector, "#promo-banner");
    assert_eq!(stored.hidden_for, vec!["editor"]);
}

#[tokio::test]
async fn duplicate_selectors_are_rejected_without_a_hide() {
    let snap = page();
    let mut exec = BlockExecutor::new(config(), MemoryRuleStore::new()).expect("init");

    block_node(&mut exec, &snap, BANNER, false).await;
    let effects = block_node(&mut exec, &snap, BANNER, false).await;

    assert!(!has_hide(&effects, "#promo-banner"));
    assert_eq!(notice_level(&effects), Some(NoticeLevel::Error));
    assert_eq!(exec.store().len(), 1);
}

#[tokio::test]
async fn rule_limit_is_surfaced_verbatim() {
    let snap = page();
    let mut exec = BlockExecutor::new(config(), MemoryRuleStore::with_limit(1)).expect("init");

    block_node(&mut exec, &snap, BANNER, false).await;
    let effects = block_node(&mut exec, &snap, FOOTER, false).await;

    let message = effects.iter().find_map(|e| match e {
        Effect::Notify { notice } if notice.level == NoticeLevel::Error => {
            Some(notice.message.clone())
        }
        _ => None,
    });
    assert_eq!(
        message.as_deref(),
        Some(StoreError::LimitReached(1).to_string().as_str())
    );
    assert_eq!(exec.store().len(), 1);
}

struct OfflineStore;

#[async_trait]
impl RuleStore for OfflineStore {
    async fn submit(&mut self, _rule: BlockRule) -> Result<String, StoreError> {
        Err(StoreError::Transport("connection refused".into()))
    }

    async fn delete(&mut self, _rule_id: &str) -> Result<(), StoreError> {
        Err(StoreError::Transport("connection refused".into()))
    }

    async fn update_visibility(
        &mut self,
        _rule_id: &str,
        _hidden_for: Vec<String>,
    ) -> Result<(), StoreError> {
        Err(StoreError::Transport("connection refused".into()))
    }
}

#[tokio::test]
async fn transport_failure_applies_no_local_hide() {
    let snap = page();
    let mut exec = BlockExecutor::new(config(), OfflineStore).expect("init");

    let effects = block_node(&mut exec, &snap, BANNER, false).await;

    assert!(!effects.iter().any(|e| matches!(e, Effect::InjectStyle { .. })));
    let message = effects.iter().find_map(|e| match e {
        Effect::Notify { notice } => Some(notice.message.clone()),
        _ => None,
    });
    assert_eq!(message.as_deref(), Some("transport error: connection refused"));
}

#[tokio::test]
async fn session_blocks_stay_client_side() {
    let snap = page();
    let mut exec = BlockExecutor::new(config(), MemoryRuleStore::new()).expect("init");

    let effects = block_node(&mut exec, &snap, BANNER, true).await;
    assert!(has_hide(&effects, "#promo-banner"));
    assert!(exec.store().is_empty(), "session rules never reach the store");
    assert_eq!(exec.session().selectors(), ["#promo-banner"]);
}

#[tokio::test]
async fn startup_reapplies_session_hides() {
    let snap = page();
    let mut exec = BlockExecutor::new(config(), MemoryRuleStore::new()).expect("init");

    assert!(exec.startup().is_empty());
    block_node(&mut exec, &snap, BANNER, true).await;

    let effects = exec.startup();
    assert_eq!(effects.len(), 1);
    assert!(matches!(
        &effects[0],
        Effect::InjectStyle { css } if css.starts_with("#promo-banner {")
    ));
}

#[tokio::test]
async fn startup_is_inert_in_safe_mode() {
    let snap = page();
    let mut safe = config();
    safe.safe_mode = true;
    let mut exec = BlockExecutor::new(safe, MemoryRuleStore::new()).expect("init");

    // selection and commit still work in safe mode; only the stored
    // hides stay unapplied
    block_node(&mut exec, &snap, BANNER, true).await;
    assert_eq!(exec.session().len(), 1);
    assert!(exec.startup().is_empty());
}

#[tokio::test]
async fn clear_session_flow_empties_the_store() {
    let snap = page();
    let mut exec = BlockExecutor::new(config(), MemoryRuleStore::new()).expect("init");
    block_node(&mut exec, &snap, BANNER, true).await;
    assert_eq!(exec.session().len(), 1);

    exec.dispatch(&snap, EngineEvent::ClearSession).await;
    let effects = exec
        .dispatch(&snap, EngineEvent::DialogConfirm { decision: None })
        .await;

    assert!(effects.iter().any(|e| matches!(e, Effect::ClearSessionBlocks)));
    assert_eq!(notice_level(&effects), Some(NoticeLevel::Info));
    assert!(exec.session().is_empty());
}
