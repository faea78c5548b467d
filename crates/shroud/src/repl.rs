//! Interactive picking session: drive the full engine pipeline against
//! a snapshot file and print every effect the host shell would render.

use shroud_dom::selector::parse;
use shroud_dom::{DomSnapshot, query_all};
use shroud_engine::config::{EngineConfig, NavigationConfig, Role};
use shroud_engine::css::stylesheet_for_viewer;
use shroud_engine::dialog::{BlockForm, DialogRequest};
use shroud_engine::executor::BlockExecutor;
use shroud_engine::guard::{NavigationDecision, enforce};
use shroud_engine::protocol::{Effect, EngineEvent};
use shroud_engine::rules::{MemoryRuleStore, rule_key};
use std::io::{self, Write};

/// Dialog state between an OpenDialog effect and the user's verdict.
enum OpenDialog {
    Block(BlockForm),
    Confirm,
}

struct ReplState {
    exec: BlockExecutor<MemoryRuleStore>,
    snapshot: DomSnapshot,
    dialog: Option<OpenDialog>,
}

pub async fn run(
    snapshot: DomSnapshot,
    nav: Option<NavigationConfig>,
    exclusions: Vec<String>,
) -> anyhow::Result<()> {
    let config = EngineConfig {
        auth_token: Some("local-session".into()),
        exclusion_list: exclusions,
        roles: vec![
            Role { slug: "editor".into(), name: "Editor".into() },
            Role { slug: "author".into(), name: "Author".into() },
        ],
        navigation: nav,
        ..EngineConfig::default()
    };

    let mut state = ReplState {
        exec: BlockExecutor::new(config, MemoryRuleStore::new())?,
        snapshot,
        dialog: None,
    };

    println!(
        "Snapshot loaded: {} nodes from {}",
        state.snapshot.len(),
        state.snapshot.page.url
    );
    println!("Commands: toggle, hover <id>, click <id>, confirm [--session] [--restrict] [label],");
    println!("          cancel, esc, nodes, query <selector>, rules, session, clear-session,");
    println!("          stylesheet [roles...], visit <path> [roles...], quit");

    for effect in state.exec.startup() {
        print_effect(&effect);
    }

    let stdin = io::stdin();
    let mut stdout = io::stdout();
    let mut input = String::new();

    loop {
        print!("> ");
        stdout.flush()?;
        input.clear();
        if stdin.read_line(&mut input)? == 0 {
            break;
        }

        let trimmed = input.trim();
        if trimmed.is_empty() {
            continue;
        }
        if trimmed == "exit" || trimmed == "quit" {
            break;
        }

        execute_line(&mut state, trimmed).await;
    }

    println!("Session closed.");
    Ok(())
}

async fn execute_line(state: &mut ReplState, line: &str) {
    let (command, rest) = match line.split_once(' ') {
        Some((c, r)) => (c, r.trim()),
        None => (line, ""),
    };

    match command {
        "toggle" => dispatch(state, EngineEvent::Toggle { force: None }).await,
        "hover" => match rest.parse() {
            Ok(node) => dispatch(state, EngineEvent::PointerOver { node }).await,
            Err(_) => println!("usage: hover <node-id>"),
        },
        "click" => match rest.parse() {
            Ok(node) => dispatch(state, EngineEvent::Click { node }).await,
            Err(_) => println!("usage: click <node-id>"),
        },
        "esc" => dispatch(state, EngineEvent::KeyDown { key: "Escape".into() }).await,
        "confirm" => confirm(state, rest).await,
        "cancel" => {
            state.dialog = None;
            dispatch(state, EngineEvent::DialogCancel).await;
        }
        "clear-session" => dispatch(state, EngineEvent::ClearSession).await,
        "nodes" => list_nodes(state),
        "query" => query(state, rest),
        "rules" => list_rules(state),
        "session" => {
            for selector in state.exec.session().selectors() {
                println!("  {selector}");
            }
        }
        "stylesheet" => {
            let roles: Vec<String> = rest.split_whitespace().map(str::to_string).collect();
            match stylesheet_for_viewer(state.exec.store().rules(), &roles, false) {
                Some(css) => println!("{css}"),
                None => println!("(nothing hidden for this viewer)"),
            }
        }
        "visit" => {
            let mut parts = rest.split_whitespace();
            let Some(path) = parts.next() else {
                println!("usage: visit <path> [roles...]");
                return;
            };
            let roles: Vec<String> = parts.map(str::to_string).collect();
            let decision = enforce(state.exec.store().rules(), path, &roles, false, &[]);
            match decision {
                NavigationDecision::Allow => println!("allowed: {path}"),
                NavigationDecision::Deny { target_url, label } => {
                    println!("denied: {path} (hard block {label:?} on {target_url})")
                }
            }
        }
        _ => println!("Unknown command: {command}"),
    }
}

async fn confirm(state: &mut ReplState, rest: &str) {
    match state.dialog.take() {
        Some(OpenDialog::Block(mut form)) => {
            let mut label_words = Vec::new();
            for word in rest.split_whitespace() {
                match word {
                    "--session" => form.set_session_only(true),
                    "--restrict" => form.set_hard_block(true),
                    other => label_words.push(other),
                }
            }
            if !label_words.is_empty() {
                form.set_label(&label_words.join(" "));
            }
            let decision = form.decision();
            dispatch(state, EngineEvent::DialogConfirm { decision: Some(decision) }).await;
        }
        Some(OpenDialog::Confirm) => {
            dispatch(state, EngineEvent::DialogConfirm { decision: None }).await;
        }
        None => println!("No open dialog."),
    }
}

async fn dispatch(state: &mut ReplState, event: EngineEvent) {
    let effects = state.exec.dispatch(&state.snapshot, event).await;
    for effect in effects {
        if let Effect::OpenDialog { request } = &effect {
            state.dialog = Some(match request {
                DialogRequest::Block { candidate, roles, .. } => {
                    OpenDialog::Block(BlockForm::new(candidate.clone(), roles))
                }
                DialogRequest::Confirm { .. } => OpenDialog::Confirm,
            });
        }
        if matches!(effect, Effect::CloseDialog) {
            state.dialog = None;
        }
        print_effect(&effect);
    }
}

fn print_effect(effect: &Effect) {
    match effect {
        Effect::SetMode { active } => {
            println!("mode: {}", if *active { "active" } else { "inactive" })
        }
        Effect::PositionOverlay { rect } => println!(
            "overlay: {}x{} at ({}, {})",
            rect.width, rect.height, rect.x, rect.y
        ),
        Effect::HideOverlay => println!("overlay hidden"),
        Effect::SuppressDefault => println!("(default action suppressed)"),
        Effect::OpenDialog { request } => match request {
            DialogRequest::Confirm { title, message } => {
                println!("dialog [{title}]: {message}");
                println!("  -> confirm | cancel");
            }
            DialogRequest::Block { candidate, warning, roles } => {
                println!("dialog [Block Element]");
                println!("  selector: {}", candidate.selector);
                println!("  label:    {}", candidate.label);
                println!("  matches:  {}", candidate.match_count);
                if let Some(warning) = warning {
                    println!("  warning:  {warning}");
                }
                if let Some(url) = &candidate.target_url {
                    println!("  target:   {url} (--restrict available)");
                }
                let names: Vec<&str> = roles.iter().map(|r| r.name.as_str()).collect();
                println!("  roles:    {} (all checked)", names.join(", "));
                println!("  -> confirm [--session] [--restrict] [label] | cancel");
            }
        },
        Effect::CloseDialog => println!("dialog closed"),
        Effect::InjectStyle { css } => println!("style injected: {}", truncate(css, 72)),
        Effect::PersistSession { selector } => println!("session block stored: {selector}"),
        Effect::SubmitRule { rule } => println!("submitting rule: {}", rule.selector),
        Effect::ClearSessionBlocks => println!("session blocks cleared"),
        Effect::Notify { notice } => println!("[{:?}] {}", notice.level, notice.message),
    }
}

fn list_nodes(state: &ReplState) {
    for node in state.snapshot.iter() {
        let mut line = format!("  [{}] {}", node.id, node.tag);
        if let Some(id) = node.dom_id() {
            line.push_str(&format!("#{id}"));
        }
        let classes: Vec<&str> = node.classes().collect();
        if !classes.is_empty() {
            line.push_str(&format!(".{}", classes.join(".")));
        }
        let text = state.snapshot.visible_text(node.id);
        if !text.is_empty() {
            line.push_str(&format!("  {:?}", truncate(&text, 40)));
        }
        println!("{line}");
    }
}

fn query(state: &ReplState, selector: &str) {
    match parse(selector) {
        Ok(list) => {
            let hits = query_all(&state.snapshot, &list);
            println!("{} match(es): {hits:?}", hits.len());
        }
        Err(e) => println!("Invalid selector: {e}"),
    }
}

fn list_rules(state: &ReplState) {
    let store = state.exec.store();
    if store.is_empty() {
        println!("No persisted rules.");
        return;
    }
    for rule in store.rules() {
        let key = rule_key(&rule.selector);
        println!("  {} {:?} hidden for {:?}", &key[..12], rule.selector, rule.hidden_for);
        if rule.hard_block
            && let Some(url) = &rule.target_url
        {
            println!("    hard block: {url}");
        }
    }
}

fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        text.to_string()
    } else {
        let cut: String = text.chars().take(max).collect();
        format!("{cut}…")
    }
}
