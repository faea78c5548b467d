//! Element-blocking engine: selector synthesis over a scanned DOM
//! snapshot, a hover/click selection state machine, and the block
//! dialog, stores and stylesheet plumbing around them.

pub mod candidate;
pub mod config;
pub mod css;
pub mod dialog;
pub mod engine;
pub mod executor;
pub mod guard;
pub mod heuristics;
pub mod protocol;
pub mod rules;
pub mod session;
pub mod synthesize;

pub use candidate::{SelectorCandidate, label_guess};
pub use config::{EngineConfig, Labels, NavigationConfig, Role};
pub use dialog::{BlockDecision, BlockForm, DialogRequest};
pub use engine::{InitError, Mode, SelectionEngine};
pub use executor::BlockExecutor;
pub use guard::{NavigationDecision, enforce};
pub use protocol::{Effect, EngineEvent, Notice, NoticeLevel, OverlayBox};
pub use rules::{BlockRule, MemoryRuleStore, RuleStore, StoreError, rule_key};
pub use session::SessionStore;
pub use synthesize::{navigation_target, synthesize};
