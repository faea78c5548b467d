//! Wire protocol between the host shell and the engine: raw
//! interaction events in, renderable effects out.

use crate::dialog::{BlockDecision, DialogRequest};
use crate::rules::BlockRule;
use serde::{Deserialize, Serialize};
use shroud_dom::NodeId;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum EngineEvent {
    /// Explicit mode toggle (chrome button). `force` pins the state.
    Toggle {
        #[serde(default)]
        force: Option<bool>,
    },
    PointerOver { node: NodeId },
    Click { node: NodeId },
    KeyDown { key: String },
    /// Confirm the open dialog. The decision is present for the block
    /// form and absent for simple confirmations.
    DialogConfirm {
        #[serde(default)]
        decision: Option<BlockDecision>,
    },
    DialogCancel,
    /// Request clearing all session-only blocks (confirmed via dialog).
    ClearSession,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "effect", rename_all = "snake_case")]
pub enum Effect {
    /// Add or remove the document-wide marker class driving the
    /// hover-affordance styling.
    SetMode { active: bool },
    /// Move the hover indicator to exactly cover the target, in page
    /// coordinates (viewport rect plus scroll offset).
    PositionOverlay { rect: OverlayBox },
    HideOverlay,
    /// The host must suppress the intercepted event's default action.
    SuppressDefault,
    OpenDialog { request: DialogRequest },
    CloseDialog,
    /// Append a style rule to the document head.
    InjectStyle { css: String },
    /// Record a session-only block in the host's ephemeral storage.
    PersistSession { selector: String },
    /// Submit a confirmed rule to the rule store. Resolved by the
    /// executor; hosts never see this one.
    SubmitRule { rule: BlockRule },
    /// Drop every session-only block.
    ClearSessionBlocks,
    Notify { notice: Notice },
}

/// Hover indicator placement, page coordinates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct OverlayBox {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NoticeLevel {
    Success,
    Error,
    Warning,
    Info,
}

impl Notice {
    pub fn success(message: impl Into<String>) -> Self {
        Self { level: NoticeLevel::Success, message: message.into() }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self { level: NoticeLevel::Error, message: message.into() }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self { level: NoticeLevel::Warning, message: message.into() }
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self { level: NoticeLevel::Info, message: message.into() }
    }
}
