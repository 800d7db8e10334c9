use serde::{Deserialize, Serialize};
use ts_rs::TS;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum MessageKind {
    Error,
    Success,
    Info,
}

/// Transient status line shown above the keyboard
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct GameMessage {
    pub text: String,
    pub kind: MessageKind,
}

impl GameMessage {
    pub fn new(text: impl Into<String>, kind: MessageKind) -> Self {
        Self {
            text: text.into(),
            kind,
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self::new(text, MessageKind::Error)
    }

    pub fn success(text: impl Into<String>) -> Self {
        Self::new(text, MessageKind::Success)
    }

    pub fn info(text: impl Into<String>) -> Self {
        Self::new(text, MessageKind::Info)
    }
}
