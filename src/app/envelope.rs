use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use thiserror::Error;

/// Header carrying the session id on action requests.
pub const SESSION_HEADER: &str = "x-wiretree-session";

/// Reserved action: change the session's current path.
pub const NAVIGATE_ACTION: &str = "navigate";

/// Client-side shorthand, `navigate:/tasks/3`, rewritten before sending.
pub const NAVIGATE_PREFIX: &str = "navigate:";

#[derive(Debug, Error)]
pub enum ActionError {
    #[error("Unknown action: {0}")]
    UnknownAction(String),

    #[error("Invalid payload for '{action}': {reason}")]
    InvalidPayload { action: String, reason: String },
}

impl ActionError {
    pub fn invalid(action: &str, reason: impl Into<String>) -> Self {
        ActionError::InvalidPayload {
            action: action.to_string(),
            reason: reason.into(),
        }
    }
}

/// Request body of `POST /_action/{name}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionEnvelope {
    pub action: String,
    #[serde(default)]
    pub payload: Value,
}

impl ActionEnvelope {
    pub fn new(action: impl Into<String>, payload: Value) -> Self {
        Self {
            action: action.into(),
            payload,
        }
    }

    pub fn navigate(path: impl Into<String>) -> Self {
        Self::new(NAVIGATE_ACTION, json!({ "path": path.into() }))
    }

    /// Target path of a `navigate` envelope.
    pub fn navigate_path(&self) -> Option<&str> {
        if self.action != NAVIGATE_ACTION {
            return None;
        }
        self.payload.get("path").and_then(Value::as_str)
    }

    /// Typed `id` field of the payload. Numeric strings are accepted so
    /// values read back from DOM attributes still decode.
    pub fn target_id(&self) -> Option<u64> {
        match self.payload.get("id")? {
            Value::Number(n) => n.as_u64(),
            Value::String(s) => s.parse().ok(),
            _ => None,
        }
    }

    pub fn str_field(&self, name: &str) -> Option<&str> {
        self.payload.get(name).and_then(Value::as_str)
    }

    /// Like [`target_id`](Self::target_id) but reports a missing id.
    pub fn require_id(&self) -> Result<u64, ActionError> {
        self.target_id()
            .ok_or_else(|| ActionError::invalid(&self.action, "missing numeric 'id'"))
    }
}

/// Decode an envelope into a typed action, once, at the boundary.
pub trait TypedAction: Sized {
    fn decode(envelope: &ActionEnvelope) -> Result<Self, ActionError>;
}
