use crate::app::{ActionEnvelope, ActionError, Intent, TypedAction};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BoardIntent {
    /// Debounced text from the new-task box.
    Draft { value: String },
    /// Add a task; falls back to the current draft when no title is sent.
    Add { title: Option<String> },
    Toggle { id: u64 },
    Remove { id: u64 },
    ClearDone,
    SetUnlocked(bool),
}

impl Intent for BoardIntent {}

impl TypedAction for BoardIntent {
    fn decode(envelope: &ActionEnvelope) -> Result<Self, ActionError> {
        match envelope.action.as_str() {
            "draft" => Ok(BoardIntent::Draft {
                value: envelope.str_field("value").unwrap_or_default().to_string(),
            }),
            "add" => Ok(BoardIntent::Add {
                title: envelope
                    .str_field("title")
                    .or_else(|| envelope.str_field("value"))
                    .map(str::to_string),
            }),
            "toggle" => Ok(BoardIntent::Toggle {
                id: envelope.require_id()?,
            }),
            "remove" => Ok(BoardIntent::Remove {
                id: envelope.require_id()?,
            }),
            "clear_done" => Ok(BoardIntent::ClearDone),
            "unlock" => Ok(BoardIntent::SetUnlocked(true)),
            "lock" => Ok(BoardIntent::SetUnlocked(false)),
            other => Err(ActionError::UnknownAction(other.to_string())),
        }
    }
}
