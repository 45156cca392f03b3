//! Business-layer seam: MVI primitives, the action envelope and the store
//! that the server drives.

mod envelope;
mod mvi;
mod store;

pub use envelope::{
    ActionEnvelope, ActionError, TypedAction, NAVIGATE_ACTION, NAVIGATE_PREFIX, SESSION_HEADER,
};
pub use mvi::{Intent, Reducer, UiState};
pub use store::{StateLayer, Store};
