//! Model-View-Intent primitives for the business layer.
//!
//! ```text
//! Action ──→ Intent ──→ Reducer ──→ State ──→ Route view
//!                                      │
//!                       revision bump ─┴─→ push channel
//! ```
//!
//! - **State**: serializable model handed to pages as `props.model`
//! - **Intent**: a decoded action
//! - **Reducer**: pure `(State, Intent) -> State`

mod intent;
mod reducer;
mod state;

pub use intent::Intent;
pub use reducer::Reducer;
pub use state::UiState;
