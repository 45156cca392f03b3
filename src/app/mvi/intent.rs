/// Marker trait for decoded actions.
///
/// Intents are built from an [`ActionEnvelope`](crate::app::ActionEnvelope)
/// exactly once, at the server boundary, and then handed to a reducer.
pub trait Intent: Send + 'static {}
