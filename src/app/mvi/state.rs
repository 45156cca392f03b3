use serde::Serialize;

/// Marker trait for application state.
///
/// The serialized form is what route pages see as their model, so it
/// must serialize without side effects.
pub trait UiState: Clone + Default + Serialize + Send + Sync + 'static {}
