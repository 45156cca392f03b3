//! Snapshot rendering.
//!
//! One tree feeds two outputs: HTML for first paint and a JSON wire
//! snapshot for every later update. Both go through [`extract_head`] first,
//! so the body tree is structurally identical in the two forms.

mod boundary;
mod document;
mod head;
mod html;
mod wire;

pub use boundary::{fallback_node, not_found_node, render_boundary, RENDER_ERROR_CLASS};
pub use document::{render_document, DocumentOptions, SESSION_META, SNAPSHOT_SCRIPT_ID};
pub use head::extract_head;
pub use html::{escape_html, render_html, VOID_TAGS};
pub use wire::{Snapshot, SnapshotError};
