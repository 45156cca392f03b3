//! View Tree Model.
//!
//! The node format exchanged between renderer and client. No logic beyond
//! construction and lenient decoding lives here.

mod attr;
mod node;

pub use attr::{AttrValue, IntoAttr};
pub use node::{ViewNode, HEAD_TAG, TEXT_TAG};
pub(crate) use node::is_valid_name;
