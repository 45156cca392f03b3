//! Nested route, layout and guard resolution.
//!
//! Definitions are compiled once into an immutable matcher tree when the
//! [`Router`] is built. Resolution is a pure, depth-first walk of that tree:
//!
//! ```text
//! path → normalize → match (first sibling wins, children before page)
//!      → guards (outer → inner) → page → layouts (inner → outer)
//! ```

mod definition;
mod error;
mod pattern;
mod resolver;

pub use definition::{GuardDecision, GuardFn, LayoutFn, PageFn, Props, RouteDefinition};
pub use error::RouteError;
pub use pattern::{normalize_path, percent_decode};
pub use resolver::{Followed, Resolution, RouteMatch, Router};
