//! Client runtime: keeps a live document in sync with server snapshots.
//!
//! The [`Reconciler`] owns the document and its key registry, the
//! [`Dispatcher`] owns everything that talks to the network (actions,
//! offline queue, debounce timers, dedup) and the [`PushReader`] feeds
//! server-initiated frames into the same apply path.

mod dispatcher;
mod document;
mod events;
mod fingerprint;
mod history;
mod memory;
mod push;
mod reconciler;
mod registry;
mod transport;

pub use dispatcher::{ApplyOutcome, Dispatcher, PAYLOAD_ATTR};
pub use document::Document;
pub use events::{find_binding, EventKind};
pub use fingerprint::fingerprint;
pub use history::{History, MemoryHistory};
pub use memory::{MemoryDocument, NodeId};
pub use push::{PushReader, PushStats};
pub use reconciler::{MountState, Reconciler, ACTION_ATTR_PREFIX, KEY_ATTR};
pub use registry::KeyRegistry;
pub use transport::{ActionTransport, HttpTransport, TransportError};
