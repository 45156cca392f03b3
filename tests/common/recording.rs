//! Scriptable in-process transport.

use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use parking_lot::Mutex;
use wiretree::app::ActionEnvelope;
use wiretree::client::{ActionTransport, TransportError};
use wiretree::render::Snapshot;
use wiretree::view::ViewNode;

/// Records every posted envelope and answers with a snapshot whose root
/// text names the action and its payload.
#[derive(Default)]
pub struct RecordingTransport {
    sent: Mutex<Vec<ActionEnvelope>>,
    offline: AtomicBool,
    /// When set, every response carries this exact snapshot.
    fixed: Mutex<Option<Vec<u8>>>,
}

impl RecordingTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    pub fn respond_with(&self, bytes: Vec<u8>) {
        *self.fixed.lock() = Some(bytes);
    }

    pub fn sent(&self) -> Vec<ActionEnvelope> {
        self.sent.lock().clone()
    }

    pub fn actions(&self) -> Vec<String> {
        self.sent.lock().iter().map(|e| e.action.clone()).collect()
    }
}

#[async_trait]
impl ActionTransport for RecordingTransport {
    async fn post(&self, envelope: &ActionEnvelope) -> Result<Vec<u8>, TransportError> {
        if self.offline.load(Ordering::SeqCst) {
            return Err(TransportError::Connect {
                url: "memory://".to_string(),
                message: "connection refused".to_string(),
            });
        }
        self.sent.lock().push(envelope.clone());

        if let Some(bytes) = self.fixed.lock().clone() {
            return Ok(bytes);
        }
        let root = ViewNode::new("main")
            .key("root")
            .text(format!("{} {}", envelope.action, envelope.payload));
        Ok(Snapshot { root }.to_bytes().unwrap())
    }
}
