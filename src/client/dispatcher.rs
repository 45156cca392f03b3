use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use serde_json::{json, Map, Value};
use tokio::task::JoinHandle;

use crate::app::{ActionEnvelope, NAVIGATE_PREFIX};
use crate::config::ClientConfig;
use crate::render::Snapshot;

use super::document::Document;
use super::events::{find_binding, EventKind};
use super::fingerprint::fingerprint;
use super::history::History;
use super::reconciler::Reconciler;
use super::transport::ActionTransport;

/// Element attribute holding the JSON payload sent with a bound event.
pub const PAYLOAD_ATTR: &str = "data-payload";

/// What happened to a snapshot handed to the dispatcher.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplyOutcome {
    Applied,
    /// Byte-identical to the last applied snapshot; nothing touched.
    Duplicate,
    /// Not a decodable snapshot; dropped.
    Malformed,
}

struct ViewState<D: Document> {
    reconciler: Reconciler<D>,
    last_fingerprint: Option<u64>,
    renders: usize,
}

/// What a debounce timer is keyed by. Delegated events key on the bound
/// element, so two inputs sharing an action never cancel each other.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum Binding<E> {
    Named(String),
    Element(E),
}

struct Inner<D: Document, T> {
    view: Mutex<ViewState<D>>,
    transport: T,
    history: Arc<dyn History>,
    connected: AtomicBool,
    queue: Mutex<VecDeque<ActionEnvelope>>,
    timers: Mutex<HashMap<Binding<D::Element>, JoinHandle<()>>>,
    debounce: Duration,
}

/// Client-side action pipeline.
///
/// Cheap to clone; every clone drives the same reconciler. Snapshots from
/// action responses and from the push channel both go through
/// [`apply_snapshot_bytes`](Self::apply_snapshot_bytes), which holds the
/// reconciler lock for the whole apply.
pub struct Dispatcher<D: Document, T> {
    inner: Arc<Inner<D, T>>,
}

impl<D: Document, T> Clone for Dispatcher<D, T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<D, T> Dispatcher<D, T>
where
    D: Document + Send + 'static,
    D::Element: Send,
    T: ActionTransport + 'static,
{
    pub fn new(
        reconciler: Reconciler<D>,
        transport: T,
        history: Arc<dyn History>,
        config: &ClientConfig,
    ) -> Self {
        Self {
            inner: Arc::new(Inner {
                view: Mutex::new(ViewState {
                    reconciler,
                    last_fingerprint: None,
                    renders: 0,
                }),
                transport,
                history,
                connected: AtomicBool::new(true),
                queue: Mutex::new(VecDeque::new()),
                timers: Mutex::new(HashMap::new()),
                debounce: config.debounce(),
            }),
        }
    }

    pub fn transport(&self) -> &T {
        &self.inner.transport
    }

    pub fn is_connected(&self) -> bool {
        self.inner.connected.load(Ordering::SeqCst)
    }

    pub fn queued(&self) -> usize {
        self.inner.queue.lock().len()
    }

    /// Snapshots applied to the document so far. Duplicates and malformed
    /// frames are not counted.
    pub fn renders(&self) -> usize {
        self.inner.view.lock().renders
    }

    /// Run `f` against the reconciler under its lock.
    pub fn with_reconciler<R>(&self, f: impl FnOnce(&Reconciler<D>) -> R) -> R {
        f(&self.inner.view.lock().reconciler)
    }

    /// Send an action. `navigate:<path>` is intercepted: the path goes
    /// onto history and the server sees a plain `navigate`.
    pub async fn send(&self, action: &str, payload: Value) {
        let envelope = match action.strip_prefix(NAVIGATE_PREFIX) {
            Some(path) => {
                self.inner.history.push(path);
                ActionEnvelope::navigate(path)
            }
            None => ActionEnvelope::new(action, payload),
        };
        self.dispatch(envelope).await;
    }

    /// Back/forward: the browser already moved, so only the server is told.
    pub async fn pop_state(&self, path: &str) {
        self.dispatch(ActionEnvelope::navigate(path)).await;
    }

    async fn dispatch(&self, envelope: ActionEnvelope) {
        if !self.is_connected() {
            tracing::debug!(action = %envelope.action, "Offline, queueing action");
            self.inner.queue.lock().push_back(envelope);
            return;
        }

        match self.inner.transport.post(&envelope).await {
            Ok(bytes) => {
                self.apply_snapshot_bytes(&bytes);
            }
            Err(err) => {
                tracing::warn!(action = %envelope.action, error = %err, "Action failed");
                if err.is_connectivity() {
                    self.inner.connected.store(false, Ordering::SeqCst);
                    self.inner.queue.lock().push_back(envelope);
                }
            }
        }
    }

    /// Record connectivity. Going online replays queued actions in the
    /// order they were sent.
    pub async fn set_connected(&self, connected: bool) {
        let was = self.inner.connected.swap(connected, Ordering::SeqCst);
        if !connected || was {
            return;
        }

        let pending: Vec<_> = self.inner.queue.lock().drain(..).collect();
        if !pending.is_empty() {
            tracing::info!(count = pending.len(), "Back online, replaying queued actions");
        }
        for envelope in pending {
            self.dispatch(envelope).await;
        }
    }

    /// Coalesce rapid input on one binding into a single send of the
    /// latest value, after a quiet period.
    pub fn input(&self, binding: &str, value: impl Into<String>) {
        self.schedule_input(
            Binding::Named(binding.to_string()),
            binding.to_string(),
            json!({ "value": value.into() }),
        );
    }

    /// Debounce timers still waiting to fire.
    pub fn pending_inputs(&self) -> usize {
        self.inner.timers.lock().len()
    }

    fn schedule_input(&self, binding: Binding<D::Element>, action: String, payload: Value) {
        let mut timers = self.inner.timers.lock();
        if let Some(pending) = timers.remove(&binding) {
            pending.abort();
        }

        let this = self.clone();
        let key = binding.clone();
        let delay = self.inner.debounce;
        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            this.release_timer(&key, tokio::task::id());
            this.send(&action, payload).await;
        });
        timers.insert(binding, handle);
    }

    /// Drop the timer entry for `binding` only if it still belongs to the
    /// task `owner`; a newer timer registered meanwhile stays abortable.
    fn release_timer(&self, binding: &Binding<D::Element>, owner: tokio::task::Id) {
        let mut timers = self.inner.timers.lock();
        if timers.get(binding).map(JoinHandle::id) == Some(owner) {
            timers.remove(binding);
        }
    }

    /// Document-level delegation. Returns `false` when nothing under the
    /// mount is bound to `kind` on the target's ancestor chain. Input
    /// events are debounced per bound element.
    pub async fn handle_event(
        &self,
        target: &D::Element,
        kind: EventKind,
        value: Option<String>,
    ) -> bool {
        let found = {
            let view = self.inner.view.lock();
            let document = view.reconciler.document();
            find_binding(document, target, kind, view.reconciler.mount()).map(
                |(element, action)| {
                    let extra = document.attribute(&element, PAYLOAD_ATTR);
                    (element, action, extra)
                },
            )
        };
        let Some((element, action, extra)) = found else {
            return false;
        };

        let mut payload = match extra.and_then(|raw| serde_json::from_str::<Value>(&raw).ok()) {
            Some(Value::Object(map)) => map,
            _ => Map::new(),
        };
        if let Some(value) = value {
            payload.insert("value".to_string(), Value::String(value));
        }

        if kind.is_debounced() {
            self.schedule_input(Binding::Element(element), action, Value::Object(payload));
        } else {
            self.send(&action, Value::Object(payload)).await;
        }
        true
    }

    /// Common path for action responses and push frames.
    pub fn apply_snapshot_bytes(&self, bytes: &[u8]) -> ApplyOutcome {
        let fp = fingerprint(bytes);
        let mut view = self.inner.view.lock();
        if view.last_fingerprint == Some(fp) {
            tracing::trace!(fingerprint = fp, "Duplicate snapshot dropped");
            return ApplyOutcome::Duplicate;
        }

        match Snapshot::from_slice(bytes) {
            Ok(snapshot) => {
                view.reconciler.apply(&snapshot);
                view.last_fingerprint = Some(fp);
                view.renders += 1;
                ApplyOutcome::Applied
            }
            Err(err) => {
                tracing::warn!(error = %err, len = bytes.len(), "Dropping malformed snapshot");
                ApplyOutcome::Malformed
            }
        }
    }
}
