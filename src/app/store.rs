use std::marker::PhantomData;

use parking_lot::RwLock;
use serde_json::Value;
use tokio::sync::watch;

use super::envelope::{ActionEnvelope, ActionError, TypedAction};
use super::mvi::Reducer;

/// Type-erased view of a store, as seen by the server.
pub trait StateLayer: Send + Sync + 'static {
    /// Decode and reduce a business action. Returns the new revision.
    fn dispatch(&self, envelope: &ActionEnvelope) -> Result<u64, ActionError>;

    /// Current state as the route model.
    fn view_model(&self) -> Value;

    fn revision(&self) -> u64;

    /// Wakes on every revision bump.
    fn subscribe(&self) -> watch::Receiver<u64>;
}

/// Owns the application state and its revision counter.
///
/// Every reduction or external notification bumps the revision exactly
/// once, which is what push streams listen for.
pub struct Store<R: Reducer> {
    state: RwLock<R::State>,
    revision: watch::Sender<u64>,
    _reducer: PhantomData<fn() -> R>,
}

impl<R: Reducer> Store<R> {
    pub fn new(initial: R::State) -> Self {
        let (revision, _) = watch::channel(0);
        Self {
            state: RwLock::new(initial),
            revision,
            _reducer: PhantomData,
        }
    }

    pub fn state(&self) -> R::State {
        self.state.read().clone()
    }

    /// Reduce an already-typed intent.
    pub fn apply(&self, intent: R::Intent) -> u64 {
        {
            let mut state = self.state.write();
            let current = std::mem::take(&mut *state);
            *state = R::reduce(current, intent);
        }
        self.bump()
    }

    /// Mutate state from outside the action path (timers, other services)
    /// and wake every push stream.
    pub fn update_external(&self, f: impl FnOnce(&mut R::State)) -> u64 {
        f(&mut self.state.write());
        self.bump()
    }

    /// Signal that state changed through a channel the store cannot see.
    pub fn notify_external(&self) -> u64 {
        self.bump()
    }

    fn bump(&self) -> u64 {
        self.revision.send_modify(|rev| *rev += 1);
        let revision = *self.revision.borrow();
        tracing::debug!(revision, "State revision bumped");
        revision
    }
}

impl<R: Reducer> StateLayer for Store<R>
where
    R::Intent: TypedAction,
{
    fn dispatch(&self, envelope: &ActionEnvelope) -> Result<u64, ActionError> {
        let intent = R::Intent::decode(envelope)?;
        Ok(self.apply(intent))
    }

    fn view_model(&self) -> Value {
        let state = self.state.read();
        serde_json::to_value(&*state).unwrap_or_else(|e| {
            tracing::error!(error = %e, "Failed to serialize state");
            Value::Null
        })
    }

    fn revision(&self) -> u64 {
        *self.revision.borrow()
    }

    fn subscribe(&self) -> watch::Receiver<u64> {
        self.revision.subscribe()
    }
}
