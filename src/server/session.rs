use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use parking_lot::RwLock;
use uuid::Uuid;

use crate::router::normalize_path;

#[derive(Debug, Clone)]
pub struct Session {
    /// Path the session currently renders.
    pub path: String,
    /// Last request or push-stream activity.
    pub last_seen: Instant,
    /// Open push streams. A session with a live stream is never swept.
    pub streams: usize,
}

/// Per-visitor navigation state. Business state lives in the store and is
/// shared; only the current path is per session.
#[derive(Debug, Default)]
pub struct SessionStore {
    sessions: RwLock<HashMap<String, Session>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn create(&self, path: &str) -> String {
        let id = Uuid::new_v4().to_string();
        self.sessions.write().insert(
            id.clone(),
            Session {
                path: normalize_path(path),
                last_seen: Instant::now(),
                streams: 0,
            },
        );
        tracing::debug!(session = %id, path = %path, "Session created");
        id
    }

    pub fn path(&self, id: &str) -> Option<String> {
        self.sessions.read().get(id).map(|s| s.path.clone())
    }

    /// Returns `false` when the session does not exist.
    pub fn set_path(&self, id: &str, path: &str) -> bool {
        match self.sessions.write().get_mut(id) {
            Some(session) => {
                session.path = normalize_path(path);
                session.last_seen = Instant::now();
                true
            }
            None => false,
        }
    }

    /// Mark activity. Returns `false` when the session does not exist.
    pub fn touch(&self, id: &str) -> bool {
        match self.sessions.write().get_mut(id) {
            Some(session) => {
                session.last_seen = Instant::now();
                true
            }
            None => false,
        }
    }

    pub fn contains(&self, id: &str) -> bool {
        self.sessions.read().contains_key(id)
    }

    pub fn remove(&self, id: &str) -> bool {
        let removed = self.sessions.write().remove(id).is_some();
        if removed {
            tracing::debug!(session = %id, "Session removed");
        }
        removed
    }

    /// Register an open push stream. The returned lease ends the session
    /// when it is the last stream to close.
    pub fn open_stream(self: &Arc<Self>, id: &str) -> Option<StreamLease> {
        let mut sessions = self.sessions.write();
        let session = sessions.get_mut(id)?;
        session.streams += 1;
        session.last_seen = Instant::now();
        Some(StreamLease {
            store: Arc::clone(self),
            id: id.to_string(),
        })
    }

    fn close_stream(&self, id: &str) {
        let mut sessions = self.sessions.write();
        let Some(session) = sessions.get_mut(id) else {
            return;
        };
        session.streams = session.streams.saturating_sub(1);
        if session.streams == 0 {
            sessions.remove(id);
            tracing::debug!(session = %id, "Push stream closed, session ended");
        }
    }

    /// Drop sessions idle for at least `ttl` that have no open stream.
    pub fn sweep_idle(&self, ttl: Duration) -> usize {
        let mut sessions = self.sessions.write();
        let before = sessions.len();
        sessions.retain(|_, s| s.streams > 0 || s.last_seen.elapsed() < ttl);
        let swept = before - sessions.len();
        if swept > 0 {
            tracing::debug!(swept, remaining = sessions.len(), "Idle sessions swept");
        }
        swept
    }

    pub fn len(&self) -> usize {
        self.sessions.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.read().is_empty()
    }
}

/// Held by a push stream for as long as it is open.
#[derive(Debug)]
pub struct StreamLease {
    store: Arc<SessionStore>,
    id: String,
}

impl StreamLease {
    pub fn session(&self) -> &str {
        &self.id
    }
}

impl Drop for StreamLease {
    fn drop(&mut self) {
        self.store.close_stream(&self.id);
    }
}
