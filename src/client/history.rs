use parking_lot::Mutex;

/// Browser-history seam. The dispatcher pushes entries on intercepted
/// navigation; back/forward come in through
/// [`Dispatcher::pop_state`](super::Dispatcher::pop_state).
pub trait History: Send + Sync {
    fn push(&self, path: &str);

    fn current(&self) -> Option<String>;
}

/// History kept in memory, for headless clients and tests.
#[derive(Debug, Default)]
pub struct MemoryHistory {
    entries: Mutex<Vec<String>>,
}

impl MemoryHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> Vec<String> {
        self.entries.lock().clone()
    }
}

impl History for MemoryHistory {
    fn push(&self, path: &str) {
        self.entries.lock().push(path.to_string());
    }

    fn current(&self) -> Option<String> {
        self.entries.lock().last().cloned()
    }
}
