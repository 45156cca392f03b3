use std::collections::HashMap;
use std::hash::Hash;

/// Key → element currently representing that key.
///
/// Owned by exactly one reconciler, so unrelated mounts never see each
/// other's keys. Within one mount keys are global: two subtrees reusing a
/// key string share one entry.
#[derive(Debug)]
pub struct KeyRegistry<E> {
    entries: HashMap<String, E>,
}

impl<E: Clone + Eq + Hash> KeyRegistry<E> {
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    pub fn get(&self, key: &str) -> Option<&E> {
        self.entries.get(key)
    }

    pub fn insert(&mut self, key: impl Into<String>, element: E) {
        self.entries.insert(key.into(), element);
    }

    /// Drop `key` only if it still points at `element`; a newer element
    /// registered under the same key is left alone.
    pub fn release(&mut self, key: &str, element: &E) -> bool {
        if self.entries.get(key) == Some(element) {
            self.entries.remove(key);
            true
        } else {
            false
        }
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

impl<E: Clone + Eq + Hash> Default for KeyRegistry<E> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn release_ignores_replaced_entries() {
        let mut registry = KeyRegistry::new();
        registry.insert("row", 1u32);
        registry.insert("row", 2u32);
        assert!(!registry.release("row", &1));
        assert_eq!(registry.get("row"), Some(&2));
        assert!(registry.release("row", &2));
        assert!(registry.is_empty());
    }
}
