use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use crate::credentials::DurableStore;

/// In-memory DurableStore for testing and sessions that should not outlive
/// the process.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    values: Arc<Mutex<HashMap<String, String>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl DurableStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.lock().ok()?.get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) {
        if let Ok(mut values) = self.values.lock() {
            values.insert(key.to_string(), value.to_string());
        }
    }

    fn remove(&self, key: &str) {
        if let Ok(mut values) = self.values.lock() {
            values.remove(key);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_get_remove() {
        let store = MemoryStore::new();

        assert!(store.get("note_token").is_none());

        store.set("note_token", "abc");
        assert_eq!(store.get("note_token").as_deref(), Some("abc"));

        // Last writer wins
        store.set("note_token", "def");
        assert_eq!(store.get("note_token").as_deref(), Some("def"));

        store.remove("note_token");
        assert!(store.get("note_token").is_none());
    }

    #[test]
    fn test_remove_missing_key_is_noop() {
        let store = MemoryStore::new();
        store.remove("nothing");
        assert!(store.get("nothing").is_none());
    }
}
