use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use crate::{validate_key, KeyValueStore, Result};

/// In-process store. Contents vanish with the value, which is exactly the
/// lifetime of session-scoped data.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn entries(&self) -> MutexGuard<'_, HashMap<String, String>> {
        // a panic while holding the lock cannot leave a HashMap half-written
        self.entries.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        validate_key(key)?;
        Ok(self.entries().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        validate_key(key)?;
        self.entries().insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        validate_key(key)?;
        self.entries().remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_get_remove() {
        let store = MemoryStore::new();
        assert_eq!(store.get("doubts").unwrap(), None);

        store.set("doubts", "[]").unwrap();
        assert_eq!(store.get("doubts").unwrap().as_deref(), Some("[]"));

        store.set("doubts", "[1]").unwrap();
        assert_eq!(store.get("doubts").unwrap().as_deref(), Some("[1]"));

        store.remove("doubts").unwrap();
        assert_eq!(store.get("doubts").unwrap(), None);
        // removing again is fine
        store.remove("doubts").unwrap();
    }
}
