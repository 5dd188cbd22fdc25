use std::sync::{Arc, RwLock};

use models::AnalysisResult;
use storage::{KeyValueStore, MemoryStore};

use crate::error::{Result, SessionError};
use crate::{read, write};

/// Session storage key holding the serialized current result.
pub const RESULT_KEY: &str = "analysisResults";

/// Holds at most one analysis result for the current session.
///
/// The slot is mirrored into session-scoped storage so a results view entered
/// directly (without going through an upload) can pick it back up.
pub struct ResultContext {
    slot: RwLock<Option<Arc<AnalysisResult>>>,
    store: Arc<dyn KeyValueStore>,
}

impl ResultContext {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self {
            slot: RwLock::new(None),
            store,
        }
    }

    /// Context backed by process memory only.
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryStore::new()))
    }

    /// Replaces whatever was loaded before. The in-memory slot is always
    /// replaced. If the new result cannot be mirrored into storage, the stored
    /// copy of the previous one is dropped so it can never be restored in its
    /// place; neither failure is returned.
    pub fn load(&self, result: AnalysisResult) -> Arc<AnalysisResult> {
        let result = Arc::new(result);
        *write(&self.slot) = Some(Arc::clone(&result));

        let persisted = serde_json::to_string(result.as_ref())
            .map_err(SessionError::from)
            .and_then(|json| self.store.set(RESULT_KEY, &json).map_err(SessionError::from));
        if let Err(e) = persisted {
            tracing::warn!(error = %e, "could not mirror analysis result into session storage");
            if let Err(e) = self.store.remove(RESULT_KEY) {
                tracing::error!(error = %e, "stale analysis result left in session storage");
            }
        }

        tracing::info!(
            transactions = result.transaction_count,
            alerts = result.alerts.len(),
            "analysis result loaded"
        );
        result
    }

    /// The loaded result, restoring it from session storage if needed.
    pub fn current(&self) -> Result<Arc<AnalysisResult>> {
        if let Some(result) = read(&self.slot).as_ref() {
            return Ok(Arc::clone(result));
        }

        let raw = match self.store.get(RESULT_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => return Err(SessionError::NotLoaded),
            Err(e) => {
                tracing::warn!(error = %e, "reading session storage failed");
                return Err(SessionError::NotLoaded);
            }
        };

        match serde_json::from_str::<AnalysisResult>(&raw) {
            Ok(result) => {
                let result = Arc::new(result);
                let mut slot = write(&self.slot);
                // a concurrent load() wins over the stored copy
                let current = slot.get_or_insert_with(|| Arc::clone(&result));
                tracing::debug!("analysis result restored from session storage");
                Ok(Arc::clone(current))
            }
            Err(e) => {
                tracing::warn!(error = %e, "stored analysis result is unreadable");
                Err(SessionError::NotLoaded)
            }
        }
    }

    pub fn is_loaded(&self) -> bool {
        self.current().is_ok()
    }

    /// Ends the session: drops the result and its stored copy.
    pub fn clear(&self) -> Result<()> {
        *write(&self.slot) = None;
        self.store.remove(RESULT_KEY)?;
        tracing::info!("analysis session cleared");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use models::{CategoryTally, Merchant};
    use std::sync::Mutex;
    use storage::StorageError;

    /// Keeps whatever it was seeded with; every write fails.
    struct ReadOnlyStore {
        value: Mutex<Option<String>>,
    }

    impl KeyValueStore for ReadOnlyStore {
        fn get(&self, _key: &str) -> storage::Result<Option<String>> {
            Ok(self.value.lock().unwrap().clone())
        }

        fn set(&self, key: &str, _value: &str) -> storage::Result<()> {
            Err(StorageError::Io {
                key: key.to_string(),
                source: std::io::Error::other("disk full"),
            })
        }

        fn remove(&self, _key: &str) -> storage::Result<()> {
            *self.value.lock().unwrap() = None;
            Ok(())
        }
    }

    fn result_with_waste(total_waste: f64) -> AnalysisResult {
        AnalysisResult {
            total_waste,
            transaction_count: 3,
            ..AnalysisResult::default()
        }
    }

    #[test]
    fn test_not_loaded_before_any_load() {
        let context = ResultContext::in_memory();
        assert!(matches!(context.current(), Err(SessionError::NotLoaded)));
        assert!(!context.is_loaded());
    }

    #[test]
    fn test_load_replaces_wholesale() {
        let context = ResultContext::in_memory();
        let mut first = result_with_waste(100.0);
        first.top_merchants.push(Merchant {
            name: "Zomato".into(),
            count: 4,
            amount: 800.0,
        });
        first.category_summary.fees = CategoryTally { count: 2, total: 40.0 };
        context.load(first);

        context.load(result_with_waste(250.0));
        let current = context.current().unwrap();
        assert_eq!(current.total_waste, 250.0);
        assert!(current.top_merchants.is_empty());
        assert_eq!(current.category_summary.fees.count, 0);
    }

    #[test]
    fn test_restores_from_session_storage() {
        let store: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
        ResultContext::new(Arc::clone(&store)).load(result_with_waste(42.0));

        // a fresh view over the same session storage
        let reopened = ResultContext::new(store);
        assert_eq!(reopened.current().unwrap().total_waste, 42.0);
    }

    #[test]
    fn test_failed_mirror_never_restores_previous_result() {
        let seeded = serde_json::to_string(&result_with_waste(1.0)).unwrap();
        let store: Arc<dyn KeyValueStore> = Arc::new(ReadOnlyStore {
            value: Mutex::new(Some(seeded)),
        });

        let context = ResultContext::new(Arc::clone(&store));
        context.load(result_with_waste(999.0));
        assert_eq!(context.current().unwrap().total_waste, 999.0);

        // a later process over the same storage must not see the old analysis
        let reopened = ResultContext::new(store);
        assert!(matches!(reopened.current(), Err(SessionError::NotLoaded)));
    }

    #[test]
    fn test_unreadable_stored_result_is_not_loaded() {
        let store: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
        store.set(RESULT_KEY, "{ truncated").unwrap();
        let context = ResultContext::new(store);
        assert!(matches!(context.current(), Err(SessionError::NotLoaded)));
    }

    #[test]
    fn test_clear_ends_session() {
        let store: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
        let context = ResultContext::new(Arc::clone(&store));
        context.load(result_with_waste(1.0));

        context.clear().unwrap();
        assert!(matches!(context.current(), Err(SessionError::NotLoaded)));
        assert_eq!(store.get(RESULT_KEY).unwrap(), None);
    }
}
