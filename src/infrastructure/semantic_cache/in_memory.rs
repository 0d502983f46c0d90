//! In-memory snapshot store

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::RwLock;

use async_trait::async_trait;

use crate::domain::semantic_cache::{CacheSnapshot, SnapshotStore};
use crate::domain::DomainError;

/// Keeps the last saved snapshot in memory.
///
/// Saves can be made to fail on demand to exercise persistence error paths.
#[derive(Debug, Default)]
pub struct InMemorySnapshotStore {
    snapshot: RwLock<Option<CacheSnapshot>>,
    fail_saves: AtomicBool,
    saves: AtomicUsize,
}

impl InMemorySnapshotStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from an existing snapshot
    pub fn with_snapshot(snapshot: CacheSnapshot) -> Self {
        Self {
            snapshot: RwLock::new(Some(snapshot)),
            ..Self::default()
        }
    }

    /// Make subsequent saves fail (or succeed again)
    pub fn set_fail_saves(&self, fail: bool) {
        self.fail_saves.store(fail, Ordering::SeqCst);
    }

    /// Number of successful saves
    pub fn saves(&self) -> usize {
        self.saves.load(Ordering::SeqCst)
    }

    /// Copy of the last saved snapshot
    pub fn current(&self) -> Option<CacheSnapshot> {
        self.snapshot.read().ok().and_then(|guard| guard.clone())
    }
}

#[async_trait]
impl SnapshotStore for InMemorySnapshotStore {
    async fn load(&self) -> Result<Option<CacheSnapshot>, DomainError> {
        let snapshot = self.snapshot.read().map_err(|e| {
            DomainError::internal(format!("Failed to acquire read lock: {}", e))
        })?;

        Ok(snapshot.clone())
    }

    async fn save(&self, snapshot: &CacheSnapshot) -> Result<(), DomainError> {
        if self.fail_saves.load(Ordering::SeqCst) {
            return Err(DomainError::persistence("Snapshot storage unavailable"));
        }

        let mut stored = self.snapshot.write().map_err(|e| {
            DomainError::internal(format!("Failed to acquire write lock: {}", e))
        })?;

        *stored = Some(snapshot.clone());
        self.saves.fetch_add(1, Ordering::SeqCst);

        Ok(())
    }

    async fn reset(&self) -> Result<bool, DomainError> {
        let mut stored = self.snapshot.write().map_err(|e| {
            DomainError::internal(format!("Failed to acquire write lock: {}", e))
        })?;

        Ok(stored.take().is_some())
    }

    fn describe(&self) -> String {
        "in-memory".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_save_and_load() {
        let store = InMemorySnapshotStore::new();
        assert!(store.load().await.unwrap().is_none());

        store.save(&CacheSnapshot::empty(4)).await.unwrap();

        assert_eq!(store.load().await.unwrap(), Some(CacheSnapshot::empty(4)));
        assert_eq!(store.saves(), 1);
    }

    #[tokio::test]
    async fn test_failure_injection() {
        let store = InMemorySnapshotStore::new();
        store.set_fail_saves(true);

        let result = store.save(&CacheSnapshot::empty(4)).await;

        assert!(matches!(result, Err(DomainError::Persistence { .. })));
        assert!(store.current().is_none());

        store.set_fail_saves(false);
        store.save(&CacheSnapshot::empty(4)).await.unwrap();
        assert!(store.current().is_some());
    }

    #[tokio::test]
    async fn test_reset() {
        let store = InMemorySnapshotStore::with_snapshot(CacheSnapshot::empty(2));

        assert!(store.reset().await.unwrap());
        assert!(!store.reset().await.unwrap());
    }
}
