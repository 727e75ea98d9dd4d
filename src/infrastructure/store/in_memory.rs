//! In-memory entry store

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;

use crate::domain::semantic_cache::{CacheEntry, EntryStore, EvictionPolicy, OldestInserted};
use crate::domain::DomainError;

/// In-memory entry store backed by a `RwLock<HashMap>`.
///
/// Iteration copies the live entries out under the read lock, so a search
/// works against a consistent snapshot and no lock is held while scoring.
/// Suitable for development and single-process deployments; use
/// `RedisEntryStore` when entries must survive restarts.
#[derive(Debug)]
pub struct InMemoryEntryStore {
    entries: RwLock<HashMap<String, CacheEntry>>,
    embedding_size: usize,
    max_entries: Option<usize>,
    eviction: Box<dyn EvictionPolicy>,
}

impl InMemoryEntryStore {
    /// Create an unbounded store for vectors of the given length
    pub fn new(embedding_size: usize) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            embedding_size,
            max_entries: None,
            eviction: Box::new(OldestInserted),
        }
    }

    /// Bound the store to `max_entries`, evicting via the configured policy
    pub fn with_max_entries(mut self, max_entries: usize) -> Self {
        self.max_entries = Some(max_entries);
        self
    }

    /// Replace the eviction policy used when the store is at capacity
    pub fn with_eviction_policy(mut self, policy: Box<dyn EvictionPolicy>) -> Self {
        self.eviction = policy;
        self
    }

    fn evict_if_needed(&self, entries: &mut HashMap<String, CacheEntry>) {
        let Some(max) = self.max_entries else {
            return;
        };

        if entries.len() < max {
            return;
        }

        let snapshot: Vec<CacheEntry> = entries.values().cloned().collect();
        if let Some(victim) = self.eviction.select_victim(&snapshot) {
            entries.remove(&victim);
        }
    }
}

#[async_trait]
impl EntryStore for InMemoryEntryStore {
    async fn insert(&self, entry: CacheEntry) -> Result<String, DomainError> {
        if entry.embedding().len() != self.embedding_size {
            return Err(DomainError::dimension_mismatch(
                self.embedding_size,
                entry.embedding().len(),
            ));
        }

        let mut entries = self
            .entries
            .write()
            .map_err(|e| DomainError::internal(format!("Failed to acquire write lock: {}", e)))?;

        self.evict_if_needed(&mut entries);

        let id = entry.id().to_string();
        entries.insert(id.clone(), entry);

        Ok(id)
    }

    async fn entries(&self) -> Result<Vec<CacheEntry>, DomainError> {
        let entries = self
            .entries
            .read()
            .map_err(|e| DomainError::internal(format!("Failed to acquire read lock: {}", e)))?;

        Ok(entries.values().cloned().collect())
    }

    async fn remove(&self, id: &str) -> Result<bool, DomainError> {
        let mut entries = self
            .entries
            .write()
            .map_err(|e| DomainError::internal(format!("Failed to acquire write lock: {}", e)))?;

        Ok(entries.remove(id).is_some())
    }

    async fn size(&self) -> Result<usize, DomainError> {
        let entries = self
            .entries
            .read()
            .map_err(|e| DomainError::internal(format!("Failed to acquire read lock: {}", e)))?;

        Ok(entries.len())
    }

    async fn clear(&self) -> Result<(), DomainError> {
        let mut entries = self
            .entries
            .write()
            .map_err(|e| DomainError::internal(format!("Failed to acquire write lock: {}", e)))?;

        entries.clear();

        Ok(())
    }

    async fn ping(&self) -> Result<(), DomainError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn entry(id: &str, embedding: Vec<f32>) -> CacheEntry {
        CacheEntry::new(
            id,
            format!("query for {}", id),
            embedding,
            format!("response for {}", id),
            Duration::from_secs(3600),
        )
    }

    #[tokio::test]
    async fn test_insert_and_snapshot() {
        let store = InMemoryEntryStore::new(3);

        let id = store.insert(entry("a", vec![0.1, 0.2, 0.3])).await.unwrap();
        assert_eq!(id, "a");

        let snapshot = store.entries().await.unwrap();
        assert_eq!(snapshot.len(), 1);
        assert_eq!(snapshot[0].id(), "a");
    }

    #[tokio::test]
    async fn test_insert_dimension_mismatch() {
        let store = InMemoryEntryStore::new(3);

        let result = store.insert(entry("a", vec![0.1, 0.2])).await;

        assert!(matches!(
            result,
            Err(DomainError::DimensionMismatch {
                expected: 3,
                actual: 2
            })
        ));
        assert_eq!(store.size().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_remove() {
        let store = InMemoryEntryStore::new(2);
        store.insert(entry("a", vec![0.1, 0.2])).await.unwrap();

        assert!(store.remove("a").await.unwrap());
        assert!(!store.remove("a").await.unwrap());
        assert_eq!(store.size().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_clear_is_idempotent() {
        let store = InMemoryEntryStore::new(2);
        store.insert(entry("a", vec![0.1, 0.2])).await.unwrap();
        store.insert(entry("b", vec![0.3, 0.4])).await.unwrap();

        store.clear().await.unwrap();
        assert_eq!(store.size().await.unwrap(), 0);

        store.clear().await.unwrap();
        assert_eq!(store.size().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_eviction_at_capacity() {
        let store = InMemoryEntryStore::new(1).with_max_entries(3);

        for i in 0..3 {
            store
                .insert(
                    entry(&format!("entry-{}", i), vec![i as f32])
                        .with_created_at(1000 + i as u64),
                )
                .await
                .unwrap();
        }
        assert_eq!(store.size().await.unwrap(), 3);

        store
            .insert(entry("entry-new", vec![9.0]).with_created_at(2000))
            .await
            .unwrap();

        // Oldest entry was evicted to make room
        assert_eq!(store.size().await.unwrap(), 3);
        let ids: Vec<String> = store
            .entries()
            .await
            .unwrap()
            .iter()
            .map(|e| e.id().to_string())
            .collect();
        assert!(!ids.contains(&"entry-0".to_string()));
        assert!(ids.contains(&"entry-new".to_string()));
    }

    #[tokio::test]
    async fn test_ping() {
        let store = InMemoryEntryStore::new(2);
        assert!(store.ping().await.is_ok());
    }
}
