//! Entry store trait and eviction hook

use std::fmt::Debug;

use async_trait::async_trait;

use super::CacheEntry;
use crate::domain::DomainError;

/// Trait for cache entry storage backends
///
/// Implementations must be safe for concurrent use: `entries` returns a
/// snapshot (a concurrent insert may or may not be observed, but iteration
/// never yields a torn entry), and `insert` is atomic: an entry is either
/// fully visible or absent.
#[async_trait]
pub trait EntryStore: Send + Sync + Debug {
    /// Insert an entry, returning its id.
    ///
    /// Fails with `DimensionMismatch` if the embedding length disagrees with
    /// the store's configured size.
    async fn insert(&self, entry: CacheEntry) -> Result<String, DomainError>;

    /// Snapshot of all stored entries
    async fn entries(&self) -> Result<Vec<CacheEntry>, DomainError>;

    /// Remove an entry by id, returning whether it existed
    async fn remove(&self, id: &str) -> Result<bool, DomainError>;

    /// Number of stored entries
    async fn size(&self) -> Result<usize, DomainError>;

    /// Remove all entries; idempotent
    async fn clear(&self) -> Result<(), DomainError>;

    /// Liveness check against the backend
    async fn ping(&self) -> Result<(), DomainError>;
}

/// Hook for choosing which entry to drop when a capacity-bounded store is
/// full. TTL expiry is the reference behavior; this only applies when
/// `max_entries` is configured.
pub trait EvictionPolicy: Send + Sync + Debug {
    /// Pick the id of the entry to evict
    fn select_victim(&self, entries: &[CacheEntry]) -> Option<String>;
}

/// Evicts the least-recently-inserted entry
#[derive(Debug, Default)]
pub struct OldestInserted;

impl EvictionPolicy for OldestInserted {
    fn select_victim(&self, entries: &[CacheEntry]) -> Option<String> {
        entries
            .iter()
            .min_by_key(|entry| entry.created_at())
            .map(|entry| entry.id().to_string())
    }
}
