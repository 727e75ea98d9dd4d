//! Redis-backed entry store

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use redis::aio::ConnectionManager;
use redis::{AsyncCommands, Client};

use crate::domain::semantic_cache::{CacheEntry, EntryStore};
use crate::domain::DomainError;

/// Configuration for the Redis entry store
#[derive(Debug, Clone)]
pub struct RedisEntryStoreConfig {
    /// Redis connection URL (e.g., "redis://127.0.0.1:6379")
    pub url: String,
    /// Key prefix for namespacing entries
    pub key_prefix: String,
    /// Embedding vector length enforced on insert
    pub embedding_size: usize,
}

impl RedisEntryStoreConfig {
    /// Creates a new configuration with the given URL
    pub fn new(url: impl Into<String>, embedding_size: usize) -> Self {
        Self {
            url: url.into(),
            key_prefix: "semcache:entry".to_string(),
            embedding_size,
        }
    }

    /// Sets the key prefix
    pub fn with_key_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.key_prefix = prefix.into();
        self
    }
}

/// Redis entry store.
///
/// One record per entry keyed by id, value is the serialized entry. Redis
/// key expiry is set from the entry TTL, so the backend ages records out on
/// its own; the index's lazy-expiry check remains as a defensive redundancy
/// for clock skew between writer and backend.
#[derive(Clone)]
pub struct RedisEntryStore {
    connection: ConnectionManager,
    config: RedisEntryStoreConfig,
}

impl fmt::Debug for RedisEntryStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RedisEntryStore")
            .field("config", &self.config)
            .field("connection", &"<ConnectionManager>")
            .finish()
    }
}

impl RedisEntryStore {
    /// Connect to Redis and create the store
    pub async fn new(config: RedisEntryStoreConfig) -> Result<Self, DomainError> {
        let client = Client::open(config.url.as_str()).map_err(|e| {
            DomainError::initialization(format!("Failed to create Redis client: {}", e))
        })?;

        let connection = ConnectionManager::new(client).await.map_err(|e| {
            DomainError::initialization(format!("Failed to connect to Redis: {}", e))
        })?;

        Ok(Self { connection, config })
    }

    fn entry_key(&self, id: &str) -> String {
        format!("{}:{}", self.config.key_prefix, id)
    }

    fn scan_pattern(&self) -> String {
        format!("{}:*", self.config.key_prefix)
    }

    async fn scan_keys(&self) -> Result<Vec<String>, DomainError> {
        let mut conn = self.connection.clone();
        let pattern = self.scan_pattern();

        let mut cursor = 0u64;
        let mut all_keys = Vec::new();

        loop {
            let (new_cursor, keys): (u64, Vec<String>) = redis::cmd("SCAN")
                .arg(cursor)
                .arg("MATCH")
                .arg(&pattern)
                .arg("COUNT")
                .arg(100)
                .query_async(&mut conn)
                .await
                .map_err(|e| DomainError::store(format!("Failed to scan entries: {}", e)))?;

            all_keys.extend(keys);
            cursor = new_cursor;

            if cursor == 0 {
                break;
            }
        }

        Ok(all_keys)
    }
}

#[async_trait]
impl EntryStore for RedisEntryStore {
    async fn insert(&self, entry: CacheEntry) -> Result<String, DomainError> {
        if entry.embedding().len() != self.config.embedding_size {
            return Err(DomainError::dimension_mismatch(
                self.config.embedding_size,
                entry.embedding().len(),
            ));
        }

        let id = entry.id().to_string();
        let key = self.entry_key(&id);
        let value = serde_json::to_string(&entry)
            .map_err(|e| DomainError::internal(format!("Failed to serialize entry: {}", e)))?;

        let mut conn = self.connection.clone();

        if entry.ttl_secs() > 0 {
            let _: () = conn
                .set_ex(&key, value, entry.ttl_secs())
                .await
                .map_err(|e| DomainError::store(format!("Failed to store entry: {}", e)))?;
        } else {
            let _: () = conn
                .set(&key, value)
                .await
                .map_err(|e| DomainError::store(format!("Failed to store entry: {}", e)))?;
        }

        Ok(id)
    }

    async fn entries(&self) -> Result<Vec<CacheEntry>, DomainError> {
        let keys = self.scan_keys().await?;

        if keys.is_empty() {
            return Ok(Vec::new());
        }

        let mut conn = self.connection.clone();
        let values: Vec<Option<String>> = redis::cmd("MGET")
            .arg(&keys)
            .query_async(&mut conn)
            .await
            .map_err(|e| DomainError::store(format!("Failed to fetch entries: {}", e)))?;

        let mut entries = Vec::with_capacity(values.len());

        // A key can expire between SCAN and MGET; skip the holes
        for value in values.into_iter().flatten() {
            let entry: CacheEntry = serde_json::from_str(&value).map_err(|e| {
                DomainError::internal(format!("Failed to deserialize entry: {}", e))
            })?;
            entries.push(entry);
        }

        Ok(entries)
    }

    async fn remove(&self, id: &str) -> Result<bool, DomainError> {
        let key = self.entry_key(id);
        let mut conn = self.connection.clone();

        let deleted: i32 = conn
            .del(&key)
            .await
            .map_err(|e| DomainError::store(format!("Failed to delete entry '{}': {}", id, e)))?;

        Ok(deleted > 0)
    }

    async fn size(&self) -> Result<usize, DomainError> {
        Ok(self.scan_keys().await?.len())
    }

    async fn clear(&self) -> Result<(), DomainError> {
        let keys = self.scan_keys().await?;

        if keys.is_empty() {
            return Ok(());
        }

        let mut conn = self.connection.clone();
        let _: i32 = conn
            .del(&keys)
            .await
            .map_err(|e| DomainError::store(format!("Failed to clear entries: {}", e)))?;

        Ok(())
    }

    async fn ping(&self) -> Result<(), DomainError> {
        let mut conn = self.connection.clone();

        let _: String = redis::cmd("PING")
            .query_async(&mut conn)
            .await
            .map_err(|e| DomainError::store(format!("Redis ping failed: {}", e)))?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults() {
        let config = RedisEntryStoreConfig::new("redis://127.0.0.1:6379", 1536);

        assert_eq!(config.url, "redis://127.0.0.1:6379");
        assert_eq!(config.key_prefix, "semcache:entry");
        assert_eq!(config.embedding_size, 1536);
    }

    #[test]
    fn test_config_with_prefix() {
        let config =
            RedisEntryStoreConfig::new("redis://localhost", 768).with_key_prefix("myapp:sem");

        assert_eq!(config.key_prefix, "myapp:sem");
    }

    #[tokio::test]
    async fn test_connect_unreachable_fails_with_initialization_error() {
        // Invalid URL fails at client construction
        let config = RedisEntryStoreConfig::new("not-a-redis-url", 4);

        let result = RedisEntryStore::new(config).await;

        assert!(matches!(result, Err(DomainError::Initialization { .. })));
    }
}
