//! Store factory for runtime backend selection

use std::sync::Arc;

use tracing::info;

use crate::config::CacheOptions;
use crate::domain::semantic_cache::EntryStore;
use crate::domain::DomainError;

use super::in_memory::InMemoryEntryStore;
use super::redis::{RedisEntryStore, RedisEntryStoreConfig};

/// Supported store backends
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreKind {
    /// In-process store, entries lost on restart
    InMemory,
    /// Redis-backed store
    Redis,
}

impl StoreKind {
    /// Determine the backend from a store URL
    pub fn from_url(url: &str) -> Result<Self, DomainError> {
        if url.starts_with("memory://") {
            Ok(StoreKind::InMemory)
        } else if url.starts_with("redis://") || url.starts_with("rediss://") {
            Ok(StoreKind::Redis)
        } else {
            Err(DomainError::configuration(format!(
                "Unsupported store URL scheme: {}. Valid schemes: memory://, redis://",
                url
            )))
        }
    }
}

impl std::fmt::Display for StoreKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StoreKind::InMemory => write!(f, "in_memory"),
            StoreKind::Redis => write!(f, "redis"),
        }
    }
}

/// Factory for creating entry store instances
#[derive(Debug, Default)]
pub struct StoreFactory;

impl StoreFactory {
    /// Create the store selected by `store_url`
    pub async fn create(options: &CacheOptions) -> Result<Arc<dyn EntryStore>, DomainError> {
        match StoreKind::from_url(&options.store_url)? {
            StoreKind::InMemory => {
                info!("Using in-memory entry store");
                let mut store = InMemoryEntryStore::new(options.embedding_size);

                if let Some(max) = options.max_entries {
                    store = store.with_max_entries(max);
                }

                Ok(Arc::new(store))
            }
            StoreKind::Redis => {
                info!("Using Redis entry store at {}", options.store_url);
                let config =
                    RedisEntryStoreConfig::new(options.store_url.clone(), options.embedding_size);
                let store = RedisEntryStore::new(config).await?;

                Ok(Arc::new(store))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_kind_from_url() {
        assert_eq!(
            StoreKind::from_url("memory://").unwrap(),
            StoreKind::InMemory
        );
        assert_eq!(
            StoreKind::from_url("redis://localhost:6379").unwrap(),
            StoreKind::Redis
        );
        assert_eq!(
            StoreKind::from_url("rediss://secure-host:6380").unwrap(),
            StoreKind::Redis
        );
    }

    #[test]
    fn test_store_kind_invalid_scheme() {
        let result = StoreKind::from_url("postgres://localhost/cache");
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_factory_create_in_memory() {
        let options = CacheOptions {
            store_url: "memory://".to_string(),
            embedding_size: 4,
            ..Default::default()
        };

        let store = StoreFactory::create(&options).await.unwrap();

        assert_eq!(store.size().await.unwrap(), 0);
        assert!(store.ping().await.is_ok());
    }

    #[test]
    fn test_store_kind_display() {
        assert_eq!(StoreKind::InMemory.to_string(), "in_memory");
        assert_eq!(StoreKind::Redis.to_string(), "redis");
    }
}
