//! Entry store implementations

mod factory;
mod in_memory;
mod redis;

pub use factory::{StoreFactory, StoreKind};
pub use in_memory::InMemoryEntryStore;
pub use redis::{RedisEntryStore, RedisEntryStoreConfig};
