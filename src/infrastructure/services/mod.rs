//! Service layer

mod semantic_cache_service;

pub use semantic_cache_service::{
    QueryResult, ResponseSource, SemanticCacheService, SemanticCacheServiceTrait,
};
