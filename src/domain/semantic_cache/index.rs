//! Similarity search over an entry store

use std::sync::Arc;

use tracing::{debug, warn};

use super::entry::unix_now;
use super::{CacheEntry, EntryStore};
use crate::domain::embedding::cosine_similarity;
use crate::domain::DomainError;

/// A qualifying match returned by the index
#[derive(Debug, Clone)]
pub struct SearchHit {
    /// The matching cached entry
    pub entry: CacheEntry,
    /// Cosine similarity against the query vector
    pub score: f32,
}

/// Answers "best match above threshold" queries against an entry store
/// using cosine similarity.
///
/// The scan is linear over live entries, which is adequate for the intended
/// working-set sizes; a sub-linear index can replace this behind the same
/// contract without touching the orchestrator.
#[derive(Debug, Clone)]
pub struct SimilarityIndex {
    store: Arc<dyn EntryStore>,
    embedding_size: usize,
}

impl SimilarityIndex {
    /// Create an index over the given store
    pub fn new(store: Arc<dyn EntryStore>, embedding_size: usize) -> Self {
        Self {
            store,
            embedding_size,
        }
    }

    /// Find the best non-expired entry with similarity >= `threshold`.
    ///
    /// Ties are broken by earliest `created_at`. Expired entries encountered
    /// during the scan are removed afterwards; removal failures are logged
    /// and never affect the search result. A zero-norm query vector is a
    /// `DegenerateVector` error; a zero-norm candidate is skipped.
    pub async fn search(
        &self,
        query: &[f32],
        threshold: f32,
    ) -> Result<Option<SearchHit>, DomainError> {
        if query.len() != self.embedding_size {
            return Err(DomainError::dimension_mismatch(
                self.embedding_size,
                query.len(),
            ));
        }

        if query.iter().all(|x| *x == 0.0) {
            return Err(DomainError::degenerate_vector(
                "query vector has zero norm; similarity is undefined",
            ));
        }

        let now = unix_now();
        let snapshot = self.store.entries().await?;

        let mut expired: Vec<String> = Vec::new();
        let mut best: Option<SearchHit> = None;

        for entry in snapshot {
            if entry.is_expired_at(now) {
                expired.push(entry.id().to_string());
                continue;
            }

            let score = match cosine_similarity(query, entry.embedding()) {
                Ok(score) => score,
                Err(DomainError::DegenerateVector { .. }) => {
                    debug!("Skipping degenerate candidate {}", entry.id());
                    continue;
                }
                Err(e) => return Err(e),
            };

            let replace = match &best {
                None => true,
                Some(hit) => {
                    score > hit.score
                        || (score == hit.score && entry.created_at() < hit.entry.created_at())
                }
            };

            if replace {
                best = Some(SearchHit { entry, score });
            }
        }

        // Lazy expiry: age out entries seen during the scan
        for id in expired {
            if let Err(e) = self.store.remove(&id).await {
                warn!("Failed to remove expired entry {}: {}", id, e);
            }
        }

        Ok(best.filter(|hit| hit.score >= threshold))
    }
}
