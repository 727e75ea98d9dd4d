//! Local embedding provider
//!
//! Deterministic feature-hashing embedder for deployments that cannot reach
//! a remote embedding API. Each token is hashed into a bucket of the output
//! vector and the result is L2-normalized, so identical texts always map to
//! identical unit vectors and token overlap translates into cosine
//! similarity.

use async_trait::async_trait;
use sha2::{Digest, Sha256};

use crate::domain::embedding::{
    Embedding, EmbeddingProvider, EmbeddingRequest, EmbeddingResponse, EmbeddingUsage,
};
use crate::domain::DomainError;

/// Local feature-hashing embedding provider
#[derive(Debug)]
pub struct LocalEmbeddingProvider {
    dimensions: usize,
}

impl LocalEmbeddingProvider {
    /// Create a provider producing vectors of the given length
    pub fn new(dimensions: usize) -> Self {
        Self { dimensions }
    }

    fn token_feature(&self, token: &str) -> (usize, f32) {
        let digest = Sha256::digest(token.as_bytes());
        let hash = u64::from_le_bytes(digest[..8].try_into().unwrap_or_default());

        let bucket = (hash % self.dimensions as u64) as usize;
        // Sign bit keeps hash collisions from always reinforcing each other
        let sign = if hash & (1 << 63) == 0 { 1.0 } else { -1.0 };

        (bucket, sign)
    }

    fn embed_text(&self, text: &str) -> Result<Vec<f32>, DomainError> {
        let tokens: Vec<String> = text
            .to_lowercase()
            .split(|c: char| !c.is_alphanumeric())
            .filter(|t| !t.is_empty())
            .map(|t| t.to_string())
            .collect();

        if tokens.is_empty() {
            return Err(DomainError::embedding(
                "local",
                "cannot embed empty or non-alphanumeric input",
            ));
        }

        let mut vector = vec![0.0f32; self.dimensions];

        for token in &tokens {
            let (bucket, sign) = self.token_feature(token);
            vector[bucket] += sign;
        }

        // Bigram features give adjacent-word order some weight
        for pair in tokens.windows(2) {
            let (bucket, sign) = self.token_feature(&format!("{} {}", pair[0], pair[1]));
            vector[bucket] += sign * 0.5;
        }

        let norm: f32 = vector.iter().map(|x| x * x).sum::<f32>().sqrt();

        if norm == 0.0 {
            return Err(DomainError::degenerate_vector(
                "feature hashing collapsed to a zero vector",
            ));
        }

        for x in &mut vector {
            *x /= norm;
        }

        Ok(vector)
    }
}

#[async_trait]
impl EmbeddingProvider for LocalEmbeddingProvider {
    async fn embed(&self, request: EmbeddingRequest) -> Result<EmbeddingResponse, DomainError> {
        let inputs = request.inputs();

        let mut embeddings = Vec::with_capacity(inputs.len());
        for (idx, text) in inputs.iter().enumerate() {
            embeddings.push(Embedding::new(idx, self.embed_text(text)?));
        }

        let total_tokens = inputs.iter().map(|t| t.len() / 4).sum::<usize>() as u32;

        Ok(EmbeddingResponse::new(
            request.model().to_string(),
            embeddings,
            EmbeddingUsage::new(total_tokens, total_tokens),
        ))
    }

    fn provider_name(&self) -> &'static str {
        "local"
    }

    fn default_model(&self) -> &'static str {
        "feature-hash"
    }

    fn dimensions(&self, _model: &str) -> Option<usize> {
        Some(self.dimensions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::embedding::cosine_similarity;

    #[tokio::test]
    async fn test_deterministic() {
        let provider = LocalEmbeddingProvider::new(256);

        let a = provider
            .embed(EmbeddingRequest::single("feature-hash", "the quick brown fox"))
            .await
            .unwrap();
        let b = provider
            .embed(EmbeddingRequest::single("feature-hash", "the quick brown fox"))
            .await
            .unwrap();

        assert_eq!(a.embeddings()[0].vector(), b.embeddings()[0].vector());
    }

    #[tokio::test]
    async fn test_unit_norm() {
        let provider = LocalEmbeddingProvider::new(256);

        let response = provider
            .embed(EmbeddingRequest::single("feature-hash", "hello world"))
            .await
            .unwrap();

        let norm: f32 = response.embeddings()[0]
            .vector()
            .iter()
            .map(|x| x * x)
            .sum::<f32>()
            .sqrt();

        assert!((norm - 1.0).abs() < 0.0001);
    }

    #[tokio::test]
    async fn test_identical_texts_have_similarity_one() {
        let provider = LocalEmbeddingProvider::new(256);

        let a = provider
            .embed(EmbeddingRequest::single("feature-hash", "capital of France"))
            .await
            .unwrap();
        let b = provider
            .embed(EmbeddingRequest::single("feature-hash", "capital of France"))
            .await
            .unwrap();

        let similarity =
            cosine_similarity(a.embeddings()[0].vector(), b.embeddings()[0].vector()).unwrap();

        assert!((similarity - 1.0).abs() < 0.0001);
    }

    #[tokio::test]
    async fn test_overlapping_texts_more_similar_than_disjoint() {
        let provider = LocalEmbeddingProvider::new(512);

        let base = provider
            .embed(EmbeddingRequest::single(
                "feature-hash",
                "what is the capital of France",
            ))
            .await
            .unwrap();
        let near = provider
            .embed(EmbeddingRequest::single(
                "feature-hash",
                "what is the capital city of France",
            ))
            .await
            .unwrap();
        let far = provider
            .embed(EmbeddingRequest::single(
                "feature-hash",
                "recipe for chocolate cake",
            ))
            .await
            .unwrap();

        let near_sim = cosine_similarity(
            base.embeddings()[0].vector(),
            near.embeddings()[0].vector(),
        )
        .unwrap();
        let far_sim =
            cosine_similarity(base.embeddings()[0].vector(), far.embeddings()[0].vector()).unwrap();

        assert!(near_sim > far_sim);
    }

    #[tokio::test]
    async fn test_empty_input_rejected() {
        let provider = LocalEmbeddingProvider::new(256);

        let result = provider
            .embed(EmbeddingRequest::single("feature-hash", "   "))
            .await;

        assert!(matches!(result, Err(DomainError::Embedding { .. })));
    }

    #[test]
    fn test_provider_info() {
        let provider = LocalEmbeddingProvider::new(384);

        assert_eq!(provider.provider_name(), "local");
        assert_eq!(provider.dimensions("feature-hash"), Some(384));
    }
}
