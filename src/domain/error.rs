use thiserror::Error;

/// Core domain errors
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("Degenerate vector: {message}")]
    DegenerateVector { message: String },

    #[error("Embedding error: {provider} - {message}")]
    Embedding { provider: String, message: String },

    #[error("Completion error: {provider} - {message}")]
    Completion { provider: String, message: String },

    #[error("Initialization error: {message}")]
    Initialization { message: String },

    #[error("Store error: {message}")]
    Store { message: String },

    #[error("Configuration error: {message}")]
    Configuration { message: String },

    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl DomainError {
    pub fn dimension_mismatch(expected: usize, actual: usize) -> Self {
        Self::DimensionMismatch { expected, actual }
    }

    pub fn degenerate_vector(message: impl Into<String>) -> Self {
        Self::DegenerateVector {
            message: message.into(),
        }
    }

    pub fn embedding(provider: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Embedding {
            provider: provider.into(),
            message: message.into(),
        }
    }

    pub fn completion(provider: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Completion {
            provider: provider.into(),
            message: message.into(),
        }
    }

    pub fn initialization(message: impl Into<String>) -> Self {
        Self::Initialization {
            message: message.into(),
        }
    }

    pub fn store(message: impl Into<String>) -> Self {
        Self::Store {
            message: message.into(),
        }
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dimension_mismatch_error() {
        let error = DomainError::dimension_mismatch(1536, 768);
        assert_eq!(
            error.to_string(),
            "Dimension mismatch: expected 1536, got 768"
        );
    }

    #[test]
    fn test_embedding_error() {
        let error = DomainError::embedding("openai", "rate limited");
        assert_eq!(error.to_string(), "Embedding error: openai - rate limited");
    }

    #[test]
    fn test_store_error() {
        let error = DomainError::store("connection refused");
        assert_eq!(error.to_string(), "Store error: connection refused");
    }
}
