//! Completion response types

use serde::{Deserialize, Serialize};

/// Token usage for a completion request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompletionUsage {
    /// Number of prompt tokens
    prompt_tokens: u32,
    /// Number of generated tokens
    completion_tokens: u32,
}

impl CompletionUsage {
    /// Create new usage stats
    pub fn new(prompt_tokens: u32, completion_tokens: u32) -> Self {
        Self {
            prompt_tokens,
            completion_tokens,
        }
    }

    /// Get prompt tokens
    pub fn prompt_tokens(&self) -> u32 {
        self.prompt_tokens
    }

    /// Get completion tokens
    pub fn completion_tokens(&self) -> u32 {
        self.completion_tokens
    }

    /// Get total tokens
    pub fn total_tokens(&self) -> u32 {
        self.prompt_tokens + self.completion_tokens
    }
}

/// Response from a completion request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompletionResponse {
    /// Provider-assigned response id
    id: String,
    /// Model that produced the response
    model: String,
    /// Generated text
    text: String,
    /// Usage statistics, when reported by the provider
    #[serde(skip_serializing_if = "Option::is_none")]
    usage: Option<CompletionUsage>,
}

impl CompletionResponse {
    /// Create a new completion response
    pub fn new(id: impl Into<String>, model: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            model: model.into(),
            text: text.into(),
            usage: None,
        }
    }

    /// Attach usage statistics
    pub fn with_usage(mut self, usage: CompletionUsage) -> Self {
        self.usage = Some(usage);
        self
    }

    /// Get the response id
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Get the model
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Get the generated text
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Consume and return the generated text
    pub fn into_text(self) -> String {
        self.text
    }

    /// Get usage statistics
    pub fn usage(&self) -> Option<&CompletionUsage> {
        self.usage.as_ref()
    }
}
