//! Completion provider implementations

mod factory;
mod openai;

pub use factory::CompletionProviderFactory;
pub use openai::OpenAiCompletionProvider;
