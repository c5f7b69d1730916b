//! LLM provider abstraction and implementations.
//!
//! Supports Anthropic Claude and `OpenAI`-compatible endpoints via a
//! common trait.

pub mod anthropic;
pub mod openai;

use crate::ChatError;

/// Trait for chat providers.
#[async_trait::async_trait]
pub trait ChatProvider: Send + Sync {
    /// Sends `message` and returns the model's reply text.
    ///
    /// # Errors
    ///
    /// Returns [`ChatError`] if the request fails, the provider answers
    /// with an error status, or the reply is empty.
    async fn reply(&self, message: &str) -> Result<String, ChatError>;
}

/// Joins text fragments and rejects an all-blank result.
pub(crate) fn join_reply<'a>(parts: impl Iterator<Item = &'a str>) -> Result<String, ChatError> {
    let text = parts.collect::<Vec<_>>().join("\n");
    let text = text.trim();
    if text.is_empty() {
        return Err(ChatError::EmptyResponse);
    }
    Ok(text.to_string())
}
