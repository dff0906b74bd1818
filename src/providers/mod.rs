use crate::chat::Turn;
use crate::core::error::DuochatError;
use async_trait::async_trait;

/// Common interface for the chat backends.
///
/// `message` is the new user message and `history` the completed turns so
/// far. Implementations own their wire format and how history is replayed;
/// the caller only sees the final reply text.
#[async_trait]
pub trait LLMProvider {
    async fn get_response(&self, message: &str, history: &[Turn]) -> Result<String, DuochatError>;
}

pub mod gemini;
pub mod http;
pub mod openrouter;
