use crate::chat::Turn;
use crate::core::error::DuochatError;
use crate::providers::LLMProvider;
use crate::providers::gemini::types::GeminiContent;
use async_trait::async_trait;

mod client;
mod types;

pub use client::GeminiClient;

pub const DEFAULT_ENDPOINT: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_MODEL: &str = "gemini-1.5-pro";

/// A stateful conversation handle.
///
/// Every `send` is one remote round trip carrying the accumulated contents;
/// the remote reply is appended as a `model` turn before it is returned.
pub struct ChatSession<'a> {
    client: &'a GeminiClient,
    contents: Vec<GeminiContent>,
}

impl ChatSession<'_> {
    pub async fn send(&mut self, text: &str) -> Result<String, DuochatError> {
        self.contents.push(GeminiContent::user(text));
        let reply = self.client.generate_content(&self.contents).await?;
        self.contents.push(GeminiContent::model(&reply));
        Ok(reply)
    }
}

#[derive(Clone)]
pub struct GeminiProvider {
    client: GeminiClient,
    api_key: String,
}

impl GeminiProvider {
    pub fn new(api_key: Option<String>, model: String) -> Self {
        Self::with_endpoint(DEFAULT_ENDPOINT.to_string(), api_key, model)
    }

    pub fn with_endpoint(endpoint: String, api_key: Option<String>, model: String) -> Self {
        let api_key = api_key.unwrap_or_default();
        Self {
            client: GeminiClient::new(endpoint, api_key.clone(), model),
            api_key,
        }
    }

    pub fn start_chat(&self) -> ChatSession<'_> {
        ChatSession {
            client: &self.client,
            contents: Vec::new(),
        }
    }
}

#[async_trait]
impl LLMProvider for GeminiProvider {
    /// Replays the conversation through a fresh session, one send per side
    /// and the new message last, so a dispatch costs 2 * history.len() + 1
    /// remote calls (pinned by tests). The remote model answers every
    /// replayed send; its fresh replies, not the stored assistant text,
    /// form the model side of the remote transcript.
    async fn get_response(&self, message: &str, history: &[Turn]) -> Result<String, DuochatError> {
        if self.api_key.trim().is_empty() {
            return Err(DuochatError::Config(
                "GEMINI_API_KEY must be set from config or environment".to_string(),
            ));
        }

        let mut chat = self.start_chat();
        for turn in history {
            chat.send(&turn.user).await?;
            chat.send(&turn.assistant).await?;
        }
        chat.send(message).await
    }
}
