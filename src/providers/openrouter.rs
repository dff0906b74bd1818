use crate::chat::Turn;
use crate::core::error::DuochatError;
use crate::providers::LLMProvider;
use crate::providers::http::HttpClient;
use serde::{Deserialize, Serialize};

pub const DEFAULT_ENDPOINT: &str = "https://openrouter.ai/api/v1";
pub const DEFAULT_MODEL: &str = "openai/gpt-3.5-turbo";

#[derive(Serialize)]
struct ChatCompletionRequest {
    model: String,
    messages: Vec<ChatCompletionMessage>,
}

#[derive(Serialize)]
struct ChatCompletionMessage {
    role: String,
    content: String,
}

impl ChatCompletionMessage {
    fn user(content: &str) -> Self {
        Self {
            role: "user".to_string(),
            content: content.to_string(),
        }
    }

    fn assistant(content: &str) -> Self {
        Self {
            role: "assistant".to_string(),
            content: content.to_string(),
        }
    }
}

#[derive(Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: MessageContent,
}

#[derive(Deserialize)]
struct MessageContent {
    content: String,
}

/// Builds the outbound message list from prior turns plus the new message.
///
/// The order is deliberate and pinned by tests: each completed turn is
/// spliced in before the tail as assistant-reply-then-user-prompt, so the
/// list reads [a1, u1, a2, u2, ...] with the new message always last.
/// Reordering this changes what the remote model sees; it is a behavior
/// change, not a cleanup.
fn build_messages(message: &str, history: &[Turn]) -> Vec<ChatCompletionMessage> {
    let mut messages = vec![ChatCompletionMessage::user(message)];

    for turn in history {
        let tail = messages.len() - 1;
        messages.insert(tail, ChatCompletionMessage::assistant(&turn.assistant));
        let tail = messages.len() - 1;
        messages.insert(tail, ChatCompletionMessage::user(&turn.user));
    }

    messages
}

#[derive(Clone)]
pub struct OpenRouterProvider {
    client: HttpClient,
    api_key: String,
    pub model: String,
}

impl OpenRouterProvider {
    pub fn new(api_key: Option<String>, model: String) -> Self {
        Self::with_endpoint(DEFAULT_ENDPOINT.to_string(), api_key, model)
    }

    pub fn with_endpoint(endpoint: String, api_key: Option<String>, model: String) -> Self {
        let api_key = api_key.unwrap_or_default();
        // Bearer token authentication
        let auth_header = Some(("Authorization".to_string(), format!("Bearer {}", api_key)));

        Self {
            client: HttpClient::new(endpoint, auth_header, None),
            api_key,
            model,
        }
    }
}

#[async_trait::async_trait]
impl LLMProvider for OpenRouterProvider {
    async fn get_response(&self, message: &str, history: &[Turn]) -> Result<String, DuochatError> {
        if self.api_key.trim().is_empty() {
            return Err(DuochatError::Config(
                "OPENROUTER_API_KEY must be set from config or environment".to_string(),
            ));
        }

        let payload = ChatCompletionRequest {
            model: self.model.clone(),
            messages: build_messages(message, history),
        };

        let response = self.client.post("chat/completions", &payload).await?;

        let response_body: String = response.text().await?;
        let parsed: ChatCompletionResponse = serde_json::from_str(&response_body)?;

        if parsed.choices.is_empty() {
            return Err(DuochatError::Api("No choices in API response".to_string()));
        }

        // First choice, returned verbatim
        Ok(parsed.choices[0].message.content.clone())
    }
}
