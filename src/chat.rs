use crate::config::Config;
use crate::providers::LLMProvider;
use crate::providers::gemini::{self, GeminiProvider};
use crate::providers::openrouter::{self, OpenRouterProvider};
use serde::{Deserialize, Serialize};

/// Reply returned for a selector string that names no known model. No
/// remote call is made in that case.
pub const INVALID_SELECTION_REPLY: &str = "❌ Error: Invalid model selected.";

/// One completed exchange. The caller owns the transcript and appends a
/// turn after each dispatch; dispatch itself never mutates history.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Turn {
    pub user: String,
    pub assistant: String,
}

impl Turn {
    pub fn new(user: impl Into<String>, assistant: impl Into<String>) -> Self {
        Self {
            user: user.into(),
            assistant: assistant.into(),
        }
    }
}

/// The closed set of chattable models.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ModelSelection {
    #[serde(rename = "gpt-3.5-turbo")]
    Gpt35Turbo,
    #[serde(rename = "gemini-1.5-pro")]
    Gemini15Pro,
}

impl ModelSelection {
    /// Selector ids match exactly; no case folding or trimming.
    pub fn from_str(s: &str) -> Option<ModelSelection> {
        match s {
            "gpt-3.5-turbo" => Some(ModelSelection::Gpt35Turbo),
            "gemini-1.5-pro" => Some(ModelSelection::Gemini15Pro),
            _ => None,
        }
    }

    pub fn id(&self) -> &'static str {
        match self {
            ModelSelection::Gpt35Turbo => "gpt-3.5-turbo",
            ModelSelection::Gemini15Pro => "gemini-1.5-pro",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ModelSelection::Gpt35Turbo => "🔷 OpenAI GPT-3.5 Turbo via OpenRouter",
            ModelSelection::Gemini15Pro => "🔶 Gemini 1.5 Pro",
        }
    }

    /// Name used in the failure reply template.
    fn error_label(&self) -> &'static str {
        match self {
            ModelSelection::Gpt35Turbo => "OpenRouter GPT",
            ModelSelection::Gemini15Pro => "Gemini",
        }
    }
}

impl Default for ModelSelection {
    fn default() -> Self {
        ModelSelection::Gpt35Turbo
    }
}

/// Routes one message to the selected backend and always returns
/// displayable text. Provider failures come back as ❌-prefixed reply
/// strings, never as panics or errors the caller must unpack.
pub struct Dispatcher {
    openrouter: OpenRouterProvider,
    gemini: GeminiProvider,
}

impl Dispatcher {
    pub fn new(config: &Config) -> Self {
        let openrouter = {
            let provider_config = &config.openrouter;
            let model = provider_config
                .model
                .clone()
                .unwrap_or_else(|| openrouter::DEFAULT_MODEL.to_string());
            match &provider_config.base_url {
                Some(base_url) => OpenRouterProvider::with_endpoint(
                    base_url.clone(),
                    provider_config.api_key.clone(),
                    model,
                ),
                None => OpenRouterProvider::new(provider_config.api_key.clone(), model),
            }
        };

        let gemini = {
            let provider_config = &config.gemini;
            let model = provider_config
                .model
                .clone()
                .unwrap_or_else(|| gemini::DEFAULT_MODEL.to_string());
            match &provider_config.base_url {
                Some(base_url) => GeminiProvider::with_endpoint(
                    base_url.clone(),
                    provider_config.api_key.clone(),
                    model,
                ),
                None => GeminiProvider::new(provider_config.api_key.clone(), model),
            }
        };

        Self { openrouter, gemini }
    }

    /// String-selector entry point. An unknown selector yields
    /// [`INVALID_SELECTION_REPLY`] without touching the network.
    pub async fn dispatch(&self, message: &str, history: &[Turn], selection: &str) -> String {
        match ModelSelection::from_str(selection) {
            Some(selection) => self.dispatch_selected(message, history, selection).await,
            None => INVALID_SELECTION_REPLY.to_string(),
        }
    }

    pub async fn dispatch_selected(
        &self,
        message: &str,
        history: &[Turn],
        selection: ModelSelection,
    ) -> String {
        let provider: &dyn LLMProvider = match selection {
            ModelSelection::Gpt35Turbo => &self.openrouter,
            ModelSelection::Gemini15Pro => &self.gemini,
        };

        match provider.get_response(message, history).await {
            Ok(reply) => reply,
            Err(err) => format!("❌ {} Error: {}", selection.error_label(), err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ProviderConfig;
    use serde_json::{Value, json};
    use wiremock::matchers::{header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn test_config(openrouter_base: &str, gemini_base: &str) -> Config {
        Config {
            default_model: None,
            openrouter: ProviderConfig {
                api_key: Some("test-key".to_string()),
                base_url: Some(openrouter_base.to_string()),
                model: None,
            },
            gemini: ProviderConfig {
                api_key: Some("test-key".to_string()),
                base_url: Some(gemini_base.to_string()),
                model: None,
            },
        }
    }

    fn openrouter_reply(content: &str) -> Value {
        json!({
            "choices": [
                { "message": { "role": "assistant", "content": content } }
            ]
        })
    }

    fn gemini_reply(text: &str) -> Value {
        json!({
            "candidates": [
                { "content": { "role": "model", "parts": [{ "text": text }] } }
            ]
        })
    }

    #[test]
    fn selection_ids_parse_exactly() {
        assert_eq!(
            ModelSelection::from_str("gpt-3.5-turbo"),
            Some(ModelSelection::Gpt35Turbo)
        );
        assert_eq!(
            ModelSelection::from_str("gemini-1.5-pro"),
            Some(ModelSelection::Gemini15Pro)
        );
        assert_eq!(ModelSelection::from_str("GPT-3.5-TURBO"), None);
        assert_eq!(ModelSelection::from_str("gpt-3.5-turbo "), None);
        assert_eq!(ModelSelection::from_str(""), None);
        // Display labels are not selector ids
        assert_eq!(
            ModelSelection::from_str("🔷 OpenAI GPT-3.5 Turbo via OpenRouter"),
            None
        );
    }

    #[test]
    fn invalid_selection_literal_is_stable() {
        assert_eq!(INVALID_SELECTION_REPLY, "❌ Error: Invalid model selected.");
    }

    #[tokio::test]
    async fn invalid_selection_returns_the_fixed_reply_without_any_remote_call() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let dispatcher = Dispatcher::new(&test_config(&server.uri(), &server.uri()));
        let reply = dispatcher.dispatch("hi", &[], "gpt-4").await;

        assert_eq!(reply, "❌ Error: Invalid model selected.");
        assert!(server.received_requests().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn openrouter_dispatch_returns_the_first_choice_verbatim() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .and(header("Authorization", "Bearer test-key"))
            .respond_with(ResponseTemplate::new(200).set_body_json(openrouter_reply("  hello there  ")))
            .mount(&server)
            .await;

        let dispatcher = Dispatcher::new(&test_config(&server.uri(), &server.uri()));
        let reply = dispatcher.dispatch("hi", &[], "gpt-3.5-turbo").await;

        // Verbatim, surrounding whitespace included
        assert_eq!(reply, "  hello there  ");
    }

    #[tokio::test]
    async fn openrouter_history_is_flattened_into_a_single_request() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(200).set_body_json(openrouter_reply("done")))
            .mount(&server)
            .await;

        let dispatcher = Dispatcher::new(&test_config(&server.uri(), &server.uri()));
        let history = vec![Turn::new("u1", "a1"), Turn::new("u2", "a2")];
        let reply = dispatcher.dispatch("u3", &history, "gpt-3.5-turbo").await;
        assert_eq!(reply, "done");

        let requests = server.received_requests().await.unwrap();
        assert_eq!(requests.len(), 1);

        let body: Value = serde_json::from_slice(&requests[0].body).unwrap();
        assert_eq!(body["model"], "openai/gpt-3.5-turbo");
        let messages = body["messages"].as_array().unwrap();
        let flat: Vec<(&str, &str)> = messages
            .iter()
            .map(|m| {
                (
                    m["role"].as_str().unwrap(),
                    m["content"].as_str().unwrap(),
                )
            })
            .collect();
        assert_eq!(
            flat,
            vec![
                ("assistant", "a1"),
                ("user", "u1"),
                ("assistant", "a2"),
                ("user", "u2"),
                ("user", "u3"),
            ]
        );
    }

    #[tokio::test]
    async fn empty_message_is_still_dispatched() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(200).set_body_json(openrouter_reply("ok")))
            .mount(&server)
            .await;

        let dispatcher = Dispatcher::new(&test_config(&server.uri(), &server.uri()));
        let reply = dispatcher.dispatch("", &[], "gpt-3.5-turbo").await;
        assert_eq!(reply, "ok");

        let requests = server.received_requests().await.unwrap();
        assert_eq!(requests.len(), 1);
        let body: Value = serde_json::from_slice(&requests[0].body).unwrap();
        assert_eq!(body["messages"][0]["content"], "");
    }

    #[tokio::test]
    async fn gemini_dispatch_replays_history_with_one_call_per_send() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1beta/models/gemini-1.5-pro:generateContent"))
            .and(query_param("key", "test-key"))
            .respond_with(ResponseTemplate::new(200).set_body_json(gemini_reply("ok")))
            .mount(&server)
            .await;

        let dispatcher = Dispatcher::new(&test_config(&server.uri(), &server.uri()));
        let history = vec![Turn::new("u1", "a1"), Turn::new("u2", "a2")];
        let reply = dispatcher.dispatch("bye", &history, "gemini-1.5-pro").await;
        assert_eq!(reply, "ok");

        // Two calls per prior turn plus one for the new message
        let requests = server.received_requests().await.unwrap();
        assert_eq!(requests.len(), 5);

        // The final request carries the whole session: each sent text as a
        // user turn, each remote reply as a model turn, new message last.
        let body: Value = serde_json::from_slice(&requests[4].body).unwrap();
        let contents = body["contents"].as_array().unwrap();
        assert_eq!(contents.len(), 9);
        let sent: Vec<&str> = contents
            .iter()
            .map(|c| c["parts"][0]["text"].as_str().unwrap())
            .collect();
        assert_eq!(sent, vec!["u1", "ok", "a1", "ok", "u2", "ok", "a2", "ok", "bye"]);
        let roles: Vec<&str> = contents
            .iter()
            .map(|c| c["role"].as_str().unwrap())
            .collect();
        assert_eq!(
            roles,
            vec!["user", "model", "user", "model", "user", "model", "user", "model", "user"]
        );
    }

    #[tokio::test]
    async fn openrouter_failure_reply_carries_the_provider_label_and_cause() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
            .mount(&server)
            .await;

        let dispatcher = Dispatcher::new(&test_config(&server.uri(), &server.uri()));
        let reply = dispatcher.dispatch("hi", &[], "gpt-3.5-turbo").await;

        assert!(reply.starts_with("❌ OpenRouter GPT Error:"), "{}", reply);
        assert!(reply.contains("boom"), "{}", reply);
    }

    #[tokio::test]
    async fn gemini_failure_reply_carries_the_provider_label_and_cause() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
            .mount(&server)
            .await;

        let dispatcher = Dispatcher::new(&test_config(&server.uri(), &server.uri()));
        let reply = dispatcher.dispatch("hi", &[], "gemini-1.5-pro").await;

        assert!(reply.starts_with("❌ Gemini Error:"), "{}", reply);
        assert!(reply.contains("boom"), "{}", reply);
    }

    #[tokio::test]
    async fn missing_api_key_surfaces_in_the_reply_not_a_crash() {
        // Unroutable base urls: the key check must fire before any dial
        let mut config = test_config("http://127.0.0.1:9", "http://127.0.0.1:9");
        config.openrouter.api_key = None;
        config.gemini.api_key = None;
        let dispatcher = Dispatcher::new(&config);

        let reply = dispatcher.dispatch("hi", &[], "gpt-3.5-turbo").await;
        assert!(reply.starts_with("❌ OpenRouter GPT Error:"), "{}", reply);
        assert!(reply.contains("OPENROUTER_API_KEY"), "{}", reply);

        let reply = dispatcher.dispatch("hi", &[], "gemini-1.5-pro").await;
        assert!(reply.starts_with("❌ Gemini Error:"), "{}", reply);
        assert!(reply.contains("GEMINI_API_KEY"), "{}", reply);
    }

    #[tokio::test]
    async fn identical_dispatches_produce_identical_replies() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(200).set_body_json(openrouter_reply("stable")))
            .mount(&server)
            .await;

        let dispatcher = Dispatcher::new(&test_config(&server.uri(), &server.uri()));
        let history = vec![Turn::new("hi", "hello")];
        let first = dispatcher.dispatch("again", &history, "gpt-3.5-turbo").await;
        let second = dispatcher.dispatch("again", &history, "gpt-3.5-turbo").await;

        assert_eq!(first, "stable");
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn dispatch_selected_routes_without_string_validation() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1beta/models/gemini-1.5-pro:generateContent"))
            .respond_with(ResponseTemplate::new(200).set_body_json(gemini_reply("direct")))
            .mount(&server)
            .await;

        let dispatcher = Dispatcher::new(&test_config(&server.uri(), &server.uri()));
        let reply = dispatcher
            .dispatch_selected("hi", &[], ModelSelection::Gemini15Pro)
            .await;
        assert_eq!(reply, "direct");
    }
}
