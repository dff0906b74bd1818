use crate::core::error::DuochatError;
use crate::providers::gemini::types::*;
use crate::providers::http::HttpClient;

#[derive(Clone)]
pub struct GeminiClient {
    pub model: String,
    client: HttpClient,
}

impl GeminiClient {
    pub fn new(base_url: String, api_key: String, model: String) -> Self {
        let mut client = HttpClient::new(base_url, None, None);

        // Gemini authenticates via query param, not a header
        client.add_query_param("key", api_key);

        Self { client, model }
    }

    pub async fn generate_content(
        &self,
        contents: &[GeminiContent],
    ) -> Result<String, DuochatError> {
        let payload = GeminiRequest { contents };
        let response = self
            .client
            .post(
                &format!("v1beta/models/{}:generateContent", self.model),
                &payload,
            )
            .await?;

        let response_body: String = response.text().await?;
        let parsed: GeminiResponse = serde_json::from_str(&response_body).map_err(|e| {
            DuochatError::Serialization(format!("Failed to parse Gemini response: {}", e))
        })?;

        if let Some(candidate) = parsed.candidates.first() {
            if let Some(part) = candidate.content.parts.first() {
                return Ok(part.text.clone());
            }
        }

        Err(DuochatError::Api("No valid response from Gemini".to_string()))
    }
}
