use crate::core::error::DuochatError;
use reqwest::{Client, Response};
use serde::Serialize;
use std::collections::HashMap;

/// Shared HTTP client for provider API calls.
///
/// Authentication is either a fixed header (Bearer tokens) or a query
/// parameter, depending on what the remote API expects.
#[derive(Clone)]
pub struct HttpClient {
    client: Client,
    base_url: String,
    auth_header: Option<(String, String)>,
    extra_headers: HashMap<String, String>,
    query_params: Vec<(String, String)>,
}

impl HttpClient {
    pub fn new(
        base_url: String,
        auth_header: Option<(String, String)>,
        extra_headers: Option<HashMap<String, String>>,
    ) -> Self {
        Self {
            client: Client::new(),
            base_url,
            auth_header,
            extra_headers: extra_headers.unwrap_or_default(),
            query_params: Vec::new(),
        }
    }

    pub fn add_query_param(&mut self, key: &str, value: String) {
        self.query_params.push((key.to_string(), value));
    }

    pub async fn post<T: Serialize + ?Sized>(
        &self,
        path: &str,
        payload: &T,
    ) -> Result<Response, DuochatError> {
        let url = format!("{}/{}", self.base_url.trim_end_matches('/'), path);

        let mut request = self
            .client
            .post(&url)
            .header("Content-Type", "application/json");

        if let Some((name, value)) = &self.auth_header {
            request = request.header(name.as_str(), value.as_str());
        }

        for (key, value) in &self.extra_headers {
            request = request.header(key.as_str(), value.as_str());
        }

        if !self.query_params.is_empty() {
            request = request.query(&self.query_params);
        }

        let response = request.json(payload).send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(DuochatError::Api(format!("{}: {}", status, body)));
        }

        Ok(response)
    }
}
