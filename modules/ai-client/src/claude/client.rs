use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use tracing::debug;

use crate::error::{AiError, Result};

use super::types::*;

pub(crate) const ANTHROPIC_API_URL: &str = "https://api.anthropic.com/v1";
const ANTHROPIC_VERSION: &str = "2023-06-01";

pub(crate) struct ClaudeClient<'a> {
    api_key: &'a str,
    http: &'a reqwest::Client,
    base_url: &'a str,
}

impl<'a> ClaudeClient<'a> {
    pub fn new(api_key: &'a str, http: &'a reqwest::Client, base_url: &'a str) -> Self {
        Self {
            api_key,
            http,
            base_url: base_url.trim_end_matches('/'),
        }
    }

    fn headers(&self) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();
        headers.insert("x-api-key", HeaderValue::from_str(self.api_key)?);
        headers.insert(
            "anthropic-version",
            HeaderValue::from_static(ANTHROPIC_VERSION),
        );
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        Ok(headers)
    }

    pub async fn chat(&self, request: &ChatRequest) -> Result<ChatResponse> {
        let url = format!("{}/messages", self.base_url);

        debug!(model = %request.model, "Claude chat request");

        let response = self
            .http
            .post(&url)
            .headers(self.headers()?)
            .json(request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await?;
            return Err(AiError::Api {
                provider: "Claude",
                status,
                body,
            });
        }

        Ok(response.json().await?)
    }
}
