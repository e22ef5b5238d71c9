mod client;
pub(crate) mod types;

use async_trait::async_trait;

use crate::error::{AiError, Result};
use crate::traits::{GenerationRequest, TextGenerator};

use client::{ClaudeClient, ANTHROPIC_API_URL};
use types::*;

// =============================================================================
// Claude Generator
// =============================================================================

#[derive(Clone)]
pub struct Claude {
    api_key: String,
    pub(crate) model: String,
    base_url: Option<String>,
    http: reqwest::Client,
}

impl Claude {
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            model: model.into(),
            base_url: None,
            http: reqwest::Client::new(),
        }
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    pub fn with_http_client(mut self, http: reqwest::Client) -> Self {
        self.http = http;
        self
    }

    pub(crate) fn client(&self) -> ClaudeClient<'_> {
        ClaudeClient::new(
            &self.api_key,
            &self.http,
            self.base_url.as_deref().unwrap_or(ANTHROPIC_API_URL),
        )
    }
}

#[async_trait]
impl TextGenerator for Claude {
    fn model(&self) -> &str {
        &self.model
    }

    /// The messages API returns a single candidate; `request.candidates` is ignored.
    async fn generate(&self, request: &GenerationRequest) -> Result<Vec<String>> {
        let chat = ChatRequest::new(&self.model)
            .message(WireMessage::user(&request.prompt))
            .max_tokens(request.max_tokens)
            .temperature(request.temperature);

        let response = self.client().chat(&chat).await?;

        response
            .text()
            .map(|text| vec![text])
            .ok_or(AiError::EmptyResponse("Claude"))
    }
}
