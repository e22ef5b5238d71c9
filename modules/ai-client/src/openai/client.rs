use bytes::Bytes;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use tracing::debug;

use crate::error::{AiError, Result};

use super::types::*;

pub(crate) const OPENAI_API_URL: &str = "https://api.openai.com/v1";

pub(crate) struct OpenAiClient<'a> {
    api_key: &'a str,
    http: &'a reqwest::Client,
    base_url: &'a str,
}

impl<'a> OpenAiClient<'a> {
    pub fn new(api_key: &'a str, http: &'a reqwest::Client, base_url: &'a str) -> Self {
        Self {
            api_key,
            http,
            base_url: base_url.trim_end_matches('/'),
        }
    }

    fn headers(&self) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {}", self.api_key))?,
        );
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        Ok(headers)
    }

    pub async fn chat(&self, request: &ChatRequest) -> Result<ChatResponse> {
        let url = format!("{}/chat/completions", self.base_url);

        debug!(model = %request.model, "OpenAI chat request");

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
                provider: "OpenAI",
                status,
                body,
            });
        }

        Ok(response.json().await?)
    }

    pub async fn speech(&self, request: &SpeechRequest<'_>) -> Result<Bytes> {
        let url = format!("{}/audio/speech", self.base_url);

        debug!(
            model = request.model,
            voice = request.voice,
            chars = request.input.chars().count(),
            "OpenAI speech request"
        );

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
                provider: "OpenAI speech",
                status,
                body,
            });
        }

        Ok(response.bytes().await?)
    }
}
