mod client;
pub(crate) mod types;

use async_trait::async_trait;
use bytes::Bytes;

use crate::error::{AiError, Result};
use crate::traits::{GenerationRequest, SpeechSynthesizer, TextGenerator};

use client::{OpenAiClient, OPENAI_API_URL};

/// Longest input the speech endpoint accepts per request.
pub const OPENAI_SPEECH_MAX_CHARS: usize = 4096;

// =============================================================================
// OpenAi Generator
// =============================================================================

#[derive(Clone)]
pub struct OpenAi {
    api_key: String,
    pub(crate) model: String,
    base_url: Option<String>,
    http: reqwest::Client,
}

impl OpenAi {
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

    /// Use a preconfigured HTTP client (timeouts, proxies).
    pub fn with_http_client(mut self, http: reqwest::Client) -> Self {
        self.http = http;
        self
    }

    pub(crate) fn client(&self) -> OpenAiClient<'_> {
        OpenAiClient::new(
            &self.api_key,
            &self.http,
            self.base_url.as_deref().unwrap_or(OPENAI_API_URL),
        )
    }
}

#[async_trait]
impl TextGenerator for OpenAi {
    fn model(&self) -> &str {
        &self.model
    }

    async fn generate(&self, request: &GenerationRequest) -> Result<Vec<String>> {
        let mut chat = types::ChatRequest::new(&self.model)
            .message(types::WireMessage::user(&request.prompt))
            .n(request.candidates);

        if types::uses_max_completion_tokens(&self.model) {
            chat = chat.max_completion_tokens(request.max_tokens);
        } else {
            chat = chat
                .max_tokens(request.max_tokens)
                .temperature(request.temperature);
        }

        let response = self.client().chat(&chat).await?;
        let candidates = response.candidates();
        if candidates.is_empty() {
            return Err(AiError::EmptyResponse("OpenAI"));
        }
        Ok(candidates)
    }
}

// =============================================================================
// OpenAi Speech
// =============================================================================

#[derive(Clone)]
pub struct OpenAiSpeech {
    api_key: String,
    model: String,
    voice: String,
    format: String,
    base_url: Option<String>,
    http: reqwest::Client,
}

impl OpenAiSpeech {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            model: "tts-1".to_string(),
            voice: "alloy".to_string(),
            format: "mp3".to_string(),
            base_url: None,
            http: reqwest::Client::new(),
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_voice(mut self, voice: impl Into<String>) -> Self {
        self.voice = voice.into();
        self
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    pub fn with_http_client(mut self, http: reqwest::Client) -> Self {
        self.http = http;
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn voice(&self) -> &str {
        &self.voice
    }
}

#[async_trait]
impl SpeechSynthesizer for OpenAiSpeech {
    fn max_input_chars(&self) -> usize {
        OPENAI_SPEECH_MAX_CHARS
    }

    fn audio_extension(&self) -> &str {
        &self.format
    }

    async fn synthesize(&self, text: &str) -> Result<Bytes> {
        let client = OpenAiClient::new(
            &self.api_key,
            &self.http,
            self.base_url.as_deref().unwrap_or(OPENAI_API_URL),
        );
        let request = types::SpeechRequest {
            model: &self.model,
            input: text,
            voice: &self.voice,
            response_format: &self.format,
        };
        client.speech(&request).await
    }
}
