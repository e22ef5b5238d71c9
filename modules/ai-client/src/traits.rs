use async_trait::async_trait;
use bytes::Bytes;

use crate::error::Result;

// =============================================================================
// Generation Request
// =============================================================================

/// One prompt plus its sampling parameters. The model is fixed by the client.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationRequest {
    pub prompt: String,
    pub max_tokens: u32,
    pub temperature: f32,
    /// Number of candidates to ask for. Providers that only produce one
    /// candidate ignore this.
    pub candidates: u32,
}

impl GenerationRequest {
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            max_tokens: 256,
            temperature: 0.0,
            candidates: 1,
        }
    }

    pub fn max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    pub fn temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn candidates(mut self, candidates: u32) -> Self {
        self.candidates = candidates.max(1);
        self
    }
}

// =============================================================================
// TextGenerator Trait
// =============================================================================

/// A hosted text-completion service: prompt in, candidate continuations out.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Model identifier requests are sent to.
    fn model(&self) -> &str;

    /// Generate candidates for the request, in the order the provider returned them.
    async fn generate(&self, request: &GenerationRequest) -> Result<Vec<String>>;
}

// =============================================================================
// SpeechSynthesizer Trait
// =============================================================================

/// A hosted text-to-speech service.
#[async_trait]
pub trait SpeechSynthesizer: Send + Sync {
    /// Longest input, in characters, a single request accepts.
    fn max_input_chars(&self) -> usize;

    /// File extension of the audio this synthesizer produces.
    fn audio_extension(&self) -> &str {
        "mp3"
    }

    async fn synthesize(&self, text: &str) -> Result<Bytes>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_builder_sets_sampling_parameters() {
        let request = GenerationRequest::new("hello")
            .max_tokens(500)
            .temperature(0.5)
            .candidates(0);
        assert_eq!(request.prompt, "hello");
        assert_eq!(request.max_tokens, 500);
        assert_eq!(request.temperature, 0.5);
        assert_eq!(request.candidates, 1);
    }
}
