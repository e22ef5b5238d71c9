use std::sync::Arc;

use ai_client::{truncate_chars, GenerationRequest, TextGenerator};
use papercast_common::{PapercastError, Result, Stage};
use tracing::info;

use crate::generate::first_text;

/// Characters of paper text sent with a summary request.
pub const SUMMARY_INPUT_CHARS: usize = 8000;
pub const SUMMARY_MAX_TOKENS: u32 = 500;
pub const SUMMARY_TEMPERATURE: f32 = 0.5;

pub fn summary_prompt(text: &str) -> String {
    format!(
        "Summarize this research paper in simple terms for a podcast audience:\n\n{}",
        truncate_chars(text, SUMMARY_INPUT_CHARS)
    )
}

/// Produces a plain-language summary of one paper.
pub struct Summarizer {
    generator: Arc<dyn TextGenerator>,
}

impl Summarizer {
    pub fn new(generator: Arc<dyn TextGenerator>) -> Self {
        Self { generator }
    }

    pub async fn summarize(&self, text: &str) -> Result<String> {
        if text.trim().is_empty() {
            return Err(PapercastError::InvalidInput(
                "cannot summarize a paper with no text".into(),
            ));
        }

        let request = GenerationRequest::new(summary_prompt(text))
            .max_tokens(SUMMARY_MAX_TOKENS)
            .temperature(SUMMARY_TEMPERATURE);
        let summary = first_text(self.generator.as_ref(), &request, Stage::Summarize).await?;

        info!(chars = summary.chars().count(), "Summary generated");
        Ok(summary)
    }
}
