use std::sync::Arc;

use ai_client::{GenerationRequest, TextGenerator};
use papercast_common::{PapercastError, Result, Stage, SynthesisResult};
use tracing::info;

use crate::generate::first_text;

pub const SYNTHESIS_MAX_TOKENS: u32 = 600;
pub const SYNTHESIS_TEMPERATURE: f32 = 0.5;

/// Label each summary "Paper N: " in input order and join with blank lines.
pub fn combine_summaries(summaries: &[String]) -> String {
    summaries
        .iter()
        .enumerate()
        .map(|(i, summary)| format!("Paper {}: {}", i + 1, summary))
        .collect::<Vec<_>>()
        .join("\n\n")
}

pub fn synthesis_prompt(summaries: &[String]) -> String {
    format!(
        "Synthesize the following summaries into one cohesive overview that compares and contrasts their contributions and findings:\n\n{}",
        combine_summaries(summaries)
    )
}

/// Merges several paper summaries into one comparative overview.
pub struct Synthesizer {
    generator: Arc<dyn TextGenerator>,
}

impl Synthesizer {
    pub fn new(generator: Arc<dyn TextGenerator>) -> Self {
        Self { generator }
    }

    pub async fn synthesize(&self, summaries: &[String]) -> Result<SynthesisResult> {
        if summaries.is_empty() {
            return Err(PapercastError::InvalidInput(
                "no summaries to synthesize".into(),
            ));
        }

        let request = GenerationRequest::new(synthesis_prompt(summaries))
            .max_tokens(SYNTHESIS_MAX_TOKENS)
            .temperature(SYNTHESIS_TEMPERATURE);
        let text = first_text(self.generator.as_ref(), &request, Stage::Synthesize).await?;

        info!(papers = summaries.len(), "Synthesis generated");
        Ok(SynthesisResult {
            text,
            paper_count: summaries.len(),
        })
    }
}
