use std::sync::Arc;

use ai_client::{truncate_chars, GenerationRequest, TextGenerator};
use papercast_common::{Classification, PapercastError, Result, Stage, TopicVocabulary};
use regex::Regex;
use tracing::{info, warn};

use crate::generate::first_answer;

/// Characters of paper text sent with a classification request.
pub const CLASSIFY_INPUT_CHARS: usize = 2000;
pub const CLASSIFY_MAX_TOKENS: u32 = 50;
pub const CLASSIFY_TEMPERATURE: f32 = 0.3;

pub fn classification_prompt(text: &str, vocabulary: &TopicVocabulary) -> String {
    format!(
        "Classify the following academic paper content into one of the topics: {}\n\n{}",
        vocabulary.labels().join(", "),
        truncate_chars(text, CLASSIFY_INPUT_CHARS)
    )
}

/// Map a free-form model answer onto the vocabulary.
///
/// Exact match (ignoring case, surrounding quotes and trailing punctuation)
/// wins; otherwise the answer is accepted only if exactly one label appears
/// in it as a whole word. A blank answer is unclassified.
pub fn match_label(raw: &str, vocabulary: &TopicVocabulary) -> Classification {
    let answer = normalize(raw);
    let unclassified = || Classification::Unclassified {
        raw: raw.trim().to_string(),
    };
    if answer.is_empty() {
        return unclassified();
    }

    if let Some(label) = vocabulary
        .labels()
        .iter()
        .find(|label| normalize(label) == answer)
    {
        return Classification::Label {
            label: label.clone(),
        };
    }

    let Some(pattern) = label_pattern(vocabulary) else {
        return unclassified();
    };
    let mut mentioned: Vec<&String> = Vec::new();
    for found in pattern.find_iter(raw) {
        let found = found.as_str().to_lowercase();
        if let Some(label) = vocabulary
            .labels()
            .iter()
            .find(|label| label.to_lowercase() == found)
        {
            if !mentioned.contains(&label) {
                mentioned.push(label);
            }
        }
    }

    match mentioned.as_slice() {
        [label] => Classification::Label {
            label: (*label).clone(),
        },
        _ => unclassified(),
    }
}

/// Case-insensitive alternation of the labels, longest first so an
/// overlapping shorter label never wins at the same position. Word
/// boundaries are anchored on label ends that are word characters.
fn label_pattern(vocabulary: &TopicVocabulary) -> Option<Regex> {
    let mut labels: Vec<&String> = vocabulary.labels().iter().collect();
    if labels.is_empty() {
        return None;
    }
    labels.sort_by_key(|label| std::cmp::Reverse(label.chars().count()));

    let is_word = |c: Option<char>| c.is_some_and(|c| c.is_alphanumeric() || c == '_');
    let alternation = labels
        .iter()
        .map(|label| {
            let head = if is_word(label.chars().next()) { r"\b" } else { "" };
            let tail = if is_word(label.chars().next_back()) { r"\b" } else { "" };
            format!("{head}{}{tail}", regex::escape(label))
        })
        .collect::<Vec<_>>()
        .join("|");
    match Regex::new(&format!("(?i)(?:{alternation})")) {
        Ok(re) => Some(re),
        Err(e) => {
            warn!(error = %e, "Topic list does not form a valid pattern");
            None
        }
    }
}

fn normalize(s: &str) -> String {
    s.trim()
        .trim_matches(|c: char| matches!(c, '"' | '\'' | '`' | '*'))
        .trim_end_matches(|c: char| matches!(c, '.' | '!' | ',' | ';' | ':'))
        .trim()
        .to_lowercase()
}

/// Assigns one topic label to a paper.
pub struct Classifier {
    generator: Arc<dyn TextGenerator>,
}

impl Classifier {
    pub fn new(generator: Arc<dyn TextGenerator>) -> Self {
        Self { generator }
    }

    pub async fn classify(
        &self,
        text: &str,
        vocabulary: &TopicVocabulary,
    ) -> Result<Classification> {
        if vocabulary.is_empty() {
            return Err(PapercastError::InvalidInput(
                "topic list is empty; give at least one topic to classify against".into(),
            ));
        }
        if text.trim().is_empty() {
            return Err(PapercastError::InvalidInput(
                "cannot classify a paper with no text".into(),
            ));
        }

        let request = GenerationRequest::new(classification_prompt(text, vocabulary))
            .max_tokens(CLASSIFY_MAX_TOKENS)
            .temperature(CLASSIFY_TEMPERATURE);
        // A blank answer is an unusable label, not a failed request.
        let raw = first_answer(self.generator.as_ref(), &request, Stage::Classify).await?;

        let classification = match_label(&raw, vocabulary);
        match &classification {
            Classification::Label { label } => info!(%label, %raw, "Paper classified"),
            Classification::Unclassified { .. } => {
                warn!(%raw, "Model answer is not in the topic list")
            }
        }
        Ok(classification)
    }
}
