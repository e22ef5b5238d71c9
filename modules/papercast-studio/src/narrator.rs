use std::sync::Arc;

use ai_client::SpeechSynthesizer;
use papercast_common::{AudioArtifact, PapercastError, Result, Stage};
use tracing::{debug, info};

use crate::audio_store::AudioStore;
use crate::generate::provider_error;

/// Turns text into an audio file via a speech service.
pub struct Narrator {
    speech: Arc<dyn SpeechSynthesizer>,
    store: Arc<AudioStore>,
}

impl Narrator {
    pub fn new(speech: Arc<dyn SpeechSynthesizer>, store: Arc<AudioStore>) -> Self {
        Self { speech, store }
    }

    pub fn store(&self) -> &Arc<AudioStore> {
        &self.store
    }

    /// Synthesize `text`, chunked to the service's input limit, into one file.
    pub async fn speak(&self, text: &str) -> Result<AudioArtifact> {
        let text = text.trim();
        if text.is_empty() {
            return Err(PapercastError::InvalidInput("nothing to narrate".into()));
        }

        let chunks = split_for_speech(text, self.speech.max_input_chars());
        info!(chunks = chunks.len(), chars = text.chars().count(), "Narrating");

        let mut audio = Vec::new();
        for (i, chunk) in chunks.iter().enumerate() {
            debug!(chunk = i + 1, chars = chunk.chars().count(), "Synthesizing chunk");
            let bytes = self
                .speech
                .synthesize(chunk)
                .await
                .map_err(|e| provider_error(Stage::Narrate, e))?;
            audio.extend_from_slice(&bytes);
        }

        self.store
            .save(&audio, self.speech.audio_extension())
            .await
            .map_err(|e| PapercastError::stage(Stage::Narrate, format!("writing audio: {e}")))
    }
}

/// Split text into pieces of at most `max_chars` characters.
///
/// Sentence ends are preferred break points, then whitespace; a single
/// word longer than the limit is cut mid-word.
pub fn split_for_speech(text: &str, max_chars: usize) -> Vec<String> {
    let max_chars = max_chars.max(1);
    let mut chunks = Vec::new();
    let mut current = String::new();
    let mut current_len = 0;

    for unit in units(text, max_chars) {
        let len = unit.chars().count();
        if current_len + len > max_chars && !current.trim().is_empty() {
            chunks.push(current.trim().to_string());
            current.clear();
            current_len = 0;
        }
        current.push_str(&unit);
        current_len += len;
    }
    if !current.trim().is_empty() {
        chunks.push(current.trim().to_string());
    }
    chunks
}

/// Sentences, or words of over-long sentences, or slices of over-long words.
fn units(text: &str, max_chars: usize) -> Vec<String> {
    let mut out = Vec::new();
    for sentence in sentences(text) {
        if sentence.chars().count() <= max_chars {
            out.push(sentence.to_string());
            continue;
        }
        for word in sentence.split_inclusive(char::is_whitespace) {
            if word.chars().count() <= max_chars {
                out.push(word.to_string());
                continue;
            }
            let chars: Vec<char> = word.chars().collect();
            out.extend(chars.chunks(max_chars).map(|c| c.iter().collect::<String>()));
        }
    }
    out
}

/// Split after sentence-ending punctuation followed by whitespace,
/// keeping that whitespace with the sentence.
fn sentences(text: &str) -> Vec<&str> {
    let mut out = Vec::new();
    let mut start = 0;
    let mut prev_terminal = false;
    for (i, c) in text.char_indices() {
        if c.is_whitespace() && prev_terminal {
            let end = i + c.len_utf8();
            out.push(&text[start..end]);
            start = end;
        }
        prev_terminal = matches!(c, '.' | '!' | '?');
    }
    if start < text.len() {
        out.push(&text[start..]);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MockSpeech;

    fn words(s: &str) -> Vec<&str> {
        s.split_whitespace().collect()
    }

    #[test]
    fn short_text_is_one_chunk() {
        assert_eq!(split_for_speech("Hello there.", 4096), vec!["Hello there."]);
    }

    #[test]
    fn chunks_break_at_sentence_ends() {
        let text = "First sentence here. Second one follows. Third closes it.";
        let chunks = split_for_speech(text, 45);
        assert_eq!(
            chunks,
            vec!["First sentence here. Second one follows.", "Third closes it."]
        );
    }

    #[test]
    fn long_sentences_break_at_whitespace_and_keep_every_word() {
        let text = "word ".repeat(300);
        let chunks = split_for_speech(&text, 64);
        assert!(chunks.len() > 1);
        assert!(chunks.iter().all(|c| c.chars().count() <= 64));
        assert_eq!(words(&chunks.join(" ")), words(&text));
    }

    #[test]
    fn oversized_word_is_cut() {
        let chunks = split_for_speech(&"a".repeat(25), 10);
        assert_eq!(chunks, vec!["a".repeat(10), "a".repeat(10), "a".repeat(5)]);
    }

    #[tokio::test]
    async fn audio_of_all_chunks_lands_in_one_file() {
        let dir = tempfile::tempdir().unwrap();
        let store = Arc::new(AudioStore::open(dir.path(), 5).unwrap());
        let speech = Arc::new(MockSpeech::new().max_input_chars(20));
        let narrator = Narrator::new(speech.clone(), store);

        let artifact = narrator
            .speak("One short line. Another short line.")
            .await
            .unwrap();

        let inputs = speech.inputs();
        assert_eq!(inputs, vec!["One short line.", "Another short line."]);
        let written = std::fs::read(&artifact.path).unwrap();
        assert_eq!(written, b"<One short line.><Another short line.>");
        assert_eq!(artifact.bytes, written.len() as u64);
    }

    #[tokio::test]
    async fn speech_failure_is_a_narration_error() {
        let dir = tempfile::tempdir().unwrap();
        let store = Arc::new(AudioStore::open(dir.path(), 5).unwrap());
        let narrator = Narrator::new(Arc::new(MockSpeech::new().failing(503)), store.clone());

        let err = narrator.speak("Some text.").await.unwrap_err();
        assert!(matches!(
            err,
            PapercastError::Stage {
                stage: Stage::Narrate,
                ..
            }
        ));
        assert!(store.retained().is_empty());
    }

    #[tokio::test]
    async fn empty_text_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let store = Arc::new(AudioStore::open(dir.path(), 5).unwrap());
        let narrator = Narrator::new(Arc::new(MockSpeech::new()), store);
        assert!(narrator.speak("  ").await.unwrap_err().is_input_error());
    }
}
