use std::sync::Arc;

use ai_client::{Claude, OpenAi, OpenAiSpeech, SpeechSynthesizer, TextGenerator};
use papercast_common::{AppConfig, LlmProvider, PapercastError, Result};
use papercast_sources::{DocumentResolver, ResolverConfig};
use tracing::info;

use crate::audio_store::AudioStore;
use crate::narrator::Narrator;
use crate::studio::{Studio, StudioOptions};

/// Wire a production `Studio` from configuration.
pub fn build_studio(config: &AppConfig, options: StudioOptions) -> Result<Studio> {
    let http = reqwest::Client::builder()
        .timeout(config.http_timeout)
        .build()
        .map_err(|e| PapercastError::Config(format!("HTTP client: {e}")))?;

    let resolver = DocumentResolver::new(ResolverConfig {
        arxiv_url: config.arxiv_url.clone(),
        http_timeout: config.http_timeout,
        scratch_dir: None,
    })
    .map_err(|e| PapercastError::Config(format!("document resolver: {e}")))?;

    let store = AudioStore::open(&config.audio_dir, config.audio_retention).map_err(|e| {
        PapercastError::Config(format!(
            "audio directory {}: {e}",
            config.audio_dir.display()
        ))
    })?;

    let narrator = Narrator::new(speech_synthesizer(config, http.clone()), Arc::new(store));
    Ok(Studio::new(
        Arc::new(resolver),
        text_generator(config, http)?,
        narrator,
        options,
    ))
}

pub fn text_generator(config: &AppConfig, http: reqwest::Client) -> Result<Arc<dyn TextGenerator>> {
    let generator: Arc<dyn TextGenerator> = match config.llm_provider {
        LlmProvider::OpenAi => {
            let mut client = OpenAi::new(&config.openai_api_key, &config.generation_model)
                .with_http_client(http);
            if let Some(url) = &config.openai_base_url {
                client = client.with_base_url(url);
            }
            Arc::new(client)
        }
        LlmProvider::Anthropic => {
            let key = config.anthropic_api_key.as_deref().ok_or_else(|| {
                PapercastError::Config("ANTHROPIC_API_KEY is not set".into())
            })?;
            Arc::new(Claude::new(key, &config.generation_model).with_http_client(http))
        }
    };
    info!(provider = ?config.llm_provider, model = generator.model(), "Text generator ready");
    Ok(generator)
}

pub fn speech_synthesizer(config: &AppConfig, http: reqwest::Client) -> Arc<dyn SpeechSynthesizer> {
    let mut speech = OpenAiSpeech::new(&config.openai_api_key)
        .with_model(&config.speech_model)
        .with_voice(&config.speech_voice)
        .with_http_client(http);
    if let Some(url) = &config.openai_base_url {
        speech = speech.with_base_url(url);
    }
    Arc::new(speech)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(pairs: &[(&str, &str)], audio_dir: &std::path::Path) -> AppConfig {
        let mut env: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        env.insert(
            "PAPERCAST_AUDIO_DIR".into(),
            audio_dir.to_string_lossy().to_string(),
        );
        AppConfig::from_lookup(|key| env.get(key).cloned()).unwrap()
    }

    #[test]
    fn picks_generator_by_provider() {
        let dir = tempfile::tempdir().unwrap();

        let openai = config(&[("OPENAI_API_KEY", "sk-test")], dir.path());
        let generator = text_generator(&openai, reqwest::Client::new()).unwrap();
        assert_eq!(generator.model(), "gpt-4o-mini");

        let anthropic = config(
            &[
                ("OPENAI_API_KEY", "sk-test"),
                ("ANTHROPIC_API_KEY", "ak-test"),
                ("PAPERCAST_LLM_PROVIDER", "anthropic"),
            ],
            dir.path(),
        );
        let generator = text_generator(&anthropic, reqwest::Client::new()).unwrap();
        assert_eq!(generator.model(), "claude-haiku-4-5-20251001");
    }

    #[test]
    fn speech_uses_configured_limits() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = config(&[("OPENAI_API_KEY", "sk-test")], dir.path());
        let speech = speech_synthesizer(&cfg, reqwest::Client::new());
        assert_eq!(speech.max_input_chars(), 4096);
        assert_eq!(speech.audio_extension(), "mp3");
    }

    #[test]
    fn studio_builds_without_network() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = config(
            &[("OPENAI_API_KEY", "sk-test"), ("PAPERCAST_PAPER_COUNT", "5")],
            dir.path(),
        );
        let studio = build_studio(
            &cfg,
            StudioOptions {
                paper_count: cfg.paper_count,
                ..StudioOptions::default()
            },
        )
        .unwrap();
        assert_eq!(studio.options().paper_count, 5);
        assert_eq!(studio.narrator().store().max_files(), 20);
    }
}
