use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use crate::error::{PapercastError, Result};
use crate::types::{SortOrder, TopicVocabulary, DEFAULT_TOPICS};

pub const DEFAULT_ARXIV_URL: &str = "http://export.arxiv.org/api/query";
pub const DEFAULT_OPENAI_MODEL: &str = "gpt-4o-mini";
pub const DEFAULT_ANTHROPIC_MODEL: &str = "claude-haiku-4-5-20251001";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LlmProvider {
    OpenAi,
    Anthropic,
}

impl FromStr for LlmProvider {
    type Err = PapercastError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "openai" => Ok(LlmProvider::OpenAi),
            "anthropic" | "claude" => Ok(LlmProvider::Anthropic),
            other => Err(PapercastError::Config(format!(
                "PAPERCAST_LLM_PROVIDER must be 'openai' or 'anthropic', got '{other}'"
            ))),
        }
    }
}

/// Application configuration loaded from environment variables.
/// Credentials live here and are handed to clients at construction.
#[derive(Debug, Clone)]
pub struct AppConfig {
    // Generation
    pub llm_provider: LlmProvider,
    pub generation_model: String,
    pub openai_api_key: String,
    pub openai_base_url: Option<String>,
    pub anthropic_api_key: Option<String>,

    // Speech
    pub speech_model: String,
    pub speech_voice: String,

    // Sources
    pub arxiv_url: String,
    pub paper_count: usize,
    pub sort_order: SortOrder,
    pub http_timeout: Duration,

    // Output
    pub audio_dir: PathBuf,
    pub audio_retention: usize,
    pub topics: TopicVocabulary,
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        let config = Self::from_lookup(|key| std::env::var(key).ok())?;
        config.log_keys();
        Ok(config)
    }

    /// Build from any key lookup. Empty values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let llm_provider = get("PAPERCAST_LLM_PROVIDER")
            .map(|v| v.parse::<LlmProvider>())
            .transpose()?
            .unwrap_or(LlmProvider::OpenAi);

        let openai_api_key = get("OPENAI_API_KEY").ok_or_else(|| {
            PapercastError::Config("OPENAI_API_KEY is required for speech synthesis".into())
        })?;

        let anthropic_api_key = get("ANTHROPIC_API_KEY");
        if llm_provider == LlmProvider::Anthropic && anthropic_api_key.is_none() {
            return Err(PapercastError::Config(
                "ANTHROPIC_API_KEY is required when PAPERCAST_LLM_PROVIDER=anthropic".into(),
            ));
        }

        let generation_model = get("PAPERCAST_MODEL").unwrap_or_else(|| {
            match llm_provider {
                LlmProvider::OpenAi => DEFAULT_OPENAI_MODEL,
                LlmProvider::Anthropic => DEFAULT_ANTHROPIC_MODEL,
            }
            .to_string()
        });

        let sort_order = get("PAPERCAST_SORT_ORDER")
            .map(|v| v.parse::<SortOrder>().map_err(PapercastError::Config))
            .transpose()?
            .unwrap_or_default();

        Ok(Self {
            llm_provider,
            generation_model,
            openai_api_key,
            openai_base_url: get("OPENAI_BASE_URL"),
            anthropic_api_key,
            speech_model: get("PAPERCAST_SPEECH_MODEL").unwrap_or_else(|| "tts-1".to_string()),
            speech_voice: get("PAPERCAST_SPEECH_VOICE").unwrap_or_else(|| "alloy".to_string()),
            arxiv_url: get("PAPERCAST_ARXIV_URL").unwrap_or_else(|| DEFAULT_ARXIV_URL.to_string()),
            paper_count: parse_number(&get, "PAPERCAST_PAPER_COUNT", 3)?,
            sort_order,
            http_timeout: Duration::from_secs(parse_number(
                &get,
                "PAPERCAST_HTTP_TIMEOUT_SECS",
                60,
            )?),
            audio_dir: get("PAPERCAST_AUDIO_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("papercast-audio")),
            audio_retention: parse_number(&get, "PAPERCAST_AUDIO_RETENTION", 20)?,
            topics: TopicVocabulary::parse(
                get("PAPERCAST_TOPICS").as_deref().unwrap_or(DEFAULT_TOPICS),
            ),
        })
    }

    fn log_keys(&self) {
        fn preview(val: &str) -> String {
            let n = val.chars().count().min(5);
            let head: String = val.chars().take(n).collect();
            format!("{}...({} chars)", head, val.chars().count())
        }
        fn preview_opt(val: &Option<String>) -> String {
            match val {
                Some(v) if !v.is_empty() => preview(v),
                _ => "<not set>".to_string(),
            }
        }

        tracing::info!("Config loaded:");
        tracing::info!("  LLM provider: {:?} ({})", self.llm_provider, self.generation_model);
        tracing::info!("  OPENAI_API_KEY: {}", preview(&self.openai_api_key));
        tracing::info!("  ANTHROPIC_API_KEY: {}", preview_opt(&self.anthropic_api_key));
        tracing::info!("  Speech: {} / {}", self.speech_model, self.speech_voice);
        tracing::info!("  arXiv endpoint: {}", self.arxiv_url);
        tracing::info!(
            "  Audio dir: {} (keep {})",
            self.audio_dir.display(),
            self.audio_retention
        );
    }
}

fn parse_number<T: FromStr>(
    get: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: T,
) -> Result<T> {
    match get(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| PapercastError::Config(format!("{key} must be a number, got '{raw}'"))),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> Result<AppConfig> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_with_only_openai_key() {
        let config = config_from(&[("OPENAI_API_KEY", "sk-test")]).unwrap();
        assert_eq!(config.llm_provider, LlmProvider::OpenAi);
        assert_eq!(config.generation_model, DEFAULT_OPENAI_MODEL);
        assert_eq!(config.arxiv_url, DEFAULT_ARXIV_URL);
        assert_eq!(config.paper_count, 3);
        assert_eq!(config.sort_order, SortOrder::Relevance);
        assert_eq!(config.http_timeout, Duration::from_secs(60));
        assert_eq!(config.audio_retention, 20);
        assert_eq!(config.topics, TopicVocabulary::default());
    }

    #[test]
    fn missing_openai_key_is_a_config_error() {
        let err = config_from(&[]).unwrap_err();
        assert!(matches!(err, PapercastError::Config(_)));
    }

    #[test]
    fn blank_values_count_as_unset() {
        let err = config_from(&[("OPENAI_API_KEY", "   ")]).unwrap_err();
        assert!(matches!(err, PapercastError::Config(_)));
    }

    #[test]
    fn anthropic_provider_requires_its_key() {
        let err = config_from(&[
            ("OPENAI_API_KEY", "sk-test"),
            ("PAPERCAST_LLM_PROVIDER", "anthropic"),
        ])
        .unwrap_err();
        assert!(err.to_string().contains("ANTHROPIC_API_KEY"));

        let config = config_from(&[
            ("OPENAI_API_KEY", "sk-test"),
            ("ANTHROPIC_API_KEY", "sk-ant"),
            ("PAPERCAST_LLM_PROVIDER", "Claude"),
        ])
        .unwrap();
        assert_eq!(config.llm_provider, LlmProvider::Anthropic);
        assert_eq!(config.generation_model, DEFAULT_ANTHROPIC_MODEL);
    }

    #[test]
    fn unknown_provider_is_rejected() {
        let err = config_from(&[
            ("OPENAI_API_KEY", "sk-test"),
            ("PAPERCAST_LLM_PROVIDER", "cohere"),
        ])
        .unwrap_err();
        assert!(err.to_string().contains("cohere"));
    }

    #[test]
    fn numeric_overrides_are_validated() {
        let config = config_from(&[
            ("OPENAI_API_KEY", "sk-test"),
            ("PAPERCAST_AUDIO_RETENTION", "5"),
            ("PAPERCAST_HTTP_TIMEOUT_SECS", "10"),
            ("PAPERCAST_TOPICS", "Astro, Bio"),
        ])
        .unwrap();
        assert_eq!(config.audio_retention, 5);
        assert_eq!(config.http_timeout, Duration::from_secs(10));
        assert_eq!(config.topics.labels(), &["Astro", "Bio"]);

        let err = config_from(&[
            ("OPENAI_API_KEY", "sk-test"),
            ("PAPERCAST_PAPER_COUNT", "three"),
        ])
        .unwrap_err();
        assert!(err.to_string().contains("PAPERCAST_PAPER_COUNT"));
    }
}
