use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::Serialize;

// --- Pipeline stages ---

/// The pipeline step a failure belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    FetchList,
    Download,
    Extract,
    Classify,
    Summarize,
    Synthesize,
    Narrate,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::FetchList => "paper search",
            Stage::Download => "download",
            Stage::Extract => "text extraction",
            Stage::Classify => "classification",
            Stage::Summarize => "summarization",
            Stage::Synthesize => "synthesis",
            Stage::Narrate => "narration",
        };
        f.write_str(name)
    }
}

// --- Search ---

/// arXiv `sortBy` values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum SortOrder {
    #[default]
    Relevance,
    LastUpdatedDate,
    SubmittedDate,
}

impl SortOrder {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortOrder::Relevance => "relevance",
            SortOrder::LastUpdatedDate => "lastUpdatedDate",
            SortOrder::SubmittedDate => "submittedDate",
        }
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "relevance" => Ok(SortOrder::Relevance),
            "lastupdateddate" | "updated" => Ok(SortOrder::LastUpdatedDate),
            "submitteddate" | "submitted" => Ok(SortOrder::SubmittedDate),
            other => Err(format!(
                "unknown sort order '{other}' (expected relevance, lastUpdatedDate or submittedDate)"
            )),
        }
    }
}

/// A PDF link found in a search feed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PaperLink {
    pub url: String,
    pub title: Option<String>,
}

// --- Documents ---

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DocumentSource {
    Upload { file_name: String },
    Arxiv { url: String },
}

impl DocumentSource {
    pub fn label(&self) -> &'static str {
        match self {
            DocumentSource::Upload { .. } => "uploaded",
            DocumentSource::Arxiv { .. } => "arXiv",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DocumentMetadata {
    pub title: String,
    pub source: String,
}

impl fmt::Display for DocumentMetadata {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Title: {}\nSource: {}", self.title, self.source)
    }
}

/// Extracted plain text plus where it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    pub text: String,
    pub source: DocumentSource,
}

impl Document {
    pub fn new(text: impl Into<String>, source: DocumentSource) -> Self {
        Self {
            text: text.into(),
            source,
        }
    }

    pub fn has_text(&self) -> bool {
        !self.text.trim().is_empty()
    }

    /// Title guessed from the first non-empty line.
    pub fn metadata(&self) -> DocumentMetadata {
        let title = self
            .text
            .lines()
            .map(str::trim)
            .find(|line| !line.is_empty())
            .unwrap_or("Untitled")
            .to_string();
        DocumentMetadata {
            title,
            source: self.source.label().to_string(),
        }
    }

    /// First `limit` characters, with "..." appended when cut.
    pub fn preview(&self, limit: usize) -> String {
        match self.text.char_indices().nth(limit) {
            Some((end, _)) => format!("{}...", &self.text[..end]),
            None => self.text.clone(),
        }
    }
}

// --- Classification ---

pub const DEFAULT_TOPICS: &str = "NLP, Computer Vision, Reinforcement Learning, Robotics";

/// Ordered, de-duplicated label set for one run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TopicVocabulary(Vec<String>);

impl TopicVocabulary {
    pub fn new<I, S>(labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut seen = std::collections::HashSet::new();
        let labels = labels
            .into_iter()
            .map(|l| l.as_ref().trim().to_string())
            .filter(|l| !l.is_empty())
            .filter(|l| seen.insert(l.to_lowercase()))
            .collect();
        Self(labels)
    }

    /// Parse a comma-separated list.
    pub fn parse(list: &str) -> Self {
        Self::new(list.split(','))
    }

    pub fn labels(&self) -> &[String] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }
}

impl Default for TopicVocabulary {
    fn default() -> Self {
        Self::parse(DEFAULT_TOPICS)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Classification {
    Label { label: String },
    Unclassified { raw: String },
}

impl Classification {
    pub fn label(&self) -> Option<&str> {
        match self {
            Classification::Label { label } => Some(label),
            Classification::Unclassified { .. } => None,
        }
    }
}

impl fmt::Display for Classification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Classification::Label { label } => f.write_str(label),
            Classification::Unclassified { raw } if raw.is_empty() => f.write_str("unclassified"),
            Classification::Unclassified { raw } => write!(f, "unclassified (model said: {raw})"),
        }
    }
}

// --- Outputs ---

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SynthesisResult {
    pub text: String,
    pub paper_count: usize,
}

/// A generated audio file on local disk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AudioArtifact {
    pub path: PathBuf,
    pub bytes: u64,
    pub created_at: DateTime<Utc>,
}
