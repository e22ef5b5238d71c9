use std::fmt;

use papercast_common::{
    AudioArtifact, Classification, Document, DocumentMetadata, PaperLink, Stage, SynthesisResult,
};
use serde::Serialize;

/// What happened to one paper in a topic run.
#[derive(Debug, Clone, Serialize)]
pub struct PaperOutcome {
    /// 1-based position in the search results.
    pub index: usize,
    pub link: PaperLink,
    pub status: PaperStatus,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum PaperStatus {
    Summarized { title: String, summary: String },
    Failed { stage: Stage, error: String },
}

impl PaperOutcome {
    pub fn is_failed(&self) -> bool {
        matches!(self.status, PaperStatus::Failed { .. })
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum TopicOutcome {
    /// The search matched no PDF papers.
    NoPapers { topic: String },
    Completed(TopicReport),
}

#[derive(Debug, Clone, Serialize)]
pub struct TopicReport {
    pub topic: String,
    pub papers: Vec<PaperOutcome>,
    pub synthesis: SynthesisResult,
    pub audio: AudioArtifact,
}

impl TopicReport {
    pub fn summarized(&self) -> usize {
        self.papers.iter().filter(|p| !p.is_failed()).count()
    }

    pub fn failed(&self) -> usize {
        self.papers.iter().filter(|p| p.is_failed()).count()
    }
}

impl fmt::Display for TopicReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "\n=== Papercast: {} ===", self.topic)?;
        writeln!(
            f,
            "Papers:      {} summarized, {} failed",
            self.summarized(),
            self.failed()
        )?;
        for paper in &self.papers {
            match &paper.status {
                PaperStatus::Summarized { title, .. } => {
                    writeln!(f, "  [{}] {}  <{}>", paper.index, title, paper.link.url)?
                }
                PaperStatus::Failed { stage, error } => writeln!(
                    f,
                    "  [{}] FAILED at {}: {}  <{}>",
                    paper.index, stage, error, paper.link.url
                )?,
            }
        }
        writeln!(f, "\nCross-paper summary:\n{}", self.synthesis.text)?;
        write!(
            f,
            "\nAudio:       {} ({} bytes)",
            self.audio.path.display(),
            self.audio.bytes
        )
    }
}

impl fmt::Display for TopicOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TopicOutcome::NoPapers { topic } => {
                write!(f, "No papers found for '{topic}'. Try a broader topic.")
            }
            TopicOutcome::Completed(report) => fmt::Display::fmt(report, f),
        }
    }
}

/// An uploaded paper whose text has been extracted but not yet sent to
/// any model. Shown to the user for confirmation.
#[derive(Debug, Clone)]
pub struct PendingUpload {
    pub document: Document,
    pub metadata: DocumentMetadata,
    pub preview: String,
}

impl fmt::Display for PendingUpload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.metadata)?;
        write!(f, "\n--- Extracted text preview ---\n{}", self.preview)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct UploadReport {
    pub metadata: DocumentMetadata,
    pub classification: Classification,
    pub summary: String,
    pub audio: AudioArtifact,
}

impl fmt::Display for UploadReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "\n=== Papercast: {} ===", self.metadata.title)?;
        writeln!(f, "Source:      {}", self.metadata.source)?;
        writeln!(f, "Topic:       {}", self.classification)?;
        writeln!(f, "\nSummary:\n{}", self.summary)?;
        write!(
            f,
            "\nAudio:       {} ({} bytes)",
            self.audio.path.display(),
            self.audio.bytes
        )
    }
}
