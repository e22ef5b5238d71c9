use std::path::Path;
use std::sync::Arc;

use ai_client::TextGenerator;
use papercast_common::{
    PapercastError, PaperLink, Result, SortOrder, Stage, TopicVocabulary,
};
use papercast_sources::SourceError;
use tracing::{info, warn};

use crate::classifier::Classifier;
use crate::narrator::Narrator;
use crate::report::{
    PaperOutcome, PaperStatus, PendingUpload, TopicOutcome, TopicReport, UploadReport,
};
use crate::summarizer::Summarizer;
use crate::synthesizer::Synthesizer;
use crate::traits::PaperSource;

/// Observer for long-running steps, e.g. to drive a spinner.
pub trait Progress: Send + Sync {
    /// A step is starting. `paper` is the 1-based paper index in topic runs.
    fn stage(&self, _stage: Stage, _paper: Option<usize>) {}
}

pub struct NoProgress;

impl Progress for NoProgress {}

#[derive(Debug, Clone)]
pub struct StudioOptions {
    pub paper_count: usize,
    pub sort_order: SortOrder,
    /// Characters of extracted text shown before an upload is analyzed.
    pub preview_chars: usize,
}

impl Default for StudioOptions {
    fn default() -> Self {
        Self {
            paper_count: 3,
            sort_order: SortOrder::default(),
            preview_chars: 3000,
        }
    }
}

/// Runs the two pipelines: topic search and single upload.
pub struct Studio {
    source: Arc<dyn PaperSource>,
    classifier: Classifier,
    summarizer: Summarizer,
    synthesizer: Synthesizer,
    narrator: Narrator,
    options: StudioOptions,
    progress: Arc<dyn Progress>,
}

impl Studio {
    pub fn new(
        source: Arc<dyn PaperSource>,
        generator: Arc<dyn TextGenerator>,
        narrator: Narrator,
        options: StudioOptions,
    ) -> Self {
        Self {
            source,
            classifier: Classifier::new(generator.clone()),
            summarizer: Summarizer::new(generator.clone()),
            synthesizer: Synthesizer::new(generator),
            narrator,
            options,
            progress: Arc::new(NoProgress),
        }
    }

    pub fn with_progress(mut self, progress: Arc<dyn Progress>) -> Self {
        self.progress = progress;
        self
    }

    pub fn options(&self) -> &StudioOptions {
        &self.options
    }

    pub fn narrator(&self) -> &Narrator {
        &self.narrator
    }

    // --- Topic flow ---

    /// Search with the configured count and sort order.
    pub async fn run_topic(&self, topic: &str) -> Result<TopicOutcome> {
        self.run_topic_with(topic, self.options.paper_count, self.options.sort_order)
            .await
    }

    /// Search, summarize each paper, synthesize across the survivors and
    /// narrate the synthesis. One bad paper does not stop the others.
    pub async fn run_topic_with(
        &self,
        topic: &str,
        count: usize,
        sort: SortOrder,
    ) -> Result<TopicOutcome> {
        let topic = topic.trim();
        info!(topic, count, %sort, "Topic run starting");

        self.progress.stage(Stage::FetchList, None);
        let links = self
            .source
            .search(topic, count, sort)
            .await
            .map_err(|e| source_error(Stage::FetchList, e))?;

        if links.is_empty() {
            info!(topic, "No papers found");
            return Ok(TopicOutcome::NoPapers {
                topic: topic.to_string(),
            });
        }
        info!(papers = links.len(), "Found papers");

        let mut papers = Vec::with_capacity(links.len());
        let mut summaries = Vec::new();
        for (i, link) in links.into_iter().enumerate() {
            let index = i + 1;
            let status = match self.process_paper(index, &link).await {
                Ok((title, summary)) => {
                    summaries.push(summary.clone());
                    PaperStatus::Summarized { title, summary }
                }
                Err((stage, error)) => {
                    warn!(paper = index, url = link.url.as_str(), %stage, %error, "Paper failed, continuing");
                    PaperStatus::Failed { stage, error }
                }
            };
            papers.push(PaperOutcome {
                index,
                link,
                status,
            });
        }

        if summaries.is_empty() {
            return Err(PapercastError::AllPapersFailed {
                failed: papers.len(),
            });
        }

        self.progress.stage(Stage::Synthesize, None);
        let synthesis = self.synthesizer.synthesize(&summaries).await?;

        self.progress.stage(Stage::Narrate, None);
        let audio = self.narrator.speak(&synthesis.text).await?;

        let report = TopicReport {
            topic: topic.to_string(),
            papers,
            synthesis,
            audio,
        };
        info!(
            topic,
            summarized = report.summarized(),
            failed = report.failed(),
            "Topic run complete"
        );
        Ok(TopicOutcome::Completed(report))
    }

    async fn process_paper(
        &self,
        index: usize,
        link: &PaperLink,
    ) -> std::result::Result<(String, String), (Stage, String)> {
        self.progress.stage(Stage::Download, Some(index));
        let document = self
            .source
            .fetch_and_extract(link)
            .await
            .map_err(|e| (fetch_stage(&e), e.to_string()))?;
        if !document.has_text() {
            return Err((Stage::Extract, "no extractable text".to_string()));
        }

        self.progress.stage(Stage::Summarize, Some(index));
        let summary = self
            .summarizer
            .summarize(&document.text)
            .await
            .map_err(|e| match e {
                PapercastError::Stage { stage, message } => (stage, message),
                other => (Stage::Summarize, other.to_string()),
            })?;

        let title = link
            .title
            .clone()
            .unwrap_or_else(|| document.metadata().title);
        Ok((title, summary))
    }

    // --- Upload flow ---

    /// Extract an uploaded PDF without calling any model.
    /// Read a PDF from disk and extract it. A missing or unreadable file is
    /// an input error.
    pub async fn ingest_file(&self, path: &Path) -> Result<PendingUpload> {
        let bytes = tokio::fs::read(path).await.map_err(|e| {
            PapercastError::InvalidInput(format!("cannot read {}: {e}", path.display()))
        })?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        self.ingest_upload(&file_name, bytes).await
    }

    pub async fn ingest_upload(&self, file_name: &str, bytes: Vec<u8>) -> Result<PendingUpload> {
        info!(file_name, bytes = bytes.len(), "Upload received");
        self.progress.stage(Stage::Extract, None);

        let document = self
            .source
            .extract_from_upload(file_name, bytes)
            .await
            .map_err(|e| source_error(Stage::Extract, e))?;

        let metadata = document.metadata();
        let preview = document.preview(self.options.preview_chars);
        info!(title = metadata.title.as_str(), chars = document.text.chars().count(), "Text extracted");
        Ok(PendingUpload {
            document,
            metadata,
            preview,
        })
    }

    /// Classify, summarize and narrate a confirmed upload.
    pub async fn analyze(
        &self,
        pending: PendingUpload,
        vocabulary: &TopicVocabulary,
    ) -> Result<UploadReport> {
        let PendingUpload {
            document, metadata, ..
        } = pending;

        self.progress.stage(Stage::Classify, None);
        let classification = self.classifier.classify(&document.text, vocabulary).await?;

        self.progress.stage(Stage::Summarize, None);
        let summary = self.summarizer.summarize(&document.text).await?;

        self.progress.stage(Stage::Narrate, None);
        let audio = self.narrator.speak(&summary).await?;

        info!(title = metadata.title.as_str(), topic = %classification, "Upload analyzed");
        Ok(UploadReport {
            metadata,
            classification,
            summary,
            audio,
        })
    }
}

/// Which step a fetch failure belongs to.
fn fetch_stage(err: &SourceError) -> Stage {
    match err {
        SourceError::NotPdf(_) | SourceError::InvalidPdf { .. } | SourceError::NoExtractableText(_) => {
            Stage::Extract
        }
        _ => Stage::Download,
    }
}

fn source_error(stage: Stage, err: SourceError) -> PapercastError {
    match err {
        SourceError::NoExtractableText(locator) => PapercastError::NoExtractableText(locator),
        e if e.is_input_error() => PapercastError::InvalidInput(e.to_string()),
        e => PapercastError::stage(stage, e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fetch_failures_map_to_download_or_extraction() {
        let http = SourceError::Http {
            status: 404,
            url: "http://x".into(),
        };
        assert_eq!(fetch_stage(&http), Stage::Download);
        assert_eq!(fetch_stage(&SourceError::NotPdf("x".into())), Stage::Extract);
        assert_eq!(
            fetch_stage(&SourceError::NoExtractableText("x".into())),
            Stage::Extract
        );
    }

    #[test]
    fn user_mistakes_become_input_errors() {
        assert!(source_error(Stage::FetchList, SourceError::EmptyTopic).is_input_error());
        assert!(matches!(
            source_error(Stage::Extract, SourceError::NoExtractableText("scan.pdf".into())),
            PapercastError::NoExtractableText(name) if name == "scan.pdf"
        ));
        let remote = source_error(
            Stage::FetchList,
            SourceError::Http {
                status: 503,
                url: "http://x".into(),
            },
        );
        assert!(matches!(
            remote,
            PapercastError::Stage {
                stage: Stage::FetchList,
                ..
            }
        ));
    }
}
