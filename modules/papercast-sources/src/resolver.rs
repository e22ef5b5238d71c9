// DocumentResolver: the single entry point that turns an upload or a topic into
// plain-text Documents.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use papercast_common::{Document, DocumentSource, PaperLink, SortOrder};
use tracing::{info, warn};

use crate::arxiv::ArxivClient;
use crate::error::{Result, SourceError};
use crate::pdf::{self, PdfExtractBackend, PdfTextExtractor};
use crate::scratch::ScratchPdf;

/// Configuration for the resolver's HTTP client and scratch space.
#[derive(Debug, Clone)]
pub struct ResolverConfig {
    pub arxiv_url: String,
    pub http_timeout: Duration,
    /// Directory for downloaded PDFs; the system temp dir when unset.
    pub scratch_dir: Option<PathBuf>,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            arxiv_url: papercast_common::config::DEFAULT_ARXIV_URL.to_string(),
            http_timeout: Duration::from_secs(60),
            scratch_dir: None,
        }
    }
}

/// One searched paper and the outcome of fetching it.
#[derive(Debug)]
pub struct FetchedPaper {
    pub link: PaperLink,
    pub document: Result<Document>,
}

pub struct DocumentResolver {
    arxiv: ArxivClient,
    http: reqwest::Client,
    extractor: Arc<dyn PdfTextExtractor>,
    scratch_dir: Option<PathBuf>,
}

impl DocumentResolver {
    pub fn new(config: ResolverConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.http_timeout)
            .user_agent("papercast/0.1")
            .build()?;
        Ok(Self {
            arxiv: ArxivClient::new(http.clone(), config.arxiv_url),
            http,
            extractor: Arc::new(PdfExtractBackend),
            scratch_dir: config.scratch_dir,
        })
    }

    /// Extract the text of an uploaded PDF.
    pub async fn extract_from_upload(&self, file_name: &str, bytes: Vec<u8>) -> Result<Document> {
        let text = pdf::extract_text(self.extractor.clone(), bytes, file_name).await?;
        info!(file_name, chars = text.chars().count(), "upload: extracted text");
        Ok(Document::new(
            text,
            DocumentSource::Upload {
                file_name: file_name.to_string(),
            },
        ))
    }

    /// Search arXiv for PDF links on a topic. Empty means no papers found.
    pub async fn search(&self, topic: &str, count: usize, sort: SortOrder) -> Result<Vec<PaperLink>> {
        self.arxiv.search(topic, count, sort).await
    }

    /// Download one paper into its own scratch file and extract its text.
    /// The scratch file is gone when this returns, whatever the outcome.
    pub async fn fetch_and_extract(&self, link: &PaperLink) -> Result<Document> {
        let scratch = ScratchPdf::create(self.scratch_dir.as_deref())?;

        let resp = self.http.get(&link.url).send().await?;
        if !resp.status().is_success() {
            return Err(SourceError::Http {
                status: resp.status().as_u16(),
                url: link.url.clone(),
            });
        }

        let written = scratch.write_response(resp).await?;
        info!(url = link.url.as_str(), bytes = written, "download: complete");

        let bytes = scratch.read().await?;
        let text = pdf::extract_text(self.extractor.clone(), bytes, &link.url).await?;

        Ok(Document::new(
            text,
            DocumentSource::Arxiv {
                url: link.url.clone(),
            },
        ))
    }

    /// Search, then fetch every link in order. A failed paper is reported in
    /// its slot and does not stop the others.
    pub async fn search_and_fetch(
        &self,
        topic: &str,
        count: usize,
        sort: SortOrder,
    ) -> Result<Vec<FetchedPaper>> {
        let links = self.search(topic, count, sort).await?;
        let mut papers = Vec::with_capacity(links.len());
        for link in links {
            let document = self.fetch_and_extract(&link).await;
            if let Err(ref e) = document {
                warn!(url = link.url.as_str(), error = %e, "paper fetch failed");
            }
            papers.push(FetchedPaper { link, document });
        }
        Ok(papers)
    }
}
