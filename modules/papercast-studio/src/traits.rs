// Seam between the pipeline and wherever papers come from.
//
// DocumentResolver is the production source (arXiv + PDF extraction);
// MockPaperSource in `testing` stands in for it without network or PDFs.

use async_trait::async_trait;

use papercast_common::{Document, PaperLink, SortOrder};
use papercast_sources::{DocumentResolver, Result};

#[async_trait]
pub trait PaperSource: Send + Sync {
    /// Extract text from PDF bytes the user supplied.
    async fn extract_from_upload(&self, file_name: &str, bytes: Vec<u8>) -> Result<Document>;

    /// Find up to `count` PDF links for a topic.
    async fn search(&self, topic: &str, count: usize, sort: SortOrder) -> Result<Vec<PaperLink>>;

    /// Download one paper and extract its text.
    async fn fetch_and_extract(&self, link: &PaperLink) -> Result<Document>;
}

#[async_trait]
impl PaperSource for DocumentResolver {
    async fn extract_from_upload(&self, file_name: &str, bytes: Vec<u8>) -> Result<Document> {
        DocumentResolver::extract_from_upload(self, file_name, bytes).await
    }

    async fn search(&self, topic: &str, count: usize, sort: SortOrder) -> Result<Vec<PaperLink>> {
        DocumentResolver::search(self, topic, count, sort).await
    }

    async fn fetch_and_extract(&self, link: &PaperLink) -> Result<Document> {
        DocumentResolver::fetch_and_extract(self, link).await
    }
}
