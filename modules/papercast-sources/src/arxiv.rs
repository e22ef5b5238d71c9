// arXiv query API client.
// GET {base}?search_query=all:{topic}&sortBy={order}&max_results={count}
// The response is an Atom feed; only entry links typed application/pdf matter.

use papercast_common::{PaperLink, SortOrder};
use tracing::info;
use url::Url;

use crate::error::{Result, SourceError};

/// Upper bound on papers per search.
pub const MAX_RESULTS: usize = 50;

const PDF_MEDIA_TYPE: &str = "application/pdf";

pub struct ArxivClient {
    http: reqwest::Client,
    base_url: String,
}

impl ArxivClient {
    pub fn new(http: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            http,
            base_url: base_url.into(),
        }
    }

    /// Build the query URL, rejecting empty topics and out-of-range counts.
    pub fn query_url(&self, topic: &str, count: usize, sort: SortOrder) -> Result<Url> {
        let topic = topic.trim();
        if topic.is_empty() {
            return Err(SourceError::EmptyTopic);
        }
        if count == 0 || count > MAX_RESULTS {
            return Err(SourceError::InvalidCount {
                count,
                max: MAX_RESULTS,
            });
        }

        let mut url = Url::parse(&self.base_url)?;
        url.query_pairs_mut()
            .append_pair("search_query", &format!("all:{topic}"))
            .append_pair("sortBy", sort.as_str())
            .append_pair("max_results", &count.to_string());
        Ok(url)
    }

    /// Search arXiv and return up to `count` PDF links in feed order.
    /// An empty list means nothing matched; it is not an error.
    pub async fn search(&self, topic: &str, count: usize, sort: SortOrder) -> Result<Vec<PaperLink>> {
        let url = self.query_url(topic, count, sort)?;

        info!(topic, count, sort = %sort, "arxiv: querying");

        let resp = self
            .http
            .get(url.clone())
            .header("User-Agent", "papercast/0.1")
            .send()
            .await?;

        if !resp.status().is_success() {
            return Err(SourceError::Http {
                status: resp.status().as_u16(),
                url: url.to_string(),
            });
        }

        let bytes = resp.bytes().await?;
        let links = parse_pdf_links(&bytes, count)?;

        info!(topic, found = links.len(), "arxiv: search complete");
        Ok(links)
    }
}

/// Collect `application/pdf` entry links from an Atom feed, in document order,
/// stopping after `count`.
pub fn parse_pdf_links(feed_xml: &[u8], count: usize) -> Result<Vec<PaperLink>> {
    let feed = feed_rs::parser::parse(feed_xml)?;

    let links = feed
        .entries
        .into_iter()
        .flat_map(|entry| {
            let title = entry
                .title
                .map(|t| t.content.split_whitespace().collect::<Vec<_>>().join(" "));
            entry
                .links
                .into_iter()
                .filter(|link| link.media_type.as_deref() == Some(PDF_MEDIA_TYPE))
                .map(move |link| PaperLink {
                    url: link.href,
                    title: title.clone(),
                })
        })
        .take(count)
        .collect();

    Ok(links)
}
