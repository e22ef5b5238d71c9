// Test mocks for the studio pipeline.
//
// One mock per trait boundary:
// - MockGenerator (TextGenerator): prompt-substring rules, records requests
// - MockSpeech (SpeechSynthesizer): echoes text as bytes, records inputs
// - MockPaperSource (PaperSource): canned search results and paper texts

use std::collections::HashMap;
use std::sync::Mutex;

use ai_client::{AiError, GenerationRequest, SpeechSynthesizer, TextGenerator};
use async_trait::async_trait;
use bytes::Bytes;

use papercast_common::{Document, DocumentSource, PaperLink, SortOrder};
use papercast_sources::{Result as SourceResult, SourceError};

use crate::traits::PaperSource;

// ---------------------------------------------------------------------------
// MockGenerator
// ---------------------------------------------------------------------------

enum Reply {
    Text(String),
    Fail(u16),
}

const DEFAULT_REPLY: &str = "Mock answer.";

/// Answers each prompt from the first rule whose needle it contains,
/// otherwise with a fixed default. Builder: `.on_prompt()`, `.fail_on()`.
pub struct MockGenerator {
    rules: Vec<(String, Reply)>,
    requests: Mutex<Vec<GenerationRequest>>,
}

impl MockGenerator {
    pub fn new() -> Self {
        Self {
            rules: Vec::new(),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn on_prompt(mut self, needle: &str, reply: &str) -> Self {
        self.rules
            .push((needle.to_string(), Reply::Text(reply.to_string())));
        self
    }

    /// Respond with an API error of `status` to prompts containing `needle`.
    pub fn fail_on(mut self, needle: &str, status: u16) -> Self {
        self.rules.push((needle.to_string(), Reply::Fail(status)));
        self
    }

    pub fn requests(&self) -> Vec<GenerationRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn prompts(&self) -> Vec<String> {
        self.requests().into_iter().map(|r| r.prompt).collect()
    }
}

impl Default for MockGenerator {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TextGenerator for MockGenerator {
    fn model(&self) -> &str {
        "mock-model"
    }

    async fn generate(&self, request: &GenerationRequest) -> ai_client::Result<Vec<String>> {
        self.requests.lock().unwrap().push(request.clone());
        let reply = self
            .rules
            .iter()
            .find(|(needle, _)| request.prompt.contains(needle.as_str()))
            .map(|(_, reply)| reply);
        match reply {
            Some(Reply::Text(text)) => Ok(vec![text.clone()]),
            Some(Reply::Fail(status)) => Err(AiError::Api {
                provider: "mock",
                status: *status,
                body: "mock failure".to_string(),
            }),
            None => Ok(vec![DEFAULT_REPLY.to_string()]),
        }
    }
}

// ---------------------------------------------------------------------------
// MockSpeech
// ---------------------------------------------------------------------------

/// Renders each input as `<text>` bytes so tests can see chunk order.
pub struct MockSpeech {
    max_input_chars: usize,
    failure: Option<u16>,
    inputs: Mutex<Vec<String>>,
}

impl MockSpeech {
    pub fn new() -> Self {
        Self {
            max_input_chars: 4096,
            failure: None,
            inputs: Mutex::new(Vec::new()),
        }
    }

    pub fn max_input_chars(mut self, max: usize) -> Self {
        self.max_input_chars = max;
        self
    }

    pub fn failing(mut self, status: u16) -> Self {
        self.failure = Some(status);
        self
    }

    pub fn inputs(&self) -> Vec<String> {
        self.inputs.lock().unwrap().clone()
    }
}

impl Default for MockSpeech {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SpeechSynthesizer for MockSpeech {
    fn max_input_chars(&self) -> usize {
        self.max_input_chars
    }

    async fn synthesize(&self, text: &str) -> ai_client::Result<Bytes> {
        self.inputs.lock().unwrap().push(text.to_string());
        if let Some(status) = self.failure {
            return Err(AiError::Api {
                provider: "mock-speech",
                status,
                body: "mock failure".to_string(),
            });
        }
        Ok(Bytes::from(format!("<{text}>")))
    }
}

// ---------------------------------------------------------------------------
// MockPaperSource
// ---------------------------------------------------------------------------

enum Canned {
    Text(String),
    HttpStatus(u16),
    NoText,
    NotPdf,
}

impl Canned {
    fn resolve(&self, locator: &str, source: DocumentSource) -> SourceResult<Document> {
        match self {
            Canned::Text(text) => Ok(Document::new(text.clone(), source)),
            Canned::HttpStatus(status) => Err(SourceError::Http {
                status: *status,
                url: locator.to_string(),
            }),
            Canned::NoText => Err(SourceError::NoExtractableText(locator.to_string())),
            Canned::NotPdf => Err(SourceError::NotPdf(locator.to_string())),
        }
    }
}

/// Canned arXiv results. Search returns registered papers in registration
/// order, capped at `count`. Builder: `.with_paper()`, `.with_failing_paper()`,
/// `.with_unreadable_paper()`, `.on_upload()`, `.on_scanned_upload()`.
pub struct MockPaperSource {
    links: Vec<PaperLink>,
    papers: HashMap<String, Canned>,
    uploads: HashMap<String, Canned>,
    search_failure: Option<u16>,
    searches: Mutex<Vec<(String, usize, SortOrder)>>,
    fetched: Mutex<Vec<String>>,
}

impl MockPaperSource {
    pub fn new() -> Self {
        Self {
            links: Vec::new(),
            papers: HashMap::new(),
            uploads: HashMap::new(),
            search_failure: None,
            searches: Mutex::new(Vec::new()),
            fetched: Mutex::new(Vec::new()),
        }
    }

    fn register(mut self, url: &str, title: Option<&str>, canned: Canned) -> Self {
        self.links.push(PaperLink {
            url: url.to_string(),
            title: title.map(str::to_string),
        });
        self.papers.insert(url.to_string(), canned);
        self
    }

    pub fn with_paper(self, url: &str, title: &str, text: &str) -> Self {
        self.register(url, Some(title), Canned::Text(text.to_string()))
    }

    /// A paper whose download answers with `status`.
    pub fn with_failing_paper(self, url: &str, status: u16) -> Self {
        self.register(url, None, Canned::HttpStatus(status))
    }

    /// A paper that downloads but has no extractable text.
    pub fn with_unreadable_paper(self, url: &str) -> Self {
        self.register(url, None, Canned::NoText)
    }

    pub fn failing_search(mut self, status: u16) -> Self {
        self.search_failure = Some(status);
        self
    }

    pub fn on_upload(mut self, file_name: &str, text: &str) -> Self {
        self.uploads
            .insert(file_name.to_string(), Canned::Text(text.to_string()));
        self
    }

    /// An upload that parses as a PDF but contains only images.
    pub fn on_scanned_upload(mut self, file_name: &str) -> Self {
        self.uploads.insert(file_name.to_string(), Canned::NoText);
        self
    }

    pub fn searches(&self) -> Vec<(String, usize, SortOrder)> {
        self.searches.lock().unwrap().clone()
    }

    pub fn fetched(&self) -> Vec<String> {
        self.fetched.lock().unwrap().clone()
    }
}

impl Default for MockPaperSource {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PaperSource for MockPaperSource {
    async fn extract_from_upload(&self, file_name: &str, _bytes: Vec<u8>) -> SourceResult<Document> {
        let source = DocumentSource::Upload {
            file_name: file_name.to_string(),
        };
        self.uploads
            .get(file_name)
            .unwrap_or(&Canned::NotPdf)
            .resolve(file_name, source)
    }

    async fn search(&self, topic: &str, count: usize, sort: SortOrder) -> SourceResult<Vec<PaperLink>> {
        self.searches
            .lock()
            .unwrap()
            .push((topic.to_string(), count, sort));
        if topic.trim().is_empty() {
            return Err(SourceError::EmptyTopic);
        }
        if let Some(status) = self.search_failure {
            return Err(SourceError::Http {
                status,
                url: "mock://arxiv".to_string(),
            });
        }
        Ok(self.links.iter().take(count).cloned().collect())
    }

    async fn fetch_and_extract(&self, link: &PaperLink) -> SourceResult<Document> {
        self.fetched.lock().unwrap().push(link.url.clone());
        let source = DocumentSource::Arxiv {
            url: link.url.clone(),
        };
        match self.papers.get(&link.url) {
            Some(canned) => canned.resolve(&link.url, source),
            None => Err(SourceError::Http {
                status: 404,
                url: link.url.clone(),
            }),
        }
    }
}
