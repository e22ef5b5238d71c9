/// Result type alias for source operations.
pub type Result<T> = std::result::Result<T, SourceError>;

#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    #[error("Search topic is empty")]
    EmptyTopic,

    #[error("Paper count must be between 1 and {max}, got {count}")]
    InvalidCount { count: usize, max: usize },

    #[error("{0} is not a PDF file")]
    NotPdf(String),

    #[error("Could not read PDF {locator}: {reason}")]
    InvalidPdf { locator: String, reason: String },

    #[error("No extractable text in {0}")]
    NoExtractableText(String),

    #[error("HTTP {status} from {url}")]
    Http { status: u16, url: String },

    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Failed to parse arXiv feed: {0}")]
    Feed(#[from] feed_rs::parser::ParseFeedError),

    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),

    #[error("Scratch file error: {0}")]
    Io(#[from] std::io::Error),
}

impl SourceError {
    /// Errors caused by what the user supplied rather than by a remote service.
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            SourceError::EmptyTopic
                | SourceError::InvalidCount { .. }
                | SourceError::NotPdf(_)
                | SourceError::InvalidPdf { .. }
                | SourceError::NoExtractableText(_)
        )
    }
}
