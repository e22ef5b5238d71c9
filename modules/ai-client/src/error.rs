use thiserror::Error;

pub type Result<T> = std::result::Result<T, AiError>;

#[derive(Debug, Error)]
pub enum AiError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("{provider} API error ({status}): {body}")]
    Api {
        provider: &'static str,
        status: u16,
        body: String,
    },

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("No candidates in {0} response")]
    EmptyResponse(&'static str),
}

impl AiError {
    /// Whether the provider rejected the credential or quota.
    pub fn is_auth_or_quota(&self) -> bool {
        matches!(self, AiError::Api { status: 401 | 403 | 429, .. })
    }
}

impl From<reqwest::Error> for AiError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            AiError::Parse(e.to_string())
        } else {
            AiError::Network(e.to_string())
        }
    }
}

impl From<serde_json::Error> for AiError {
    fn from(e: serde_json::Error) -> Self {
        AiError::Parse(e.to_string())
    }
}

impl From<reqwest::header::InvalidHeaderValue> for AiError {
    fn from(e: reqwest::header::InvalidHeaderValue) -> Self {
        AiError::Config(format!("invalid header value: {e}"))
    }
}
