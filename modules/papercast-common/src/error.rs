use thiserror::Error;

use crate::types::Stage;

pub type Result<T> = std::result::Result<T, PapercastError>;

#[derive(Error, Debug)]
pub enum PapercastError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("No extractable text in {0} (scanned or image-only PDF?)")]
    NoExtractableText(String),

    #[error("{stage} failed: {message}")]
    Stage { stage: Stage, message: String },

    #[error("All {failed} papers failed; nothing to synthesize")]
    AllPapersFailed { failed: usize },

    #[error("Configuration error: {0}")]
    Config(String),
}

impl PapercastError {
    /// Build a stage-scoped error from any displayable cause, keeping its chain.
    pub fn stage(stage: Stage, cause: impl std::fmt::Display) -> Self {
        PapercastError::Stage {
            stage,
            message: format!("{cause:#}"),
        }
    }

    /// Problems the user can fix by changing what they supplied.
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            PapercastError::InvalidInput(_) | PapercastError::NoExtractableText(_)
        )
    }
}
