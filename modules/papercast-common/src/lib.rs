pub mod config;
pub mod error;
pub mod types;

pub use config::{AppConfig, LlmProvider};
pub use error::{PapercastError, Result};
pub use types::*;
