pub mod claude;
pub mod error;
pub mod openai;
pub mod traits;
pub mod util;

pub use claude::Claude;
pub use error::{AiError, Result};
pub use openai::{OpenAi, OpenAiSpeech};
pub use traits::{GenerationRequest, SpeechSynthesizer, TextGenerator};
pub use util::{first_candidate, truncate_chars};
