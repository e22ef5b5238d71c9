pub mod audio_store;
pub mod bootstrap;
pub mod classifier;
mod generate;
pub mod narrator;
pub mod report;
pub mod studio;
pub mod summarizer;
pub mod synthesizer;
#[cfg(any(test, feature = "test-support"))]
pub mod testing;
pub mod traits;

pub use audio_store::AudioStore;
pub use classifier::Classifier;
pub use narrator::Narrator;
pub use report::{PaperOutcome, PaperStatus, PendingUpload, TopicOutcome, TopicReport, UploadReport};
pub use studio::{NoProgress, Progress, Studio, StudioOptions};
pub use summarizer::Summarizer;
pub use synthesizer::Synthesizer;
pub use traits::PaperSource;
