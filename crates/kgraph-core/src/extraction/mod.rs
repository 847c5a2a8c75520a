//! Text-to-graph extraction pipeline

mod model;
mod prompt;
mod service;

pub use model::{LanguageModel, RecordedResponse};
pub use prompt::{DEFAULT_SYSTEM_PROMPT, PromptTemplate};
pub use service::{ExtractionReport, KnowledgeExtractor};
