/// Generative ranking provider abstraction
///
/// The LLM-backed ranking path is a boundary concern: the provider receives
/// the corpus and the user's request, and returns relevance-ordered row
/// identifiers. Keeping it behind a trait keeps the HTTP layer independent of
/// any one vendor API.
use crate::{error::AppResult, models::Corpus};

pub mod gemini;

pub use gemini::GeminiRanker;

/// Trait for generative ranking providers
#[async_trait::async_trait]
pub trait GenerativeRanker: Send + Sync {
    /// Ask the model for the `count` most relevant corpus rows, best first.
    ///
    /// Returned identifiers are validated against the corpus; unknown ones
    /// are dropped rather than surfaced.
    async fn rank(&self, corpus: &Corpus, request: &str, count: usize) -> AppResult<Vec<usize>>;

    /// Provider name for logging and debugging
    fn name(&self) -> &'static str;
}
