use std::sync::Arc;

use crate::error::{AppError, AppResult};
use crate::models::Corpus;
use crate::services::{GenerativeRanker, SimilarityRanker};

/// Everything the ranking endpoints need: the loaded corpus and the fitted
/// index. Constructed once at startup and never mutated, so it is shared
/// without locks.
pub struct RecommenderContext {
    pub corpus: Corpus,
    pub ranker: SimilarityRanker,
}

impl RecommenderContext {
    /// Fits the vector space over the corpus.
    pub fn new(corpus: Corpus) -> Self {
        let ranker = SimilarityRanker::fit(&corpus);
        Self { corpus, ranker }
    }
}

/// Shared application state
///
/// The context is absent when the dataset could not be loaded at startup;
/// ranking requests then fail with a service-unavailable error until the
/// dataset is fixed.
#[derive(Clone)]
pub struct AppState {
    context: Option<Arc<RecommenderContext>>,
    generative: Arc<dyn GenerativeRanker>,
}

impl AppState {
    pub fn new(
        context: Option<RecommenderContext>,
        generative: Arc<dyn GenerativeRanker>,
    ) -> Self {
        Self {
            context: context.map(Arc::new),
            generative,
        }
    }

    /// The recommender context, or a service-unavailable error when the
    /// dataset failed to load at startup.
    pub fn context(&self) -> AppResult<&RecommenderContext> {
        self.context.as_deref().ok_or_else(|| {
            AppError::NotReady("Recommender could not be loaded at startup".to_string())
        })
    }

    pub fn generative(&self) -> &dyn GenerativeRanker {
        self.generative.as_ref()
    }
}
