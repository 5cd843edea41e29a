use crate::models::Corpus;
use crate::services::keywords::TextRankExtractor;
use crate::services::tfidf::{cosine_similarity, SparseVector, TfidfVectorizer};

/// A corpus row paired with its similarity score.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RankedMovie {
    pub id: usize,
    pub score: f32,
}

/// Ranks corpus rows against free-text queries by cosine similarity.
///
/// Holds the fitted vector space and the per-movie matrix; built once at
/// startup and shared read-only across requests.
#[derive(Debug, Clone)]
pub struct SimilarityRanker {
    vectorizer: TfidfVectorizer,
    matrix: Vec<SparseVector>,
    extractor: TextRankExtractor,
}

impl SimilarityRanker {
    /// Fits the vector space over the corpus soup text.
    pub fn fit(corpus: &Corpus) -> Self {
        let (vectorizer, matrix) = TfidfVectorizer::fit(&corpus.soups());

        tracing::info!(
            movies = matrix.len(),
            terms = vectorizer.vocabulary_len(),
            "TF-IDF matrix fitted"
        );

        Self {
            vectorizer,
            matrix,
            extractor: TextRankExtractor::new(),
        }
    }

    /// Returns the top `count` rows by descending similarity, plus the search
    /// string actually used (extracted keywords or the raw query).
    ///
    /// Ties keep original corpus order; `count` beyond the corpus size
    /// returns every row.
    pub fn rank(&self, query: &str, count: usize) -> (Vec<RankedMovie>, String) {
        let search_query = self.extractor.extract(query);
        if search_query != query {
            tracing::debug!(keywords = %search_query, "Searching with extracted keywords");
        }

        let query_vector = self.vectorizer.transform(&search_query);

        let mut ranked: Vec<RankedMovie> = self
            .matrix
            .iter()
            .enumerate()
            .map(|(id, vector)| RankedMovie {
                id,
                score: cosine_similarity(&query_vector, vector),
            })
            .collect();

        // Stable sort: equal scores keep corpus order.
        ranked.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        ranked.truncate(count);

        (ranked, search_query)
    }
}
