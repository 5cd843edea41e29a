pub mod dataset;
pub mod keywords;
pub mod providers;
pub mod ranker;
pub mod text;
pub mod tfidf;

pub use keywords::TextRankExtractor;
pub use providers::{GeminiRanker, GenerativeRanker};
pub use ranker::{RankedMovie, SimilarityRanker};
pub use tfidf::TfidfVectorizer;
