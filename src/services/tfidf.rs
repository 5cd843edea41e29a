use std::collections::HashMap;

use crate::services::text::{is_stop_word, tokenize};

/// Sparse L2-normalized term-weight vector, entries sorted by column index.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SparseVector {
    entries: Vec<(u32, f32)>,
}

impl SparseVector {
    fn from_weights(mut entries: Vec<(u32, f32)>) -> Self {
        entries.sort_unstable_by_key(|&(col, _)| col);

        let norm = entries
            .iter()
            .map(|&(_, w)| w * w)
            .sum::<f32>()
            .sqrt();
        if norm > 0.0 {
            for entry in &mut entries {
                entry.1 /= norm;
            }
        }

        Self { entries }
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Dot product over the shared columns of two sorted sparse vectors.
    pub fn dot(&self, other: &SparseVector) -> f32 {
        let mut sum = 0.0;
        let (mut i, mut j) = (0, 0);

        while i < self.entries.len() && j < other.entries.len() {
            let (col_a, weight_a) = self.entries[i];
            let (col_b, weight_b) = other.entries[j];
            match col_a.cmp(&col_b) {
                std::cmp::Ordering::Less => i += 1,
                std::cmp::Ordering::Greater => j += 1,
                std::cmp::Ordering::Equal => {
                    sum += weight_a * weight_b;
                    i += 1;
                    j += 1;
                }
            }
        }

        sum
    }
}

/// Cosine similarity between two L2-normalized vectors, clamped to [0, 1].
pub fn cosine_similarity(a: &SparseVector, b: &SparseVector) -> f32 {
    a.dot(b).clamp(0.0, 1.0)
}

/// Term-frequency/inverse-document-frequency vectorizer.
///
/// Fitted exactly once over the corpus and read-only afterward. The
/// vocabulary maps each term to a column, IDF weights use the smoothed form
/// `ln((1 + n) / (1 + df)) + 1`, and every produced vector is L2-normalized
/// so cosine similarity reduces to a dot product. Terms absent from the
/// fitted vocabulary contribute zero weight at transform time.
#[derive(Debug, Clone)]
pub struct TfidfVectorizer {
    vocabulary: HashMap<String, u32>,
    idf: Vec<f32>,
}

impl TfidfVectorizer {
    /// Fits the vocabulary and IDF weights over `documents` and returns the
    /// vectorizer together with the fitted document matrix.
    pub fn fit(documents: &[String]) -> (Self, Vec<SparseVector>) {
        let tokenized: Vec<Vec<String>> = documents
            .iter()
            .map(|doc| {
                tokenize(doc)
                    .into_iter()
                    .filter(|token| !is_stop_word(token))
                    .collect()
            })
            .collect();

        let mut document_frequencies: HashMap<&str, u32> = HashMap::new();
        for tokens in &tokenized {
            let mut seen: Vec<&str> = tokens.iter().map(String::as_str).collect();
            seen.sort_unstable();
            seen.dedup();
            for term in seen {
                *document_frequencies.entry(term).or_insert(0) += 1;
            }
        }

        // Columns in sorted term order, independent of hash iteration.
        let mut terms: Vec<&str> = document_frequencies.keys().copied().collect();
        terms.sort_unstable();

        let total_documents = documents.len() as f32;
        let mut vocabulary = HashMap::with_capacity(terms.len());
        let mut idf = Vec::with_capacity(terms.len());
        for (col, term) in terms.into_iter().enumerate() {
            let df = document_frequencies[term] as f32;
            vocabulary.insert(term.to_string(), col as u32);
            idf.push(((1.0 + total_documents) / (1.0 + df)).ln() + 1.0);
        }

        let vectorizer = Self { vocabulary, idf };
        let matrix = tokenized
            .iter()
            .map(|tokens| vectorizer.vectorize(tokens))
            .collect();

        (vectorizer, matrix)
    }

    /// Projects arbitrary new text into the fitted vector space.
    pub fn transform(&self, text: &str) -> SparseVector {
        let tokens: Vec<String> = tokenize(text)
            .into_iter()
            .filter(|token| !is_stop_word(token))
            .collect();
        self.vectorize(&tokens)
    }

    pub fn vocabulary_len(&self) -> usize {
        self.vocabulary.len()
    }

    fn vectorize(&self, tokens: &[String]) -> SparseVector {
        let mut counts: HashMap<u32, f32> = HashMap::new();
        for token in tokens {
            if let Some(&col) = self.vocabulary.get(token.as_str()) {
                *counts.entry(col).or_insert(0.0) += 1.0;
            }
        }

        let weights = counts
            .into_iter()
            .map(|(col, count)| (col, count * self.idf[col as usize]))
            .collect();

        SparseVector::from_weights(weights)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn docs(texts: &[&str]) -> Vec<String> {
        texts.iter().map(|t| t.to_string()).collect()
    }

    #[test]
    fn test_fit_builds_one_vector_per_document() {
        let (vectorizer, matrix) = TfidfVectorizer::fit(&docs(&[
            "heist crew robs bank",
            "detective hunts killer",
        ]));

        assert_eq!(matrix.len(), 2);
        assert!(vectorizer.vocabulary_len() >= 6);
    }

    #[test]
    fn test_fitted_vectors_are_normalized() {
        let (_, matrix) = TfidfVectorizer::fit(&docs(&[
            "space crew explores distant planet",
            "crew mutiny aboard cargo ship",
        ]));

        for vector in &matrix {
            let norm: f32 = vector.entries.iter().map(|&(_, w)| w * w).sum::<f32>().sqrt();
            assert!((norm - 1.0).abs() < 1e-5);
        }
    }

    #[test]
    fn test_rarer_terms_weigh_more() {
        let (vectorizer, _) = TfidfVectorizer::fit(&docs(&[
            "shark attack beach",
            "shark cage diving",
            "haunted mansion ghosts",
        ]));

        // "shark" appears in two documents, "haunted" in one; equal term
        // counts, so the rarer term dominates its vector.
        let vector = vectorizer.transform("shark haunted");
        let shark_col = vectorizer.vocabulary["shark"];
        let haunted_col = vectorizer.vocabulary["haunted"];

        let weight = |col: u32| {
            vector
                .entries
                .iter()
                .find(|&&(c, _)| c == col)
                .map(|&(_, w)| w)
                .unwrap()
        };
        assert!(weight(haunted_col) > weight(shark_col));
    }

    #[test]
    fn test_out_of_vocabulary_transform_is_empty() {
        let (vectorizer, _) = TfidfVectorizer::fit(&docs(&["western gunslinger duel"]));
        let vector = vectorizer.transform("submarine xylophone");
        assert!(vector.is_empty());
    }

    #[test]
    fn test_stop_words_are_ignored() {
        let (vectorizer, _) = TfidfVectorizer::fit(&docs(&["the heist of the century"]));
        assert!(!vectorizer.vocabulary.contains_key("the"));
        assert!(!vectorizer.vocabulary.contains_key("of"));
        assert!(vectorizer.vocabulary.contains_key("heist"));
    }

    #[test]
    fn test_cosine_similarity_bounds_and_identity() {
        let (vectorizer, matrix) = TfidfVectorizer::fit(&docs(&[
            "vampire hunter stalks the night",
            "romantic comedy in paris",
        ]));

        let query = vectorizer.transform("vampire hunter night");
        let same = cosine_similarity(&query, &query);
        assert!((same - 1.0).abs() < 1e-5);

        for vector in &matrix {
            let score = cosine_similarity(&query, vector);
            assert!((0.0..=1.0).contains(&score));
        }

        assert!(cosine_similarity(&query, &matrix[0]) > cosine_similarity(&query, &matrix[1]));
    }

    #[test]
    fn test_transform_is_deterministic() {
        let (vectorizer, _) = TfidfVectorizer::fit(&docs(&[
            "pirate ship treasure island",
            "treasure map leads pirates astray",
        ]));

        assert_eq!(
            vectorizer.transform("pirate treasure"),
            vectorizer.transform("pirate treasure")
        );
    }
}
