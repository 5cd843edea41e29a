use std::collections::HashMap;

use crate::services::text::{is_stop_word, tokenize};

const DAMPING: f32 = 0.85;
const CONVERGENCE_THRESHOLD: f32 = 1e-4;
const MAX_ITERATIONS: usize = 100;

/// Minimum number of extracted words for the result to be worth searching
/// with; anything shorter falls back to the raw query.
const MIN_KEYWORD_COUNT: usize = 3;

/// Graph-based keyword extractor in the TextRank family.
///
/// Content words become graph nodes, co-occurrence within a sliding window
/// becomes edges, and a PageRank iteration scores the nodes. The top third of
/// nodes by score is returned as a space-joined string.
///
/// Short queries are usually already keyword-dense, so extraction degrades
/// gracefully: whenever it yields fewer than [`MIN_KEYWORD_COUNT`] words the
/// raw input is returned unchanged. Extraction never errors.
#[derive(Debug, Clone, Default)]
pub struct TextRankExtractor;

impl TextRankExtractor {
    pub fn new() -> Self {
        Self
    }

    /// Reduces free text to its most salient terms, or returns the input
    /// unchanged when extraction yields too little.
    pub fn extract(&self, text: &str) -> String {
        match self.try_extract(text) {
            Some(keywords) if keywords.split_whitespace().count() >= MIN_KEYWORD_COUNT => keywords,
            _ => {
                tracing::debug!("Keyword extraction too short, searching with raw input");
                text.to_string()
            }
        }
    }

    fn try_extract(&self, text: &str) -> Option<String> {
        let words: Vec<String> = tokenize(text)
            .into_iter()
            .filter(|token| !is_stop_word(token))
            .collect();

        if words.is_empty() {
            return None;
        }

        // Node ids in first-occurrence order keep the whole pipeline
        // deterministic.
        let mut node_ids: HashMap<&str, usize> = HashMap::new();
        let mut node_words: Vec<&str> = Vec::new();
        for word in &words {
            if !node_ids.contains_key(word.as_str()) {
                node_ids.insert(word, node_words.len());
                node_words.push(word);
            }
        }

        let adjacency = build_cooccurrence_graph(&words, &node_ids);
        let scores = page_rank(&adjacency);

        let mut ranked: Vec<(usize, f32)> = scores.into_iter().enumerate().collect();
        ranked.sort_by(|a, b| {
            b.1.partial_cmp(&a.1)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then(a.0.cmp(&b.0))
        });

        let keep = (node_words.len() / 3).max(1);
        let keywords: Vec<&str> = ranked
            .into_iter()
            .take(keep)
            .map(|(id, _)| node_words[id])
            .collect();

        Some(keywords.join(" "))
    }
}

/// Undirected co-occurrence edges between content words within a window of
/// two, as index adjacency lists. Neighbor lists are deduplicated and sorted.
fn build_cooccurrence_graph(words: &[String], node_ids: &HashMap<&str, usize>) -> Vec<Vec<usize>> {
    let mut adjacency: Vec<Vec<usize>> = vec![Vec::new(); node_ids.len()];

    for pair in words.windows(2) {
        let a = node_ids[pair[0].as_str()];
        let b = node_ids[pair[1].as_str()];
        if a != b {
            adjacency[a].push(b);
            adjacency[b].push(a);
        }
    }

    for neighbors in &mut adjacency {
        neighbors.sort_unstable();
        neighbors.dedup();
    }

    adjacency
}

fn page_rank(adjacency: &[Vec<usize>]) -> Vec<f32> {
    let n = adjacency.len();
    let mut scores = vec![1.0f32; n];

    for _ in 0..MAX_ITERATIONS {
        let mut next = vec![1.0 - DAMPING; n];
        for (node, neighbors) in adjacency.iter().enumerate() {
            if neighbors.is_empty() {
                continue;
            }
            let share = DAMPING * scores[node] / neighbors.len() as f32;
            for &neighbor in neighbors {
                next[neighbor] += share;
            }
        }

        let max_delta = scores
            .iter()
            .zip(&next)
            .map(|(old, new)| (old - new).abs())
            .fold(0.0f32, f32::max);

        scores = next;
        if max_delta < CONVERGENCE_THRESHOLD {
            break;
        }
    }

    scores
}
