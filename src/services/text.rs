/// Fixed English stop-word list shared by the vectorizer and the keyword
/// extractor. Matching is done on lowercased tokens.
pub const STOP_WORDS: &[&str] = &[
    "a", "about", "above", "after", "again", "against", "all", "also", "am", "an", "and", "any",
    "are", "as", "at", "back", "be", "because", "been", "before", "being", "below", "between",
    "both", "but", "by", "can", "cannot", "could", "did", "do", "does", "doing", "down", "during",
    "each", "even", "few", "for", "from", "further", "get", "give", "go", "had", "has", "have",
    "having", "he", "her", "here", "hers", "herself", "him", "himself", "his", "how", "i", "if",
    "in", "into", "is", "it", "its", "itself", "just", "know", "like", "look", "make", "may",
    "me", "might", "more", "most", "must", "my", "myself", "new", "no", "nor", "not", "now", "of",
    "off", "on", "once", "only", "or", "other", "ought", "our", "ours", "ourselves", "out",
    "over", "own", "said", "same", "say", "see", "shall", "she", "should", "so", "some", "such",
    "take", "than", "that", "the", "their", "theirs", "them", "themselves", "then", "there",
    "these", "they", "think", "this", "those", "through", "time", "to", "too", "under", "until",
    "up", "us", "use", "used", "very", "want", "was", "way", "we", "well", "were", "what", "when",
    "where", "which", "while", "who", "whom", "why", "will", "with", "would", "you", "your",
    "yours", "yourself", "yourselves",
];

/// Splits text into lowercase alphanumeric tokens of at least two characters.
///
/// Stop words are kept; callers that need content words filter with
/// [`is_stop_word`].
pub fn tokenize(text: &str) -> Vec<String> {
    text.to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|token| token.len() >= 2)
        .map(|token| token.to_string())
        .collect()
}

pub fn is_stop_word(token: &str) -> bool {
    STOP_WORDS.contains(&token)
}
