// Keyword normalization and deduplication.
//
// Expansion sources return the same phrase in many surface forms —
// different casing, stray whitespace, trailing punctuation. Normalizing
// before scoring keeps the embedding cache from filling with near-equal
// keys and keeps duplicate rows out of the clusterer.
//
// Normalization is deliberately shallow: lowercase, collapse whitespace,
// trim edge punctuation. No stemming or lemmatization — "crm tools" and
// "crm tool" stay distinct and the similarity engine is left to decide
// how close they are.

use std::collections::HashSet;

use stop_words::{get, LANGUAGE};

/// Normalize a keyword to its canonical form: lowercase, single spaces,
/// edge punctuation trimmed from each token.
pub fn normalize(keyword: &str) -> String {
    keyword
        .to_lowercase()
        .split_whitespace()
        .map(|token| token.trim_matches(|c: char| !c.is_alphanumeric()))
        .filter(|token| !token.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Token set of the normalized keyword, for overlap analysis.
pub fn tokens(keyword: &str) -> HashSet<String> {
    normalize(keyword).split_whitespace().map(String::from).collect()
}

/// Strip leading and trailing English stopwords, keeping interior ones.
/// "the best crm for startups" → "best crm for startups". Returns the
/// input normalized unchanged if stripping would leave nothing.
pub fn strip_edge_stopwords(keyword: &str) -> String {
    let stopwords: HashSet<String> = get(LANGUAGE::English).into_iter().collect();

    let normalized = normalize(keyword);
    let mut words: Vec<&str> = normalized.split_whitespace().collect();

    while words.first().is_some_and(|w| stopwords.contains(*w)) {
        words.remove(0);
    }
    while words.last().is_some_and(|w| stopwords.contains(*w)) {
        words.pop();
    }

    if words.is_empty() {
        normalized
    } else {
        words.join(" ")
    }
}

/// Deduplicate keywords by normalized form, keeping the first surface
/// form seen for each. Input order is preserved.
pub fn deduplicate(keywords: &[String]) -> Vec<String> {
    let mut seen = HashSet::new();
    keywords
        .iter()
        .filter(|kw| seen.insert(normalize(kw)))
        .cloned()
        .collect()
}
