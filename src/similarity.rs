// Pairwise similarity matrices over keyword lists.
//
// Two independent notions of similarity feed the clusterer:
//
//   semantic — cosine similarity between sentence embeddings. Captures
//   paraphrase: "crm pricing" and "crm software cost" land near each
//   other despite sharing few tokens.
//
//   lexical — Jaccard similarity of lowercase whitespace token sets.
//   Captures literal phrase overlap, which matters for page-level SEO
//   where the target phrase itself is the asset.
//
// The combined mode averages the two. Pure semantic similarity
// over-merges keywords that share a topic but target different literal
// phrasings; pure lexical similarity misses paraphrases. The page-group
// pass uses the average, the topic pass uses semantic alone.
//
// Matrices are transient: O(n²) memory, recomputed per clustering call.
// Only the underlying embeddings are cached.

use std::collections::HashSet;

/// Which similarity matrix a clustering call should be built on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SimilarityMode {
    /// Cosine over embeddings only (topic-level clustering)
    Semantic,
    /// Elementwise average of cosine and token Jaccard (page-group clustering)
    Combined,
}

/// Cosine similarity between two embedding vectors.
///
/// Returns 0.0 to 1.0. Mismatched or empty vectors score 0.0, and
/// negative cosines are clamped to 0.0 — the embedding space treats
/// opposite directions as simply unrelated.
pub fn cosine_similarity(a: &[f64], b: &[f64]) -> f64 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    let dot: f64 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let mag_a: f64 = a.iter().map(|x| x * x).sum::<f64>().sqrt();
    let mag_b: f64 = b.iter().map(|x| x * x).sum::<f64>().sqrt();

    let denom = mag_a * mag_b;
    if denom < f64::EPSILON {
        0.0
    } else {
        (dot / denom).clamp(0.0, 1.0)
    }
}

/// n×n cosine similarity matrix for a batch of embeddings.
///
/// Symmetric, values in [0, 1], diagonal exactly 1.0 (self-similarity by
/// definition, even for a zero vector).
pub fn cosine_matrix(embeddings: &[Vec<f64>]) -> Vec<Vec<f64>> {
    let n = embeddings.len();
    let mut matrix = vec![vec![0.0; n]; n];

    for i in 0..n {
        matrix[i][i] = 1.0;
        for j in (i + 1)..n {
            let sim = cosine_similarity(&embeddings[i], &embeddings[j]);
            matrix[i][j] = sim;
            matrix[j][i] = sim;
        }
    }

    matrix
}

/// n×n token-overlap (Jaccard) matrix for a list of keywords.
///
/// Tokens are lowercase whitespace splits of the keyword as given — no
/// stemming, no stopword removal. If either token set is empty the pair
/// scores 0.0; the diagonal is 1.0 by convention even for empty strings.
pub fn token_jaccard_matrix(keywords: &[String]) -> Vec<Vec<f64>> {
    let n = keywords.len();
    let lowered: Vec<String> = keywords.iter().map(|kw| kw.to_lowercase()).collect();
    let token_sets: Vec<HashSet<&str>> = lowered
        .iter()
        .map(|kw| kw.split_whitespace().collect())
        .collect();

    let mut matrix = vec![vec![0.0; n]; n];
    for i in 0..n {
        matrix[i][i] = 1.0;
        for j in (i + 1)..n {
            let jaccard = jaccard(&token_sets[i], &token_sets[j]);
            matrix[i][j] = jaccard;
            matrix[j][i] = jaccard;
        }
    }

    matrix
}

/// Jaccard similarity of two token sets: |A∩B| / |A∪B|, 0.0 when the
/// union is empty.
pub fn jaccard(a: &HashSet<&str>, b: &HashSet<&str>) -> f64 {
    let union = a.union(b).count();
    if union == 0 {
        return 0.0;
    }
    let intersection = a.intersection(b).count();
    intersection as f64 / union as f64
}

/// Elementwise average of a semantic and a lexical similarity matrix.
/// Both inputs must be the same shape.
pub fn combined_matrix(semantic: &[Vec<f64>], lexical: &[Vec<f64>]) -> Vec<Vec<f64>> {
    semantic
        .iter()
        .zip(lexical.iter())
        .map(|(s_row, l_row)| {
            s_row
                .iter()
                .zip(l_row.iter())
                .map(|(s, l)| (s + l) / 2.0)
                .collect()
        })
        .collect()
}
