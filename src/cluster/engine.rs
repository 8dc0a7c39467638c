// KeywordClusterer — the facade over embeddings, similarity, and HAC.
//
// Applied twice per pipeline run: a coarse pass with the topic threshold
// (pure semantic similarity) and a fine pass per topic with the page
// threshold (semantic averaged with token overlap). Higher thresholds
// demand more similarity to merge, so they produce more, smaller
// clusters.
//
// All methods are pure functions of their inputs plus the shared,
// append-only embedding cache; the only suspension point is the batched
// embedding call at the bottom.

use std::sync::Arc;

use anyhow::Result;
use tracing::debug;

use crate::embedding::cache::EmbeddingCache;
use crate::embedding::traits::Embedder;
use crate::similarity::{combined_matrix, cosine_matrix, token_jaccard_matrix, SimilarityMode};

use super::agglomerative::cluster_by_distance;
use super::graph::{self, HubClusterGraph};

pub struct KeywordClusterer {
    embedder: Arc<dyn Embedder>,
    cache: Arc<EmbeddingCache>,
}

impl KeywordClusterer {
    /// Clusterer with its own fresh cache — the usual one-per-pipeline-run
    /// arrangement.
    pub fn new(embedder: Arc<dyn Embedder>) -> Self {
        Self::with_cache(embedder, Arc::new(EmbeddingCache::new()))
    }

    /// Clusterer sharing a caller-owned cache, for orchestrators that run
    /// many clustering calls over overlapping keyword sets.
    pub fn with_cache(embedder: Arc<dyn Embedder>, cache: Arc<EmbeddingCache>) -> Self {
        Self { embedder, cache }
    }

    pub fn cache(&self) -> &Arc<EmbeddingCache> {
        &self.cache
    }

    /// Embeddings for a keyword list, in input order, via the cache.
    pub async fn embeddings(&self, keywords: &[String]) -> Result<Vec<Vec<f64>>> {
        self.cache.get_embeddings(self.embedder.as_ref(), keywords).await
    }

    /// The n×n similarity matrix a clustering call would be built on.
    pub async fn similarity_matrix(
        &self,
        keywords: &[String],
        mode: SimilarityMode,
    ) -> Result<Vec<Vec<f64>>> {
        let embeddings = self.embeddings(keywords).await?;
        let semantic = cosine_matrix(&embeddings);

        Ok(match mode {
            SimilarityMode::Semantic => semantic,
            SimilarityMode::Combined => {
                let lexical = token_jaccard_matrix(keywords);
                combined_matrix(&semantic, &lexical)
            }
        })
    }

    /// Partition keywords into clusters of indices.
    ///
    /// Every input index appears in exactly one cluster, or the call
    /// fails outright — there is no partial mode that drops keywords.
    /// Zero keywords yield no clusters; a single keyword yields `[[0]]`
    /// without touching the embedder.
    pub async fn cluster(
        &self,
        keywords: &[String],
        threshold: f64,
        mode: SimilarityMode,
    ) -> Result<Vec<Vec<usize>>> {
        if keywords.is_empty() {
            return Ok(Vec::new());
        }
        if keywords.len() == 1 {
            return Ok(vec![vec![0]]);
        }

        let similarity = self.similarity_matrix(keywords, mode).await?;

        // Degenerate input (all pairs equally similar) still clusters
        // deterministically; worth a trace when diagnosing odd output.
        if is_degenerate(&similarity) {
            debug!(
                n = keywords.len(),
                "All pairwise similarities identical; clustering proceeds on ties"
            );
        }

        let distance: Vec<Vec<f64>> = similarity
            .iter()
            .map(|row| row.iter().map(|s| 1.0 - s).collect())
            .collect();

        let clusters = cluster_by_distance(&distance, 1.0 - threshold);

        debug!(
            keywords = keywords.len(),
            clusters = clusters.len(),
            threshold,
            ?mode,
            "Clustered keywords"
        );

        Ok(clusters)
    }

    /// Build the hub-cluster graph for one topic.
    ///
    /// `page_groups` hold indices into `topic_keywords`; `pillar_index`
    /// must be in range. Sibling detection runs on semantic similarity of
    /// the spokes' representative keywords only.
    pub async fn build_graph(
        &self,
        topic_keywords: &[String],
        page_groups: &[Vec<usize>],
        pillar_index: usize,
        sibling_threshold: f64,
    ) -> Result<HubClusterGraph> {
        if topic_keywords.is_empty() {
            anyhow::bail!("Cannot build a hub-cluster graph from an empty topic");
        }
        if pillar_index >= topic_keywords.len() {
            anyhow::bail!(
                "Pillar index {pillar_index} out of range for {} topic keywords",
                topic_keywords.len()
            );
        }
        if let Some(&bad) = page_groups
            .iter()
            .flatten()
            .find(|&&member| member >= topic_keywords.len())
        {
            anyhow::bail!(
                "Page group member index {bad} out of range for {} topic keywords",
                topic_keywords.len()
            );
        }

        let similarity = self
            .similarity_matrix(topic_keywords, SimilarityMode::Semantic)
            .await?;

        Ok(graph::assemble(
            topic_keywords,
            page_groups,
            pillar_index,
            sibling_threshold,
            &similarity,
        ))
    }
}

/// True when every off-diagonal similarity is (bitwise) the same value.
fn is_degenerate(similarity: &[Vec<f64>]) -> bool {
    let mut first: Option<f64> = None;
    for (i, row) in similarity.iter().enumerate() {
        for (j, &value) in row.iter().enumerate() {
            if i == j {
                continue;
            }
            match first {
                None => first = Some(value),
                Some(seen) if seen != value => return false,
                Some(_) => {}
            }
        }
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_degenerate_uniform() {
        let sim = vec![
            vec![1.0, 0.3, 0.3],
            vec![0.3, 1.0, 0.3],
            vec![0.3, 0.3, 1.0],
        ];
        assert!(is_degenerate(&sim));
    }

    #[test]
    fn test_is_degenerate_varied() {
        let sim = vec![vec![1.0, 0.3], vec![0.4, 1.0]];
        assert!(!is_degenerate(&sim));
    }
}
