// Unit tests for the clustering engine and embedding cache, using a
// deterministic vocabulary embedder: each distinct token gets its own
// dimension, so cosine similarity reduces to exact token overlap and no
// model files are needed.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use anyhow::Result;
use async_trait::async_trait;

use keystone::cluster::engine::KeywordClusterer;
use keystone::cluster::graph::NodeKind;
use keystone::embedding::cache::EmbeddingCache;
use keystone::embedding::traits::Embedder;
use keystone::similarity::SimilarityMode;

const VOCAB_DIM: usize = 64;

/// Deterministic test embedder: one dimension per distinct token, counts
/// as weights. Records every batch it receives so tests can assert on
/// call patterns.
struct VocabEmbedder {
    vocab: Mutex<HashMap<String, usize>>,
    calls: Mutex<Vec<Vec<String>>>,
}

impl VocabEmbedder {
    fn new() -> Self {
        Self {
            vocab: Mutex::new(HashMap::new()),
            calls: Mutex::new(Vec::new()),
        }
    }

    fn batches(&self) -> Vec<Vec<String>> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl Embedder for VocabEmbedder {
    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f64>>> {
        self.calls.lock().unwrap().push(texts.to_vec());

        let mut vocab = self.vocab.lock().unwrap();
        let mut vectors = Vec::with_capacity(texts.len());
        for text in texts {
            let mut vector = vec![0.0; VOCAB_DIM];
            for token in text.to_lowercase().split_whitespace() {
                let next = vocab.len();
                let dim = *vocab.entry(token.to_string()).or_insert(next);
                assert!(dim < VOCAB_DIM, "test vocabulary overflow");
                vector[dim] += 1.0;
            }
            vectors.push(vector);
        }
        Ok(vectors)
    }
}

fn kws(words: &[&str]) -> Vec<String> {
    words.iter().map(|w| w.to_string()).collect()
}

fn clusterer() -> (KeywordClusterer, Arc<VocabEmbedder>) {
    let embedder = Arc::new(VocabEmbedder::new());
    (KeywordClusterer::new(embedder.clone()), embedder)
}

// ============================================================
// cluster — edge cases and invariants
// ============================================================

#[tokio::test]
async fn cluster_empty_input_yields_no_clusters() {
    let (clusterer, _) = clusterer();
    let clusters = clusterer
        .cluster(&[], 0.7, SimilarityMode::Semantic)
        .await
        .unwrap();
    assert!(clusters.is_empty());
}

#[tokio::test]
async fn cluster_single_keyword_is_singleton_without_embedding() {
    let (clusterer, embedder) = clusterer();
    let clusters = clusterer
        .cluster(&kws(&["best crm"]), 0.7, SimilarityMode::Semantic)
        .await
        .unwrap();
    assert_eq!(clusters, vec![vec![0]]);
    assert!(
        embedder.batches().is_empty(),
        "singleton input must not compute similarity"
    );
}

#[tokio::test]
async fn cluster_partition_invariant() {
    let (clusterer, _) = clusterer();
    let keywords = kws(&[
        "best seo tools",
        "top seo tools",
        "keyword research tools",
        "how to do keyword research",
        "link building strategies",
        "backlink checker tools",
    ]);

    for threshold in [0.2, 0.5, 0.8] {
        let clusters = clusterer
            .cluster(&keywords, threshold, SimilarityMode::Semantic)
            .await
            .unwrap();
        let mut all: Vec<usize> = clusters.into_iter().flatten().collect();
        all.sort_unstable();
        assert_eq!(
            all,
            (0..keywords.len()).collect::<Vec<_>>(),
            "every index exactly once at threshold {threshold}"
        );
    }
}

#[tokio::test]
async fn cluster_threshold_monotonicity() {
    let (clusterer, _) = clusterer();
    let keywords = kws(&[
        "best crm",
        "best crm software",
        "crm pricing",
        "crm pricing plans",
        "email marketing",
    ]);

    let mut prev = 0;
    for threshold in [0.1, 0.3, 0.5, 0.7, 0.9] {
        let count = clusterer
            .cluster(&keywords, threshold, SimilarityMode::Semantic)
            .await
            .unwrap()
            .len();
        assert!(
            count >= prev,
            "raising threshold to {threshold} shrank clusters {prev} -> {count}"
        );
        prev = count;
    }
}

#[tokio::test]
async fn cluster_deterministic_across_runs() {
    let (clusterer, _) = clusterer();
    let keywords = kws(&[
        "seo tools",
        "seo software",
        "keyword research",
        "keyword tools",
    ]);

    let first = clusterer
        .cluster(&keywords, 0.4, SimilarityMode::Combined)
        .await
        .unwrap();
    let second = clusterer
        .cluster(&keywords, 0.4, SimilarityMode::Combined)
        .await
        .unwrap();
    assert_eq!(first, second);
}

#[tokio::test]
async fn cluster_degenerate_input_still_partitions() {
    let (clusterer, _) = clusterer();
    // Fully disjoint token sets: every pairwise similarity is 0.0
    let keywords = kws(&["alpha", "bravo", "charlie", "delta"]);

    let tight = clusterer
        .cluster(&keywords, 0.9, SimilarityMode::Semantic)
        .await
        .unwrap();
    assert_eq!(tight.len(), 4, "dissimilar keywords stay singletons");

    let loose = clusterer
        .cluster(&keywords, 0.0, SimilarityMode::Semantic)
        .await
        .unwrap();
    assert_eq!(loose.len(), 1, "zero threshold merges everything");
}

#[tokio::test]
async fn combined_mode_separates_shared_topic_different_phrasing() {
    let (clusterer, _) = clusterer();
    // Semantically these all share "crm"; lexically the pairs differ.
    // The combined matrix must not exceed the semantic one off-pair.
    let keywords = kws(&["crm pricing", "crm cost", "crm tutorial"]);

    let semantic = clusterer
        .similarity_matrix(&keywords, SimilarityMode::Semantic)
        .await
        .unwrap();
    let combined = clusterer
        .similarity_matrix(&keywords, SimilarityMode::Combined)
        .await
        .unwrap();

    for i in 0..3 {
        for j in 0..3 {
            if i != j {
                assert!(combined[i][j] <= semantic[i][j] + 1e-12);
            }
        }
    }
}

// ============================================================
// Embedding cache
// ============================================================

#[tokio::test]
async fn cache_idempotent_and_batches_only_new_keywords() {
    let embedder = VocabEmbedder::new();
    let cache = EmbeddingCache::new();

    let first = cache
        .get_embeddings(&embedder, &kws(&["alpha term", "bravo term"]))
        .await
        .unwrap();
    let second = cache
        .get_embeddings(&embedder, &kws(&["alpha term", "bravo term", "charlie term"]))
        .await
        .unwrap();

    assert_eq!(first[0], second[0], "cached vector for 'alpha term' drifted");
    assert_eq!(first[1], second[1], "cached vector for 'bravo term' drifted");

    let batches = embedder.batches();
    assert_eq!(batches.len(), 2);
    assert_eq!(batches[0], kws(&["alpha term", "bravo term"]));
    assert_eq!(
        batches[1],
        kws(&["charlie term"]),
        "second call must embed only the uncached keyword"
    );
}

#[tokio::test]
async fn cache_preserves_order_and_duplicates() {
    let embedder = VocabEmbedder::new();
    let cache = EmbeddingCache::new();

    let keywords = kws(&["alpha", "bravo", "alpha"]);
    let vectors = cache.get_embeddings(&embedder, &keywords).await.unwrap();

    assert_eq!(vectors.len(), 3, "duplicates keep their rows");
    assert_eq!(vectors[0], vectors[2]);
    // The embedder saw each distinct string once
    assert_eq!(embedder.batches()[0], kws(&["alpha", "bravo"]));
}

#[tokio::test]
async fn cache_failure_is_all_or_nothing() {
    struct FailingEmbedder;

    #[async_trait]
    impl Embedder for FailingEmbedder {
        async fn embed_batch(&self, _texts: &[String]) -> Result<Vec<Vec<f64>>> {
            anyhow::bail!("embedding service unavailable")
        }
    }

    let cache = EmbeddingCache::new();
    let result = cache
        .get_embeddings(&FailingEmbedder, &kws(&["alpha", "bravo"]))
        .await;
    assert!(result.is_err());
    assert!(cache.is_empty(), "failed batch must not leave partial entries");
}

#[tokio::test]
async fn shared_cache_spans_clusterers() {
    let embedder = Arc::new(VocabEmbedder::new());
    let cache = Arc::new(EmbeddingCache::new());

    let a = KeywordClusterer::with_cache(embedder.clone(), cache.clone());
    let b = KeywordClusterer::with_cache(embedder.clone(), cache.clone());

    let keywords = kws(&["crm tools", "crm software"]);
    a.embeddings(&keywords).await.unwrap();
    b.embeddings(&keywords).await.unwrap();

    assert_eq!(embedder.batches().len(), 1, "second clusterer hit the cache");
}

// ============================================================
// build_graph — scenario and validation
// ============================================================

#[tokio::test]
async fn build_graph_hub_and_spokes_scenario() {
    let (clusterer, _) = clusterer();
    let keywords = kws(&["best crm", "crm software", "crm pricing", "crm for startups"]);
    let page_groups = vec![vec![0, 1], vec![2], vec![3]];

    // Strict sibling threshold: token-overlap cosine of the two spokes
    // ("crm pricing" vs "crm for startups") is well under 0.9
    let graph = clusterer
        .build_graph(&keywords, &page_groups, 0, 0.9)
        .await
        .unwrap();

    let hub = graph.hub().unwrap();
    assert_eq!(hub.id, 0);
    assert_eq!(hub.keyword, "best crm");

    let spokes: Vec<_> = graph.spokes().collect();
    assert_eq!(spokes.len(), 2);
    assert_eq!(spokes[0].keyword, "crm pricing");
    assert_eq!(spokes[1].keyword, "crm for startups");

    let hub_edges = graph
        .edges
        .iter()
        .filter(|e| e.source == 0 && matches!(e.kind, keystone::cluster::graph::EdgeKind::HubToSpoke))
        .count();
    assert_eq!(hub_edges, 2);
    assert_eq!(graph.sibling_edges().count(), 0);
}

#[tokio::test]
async fn build_graph_sibling_edges_above_threshold() {
    let (clusterer, _) = clusterer();
    let keywords = kws(&["best crm", "crm software", "crm pricing", "crm for startups"]);
    let page_groups = vec![vec![0, 1], vec![2], vec![3]];

    // Loose threshold: the spokes share the "crm" token, so one
    // bidirectional pair appears
    let graph = clusterer
        .build_graph(&keywords, &page_groups, 0, 0.3)
        .await
        .unwrap();

    let siblings: Vec<_> = graph.sibling_edges().collect();
    assert_eq!(siblings.len(), 2, "sibling edges come in pairs");
    assert_eq!(siblings[0].source, siblings[1].target);
    assert_eq!(siblings[0].target, siblings[1].source);
}

#[tokio::test]
async fn build_graph_rejects_out_of_range_pillar() {
    let (clusterer, _) = clusterer();
    let keywords = kws(&["a", "b", "c", "d"]);
    let err = clusterer
        .build_graph(&keywords, &[vec![0, 1, 2, 3]], 99, 0.9)
        .await
        .unwrap_err();
    assert!(err.to_string().contains("out of range"), "{err}");
}

#[tokio::test]
async fn build_graph_rejects_out_of_range_group_member() {
    let (clusterer, _) = clusterer();
    let keywords = kws(&["a", "b"]);
    let err = clusterer
        .build_graph(&keywords, &[vec![0], vec![7]], 0, 0.9)
        .await
        .unwrap_err();
    assert!(err.to_string().contains("out of range"), "{err}");
}

#[tokio::test]
async fn build_graph_rejects_empty_topic() {
    let (clusterer, _) = clusterer();
    let err = clusterer.build_graph(&[], &[], 0, 0.9).await.unwrap_err();
    assert!(err.to_string().contains("empty topic"), "{err}");
}

#[tokio::test]
async fn build_graph_node_kinds() {
    let (clusterer, _) = clusterer();
    let keywords = kws(&["hub keyword", "spoke keyword"]);
    let graph = clusterer
        .build_graph(&keywords, &[vec![0], vec![1]], 0, 0.99)
        .await
        .unwrap();

    assert_eq!(graph.nodes[0].kind, NodeKind::Hub);
    assert!(graph.nodes[1..].iter().all(|n| n.kind == NodeKind::Spoke));
}
