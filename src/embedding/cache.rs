// Growth-only embedding memo table.
//
// Embedding a batch of keywords is the expensive step of every clustering
// call, and the same keywords recur constantly: a topic's keywords are
// embedded once for topic clustering, again for page grouping, again for
// sibling detection. The cache makes every call after the first free.
//
// Keys are exact strings — case and whitespace as given. Normalization,
// if desired, is the caller's responsibility before entry. Entries are
// never updated or evicted; bounding the table is an external concern.

use std::collections::HashMap;
use std::sync::RwLock;

use anyhow::{Context, Result};
use tracing::debug;

use super::traits::Embedder;

/// Memoizing wrapper over an `Embedder`.
///
/// Owned explicitly by whoever runs the pipeline (usually one instance
/// per run, or a long-lived shared instance) rather than living as
/// process-wide state. Concurrent lookups and inserts of new keys are
/// safe; at worst two racing callers embed the same keyword twice, which
/// wastes work but cannot corrupt an entry.
pub struct EmbeddingCache {
    vectors: RwLock<HashMap<String, Vec<f64>>>,
}

impl EmbeddingCache {
    pub fn new() -> Self {
        Self {
            vectors: RwLock::new(HashMap::new()),
        }
    }

    /// Get embeddings for a list of keywords, one row per input in input
    /// order (duplicates get the same vector, not deduplicated away).
    ///
    /// Only keywords missing from the cache are sent to the embedder, in
    /// a single batched call. If that call fails, the whole request fails
    /// — clustering quality depends on comparable vectors for every
    /// member, so there is no partial-result mode.
    pub async fn get_embeddings(
        &self,
        embedder: &dyn Embedder,
        keywords: &[String],
    ) -> Result<Vec<Vec<f64>>> {
        if keywords.is_empty() {
            return Ok(Vec::new());
        }

        // Partition into cached and uncached, deduplicating the uncached
        // batch so the embedder sees each new string once.
        let uncached: Vec<String> = {
            let vectors = self
                .vectors
                .read()
                .map_err(|e| anyhow::anyhow!("Embedding cache lock poisoned: {e}"))?;

            let mut seen = std::collections::HashSet::new();
            keywords
                .iter()
                .filter(|kw| !vectors.contains_key(*kw) && seen.insert(kw.as_str()))
                .cloned()
                .collect()
        };

        if !uncached.is_empty() {
            let new_vectors = embedder
                .embed_batch(&uncached)
                .await
                .context("Batched embedding computation failed")?;

            if new_vectors.len() != uncached.len() {
                anyhow::bail!(
                    "Embedder returned {} vectors for {} keywords",
                    new_vectors.len(),
                    uncached.len()
                );
            }

            let mut vectors = self
                .vectors
                .write()
                .map_err(|e| anyhow::anyhow!("Embedding cache lock poisoned: {e}"))?;
            for (kw, vec) in uncached.iter().zip(new_vectors) {
                // First write wins if another caller raced us here
                vectors.entry(kw.clone()).or_insert(vec);
            }

            debug!(
                new = uncached.len(),
                total = vectors.len(),
                "Embedding cache populated"
            );
        }

        // Read the full ordered matrix back out of the now-complete cache.
        let vectors = self
            .vectors
            .read()
            .map_err(|e| anyhow::anyhow!("Embedding cache lock poisoned: {e}"))?;
        keywords
            .iter()
            .map(|kw| {
                vectors
                    .get(kw)
                    .cloned()
                    .with_context(|| format!("Embedding missing from cache for '{kw}'"))
            })
            .collect()
    }

    /// Number of distinct keywords currently cached.
    pub fn len(&self) -> usize {
        self.vectors.read().map(|v| v.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for EmbeddingCache {
    fn default() -> Self {
        Self::new()
    }
}
