// Embedder trait — the swap-ready abstraction.
//
// This trait defines the interface for turning keyword strings into dense
// vectors. The default implementation runs all-MiniLM-L6-v2 locally via
// ONNX; tests substitute deterministic stand-ins so no model files are
// ever needed to exercise the clustering pipeline.

use anyhow::Result;
use async_trait::async_trait;

/// Trait for computing sentence embeddings in batches. Implementations
/// are async because real providers either run inference off-thread or
/// call an external service.
///
/// Contract: the output has one vector per input, in input order, all of
/// the same length, and is deterministic for identical strings. A failure
/// covers the whole batch — no partial results.
#[async_trait]
pub trait Embedder: Send + Sync {
    /// Embed a batch of keyword strings.
    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f64>>>;
}

/// No-op embedder for wiring paths that never embed (e.g. plan assembly
/// over precomputed clusters). Fails loudly if actually called so nothing
/// silently clusters on fake vectors.
pub struct NoopEmbedder;

#[async_trait]
impl Embedder for NoopEmbedder {
    async fn embed_batch(&self, _texts: &[String]) -> Result<Vec<Vec<f64>>> {
        anyhow::bail!("NoopEmbedder should never be called — wire up a real embedder")
    }
}
