// Local sentence embeddings using all-MiniLM-L6-v2 over ONNX.
//
// Keywords are short phrases, so a sentence transformer is a good fit:
// "crm pricing" and "crm software cost" land near each other even though
// they share one token. The model runs locally via ONNX — no API calls,
// no rate limits — and token embeddings are mean-pooled under the
// attention mask, matching the model's training.

use std::path::Path;
use std::sync::{Arc, Mutex};

use anyhow::{Context, Result};
use async_trait::async_trait;
use ort::session::Session;
use ort::value::Tensor;
use tokenizers::Tokenizer;
use tracing::debug;

use super::traits::Embedder;

/// Embedding dimension for all-MiniLM-L6-v2.
pub const EMBEDDING_DIM: usize = 384;

/// Check whether both required model files exist in a directory.
pub fn model_files_present(dir: &Path) -> bool {
    dir.join("model.onnx").exists() && dir.join("tokenizer.json").exists()
}

/// Sentence embedder backed by a local ONNX session.
///
/// Session access is serialized behind a Mutex; the tokenizer is shared
/// via Arc so inference can run inside spawn_blocking without cloning it.
pub struct MiniLmEmbedder {
    session: Arc<Mutex<Session>>,
    tokenizer: Arc<Tokenizer>,
}

impl MiniLmEmbedder {
    /// Load the model and tokenizer from a directory containing
    /// `model.onnx` and `tokenizer.json`.
    pub fn load(model_dir: &Path) -> Result<Self> {
        if !model_files_present(model_dir) {
            anyhow::bail!(
                "Embedding model files not found in {}\n\
                 Expected model.onnx and tokenizer.json.",
                model_dir.display()
            );
        }

        let model_path = model_dir.join("model.onnx");
        let session = Session::builder()
            .context("Failed to create ONNX session builder")?
            .commit_from_file(&model_path)
            .with_context(|| format!("Failed to load embedding model from {}", model_path.display()))?;

        let tokenizer = Tokenizer::from_file(model_dir.join("tokenizer.json"))
            .map_err(|e| anyhow::anyhow!("Failed to load embedding tokenizer: {e}"))?;

        debug!("Loaded MiniLM embedding model from {}", model_dir.display());

        Ok(Self {
            session: Arc::new(Mutex::new(session)),
            tokenizer: Arc::new(tokenizer),
        })
    }
}

#[async_trait]
impl Embedder for MiniLmEmbedder {
    /// Embed a batch of keywords into 384-dimensional vectors.
    ///
    /// CPU-bound inference is offloaded to spawn_blocking so the async
    /// runtime stays responsive while a batch runs.
    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f64>>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        let session = Arc::clone(&self.session);
        let tokenizer = Arc::clone(&self.tokenizer);
        let texts = texts.to_vec();

        tokio::task::spawn_blocking(move || embed_sync(&session, &tokenizer, &texts))
            .await
            .context("spawn_blocking panicked")?
    }
}

/// Tokenized batch padded to a uniform length, flattened row-major for
/// the ONNX input tensors.
struct PaddedBatch {
    input_ids: Vec<i64>,
    attention_mask: Vec<i64>,
    token_type_ids: Vec<i64>,
    batch_size: usize,
    max_len: usize,
}

fn tokenize_batch(tokenizer: &Tokenizer, texts: &[String]) -> Result<PaddedBatch> {
    let encodings: Vec<_> = texts
        .iter()
        .map(|t| {
            tokenizer
                .encode(t.as_str(), true)
                .map_err(|e| anyhow::anyhow!("Tokenization failed: {e}"))
        })
        .collect::<Result<Vec<_>>>()?;

    let batch_size = encodings.len();
    let max_len = encodings
        .iter()
        .map(|e| e.get_ids().len())
        .max()
        .unwrap_or(0);

    let mut batch = PaddedBatch {
        input_ids: Vec::with_capacity(batch_size * max_len),
        attention_mask: Vec::with_capacity(batch_size * max_len),
        token_type_ids: vec![0i64; batch_size * max_len],
        batch_size,
        max_len,
    };

    // BERT conventions: pad token id 0, mask 1 for real tokens,
    // token_type_ids all zero for single-sentence input.
    for enc in &encodings {
        let ids = enc.get_ids();
        let mask = enc.get_attention_mask();
        let pad_len = max_len - ids.len();

        batch.input_ids.extend(ids.iter().map(|&id| id as i64));
        batch.input_ids.extend(std::iter::repeat_n(0i64, pad_len));
        batch.attention_mask.extend(mask.iter().map(|&m| m as i64));
        batch
            .attention_mask
            .extend(std::iter::repeat_n(0i64, pad_len));
    }

    Ok(batch)
}

/// Synchronous embedding — tokenization, inference, mean pooling.
fn embed_sync(
    session: &Arc<Mutex<Session>>,
    tokenizer: &Arc<Tokenizer>,
    texts: &[String],
) -> Result<Vec<Vec<f64>>> {
    let batch = tokenize_batch(tokenizer, texts)?;

    if batch.max_len == 0 {
        return Ok(vec![vec![0.0; EMBEDDING_DIM]; batch.batch_size]);
    }

    let shape = [batch.batch_size as i64, batch.max_len as i64];

    let input_ids_tensor =
        Tensor::from_array((shape, batch.input_ids)).context("Failed to create input_ids tensor")?;
    let attention_mask_tensor = Tensor::from_array((shape, batch.attention_mask.clone()))
        .context("Failed to create attention_mask tensor")?;
    let token_type_ids_tensor = Tensor::from_array((shape, batch.token_type_ids))
        .context("Failed to create token_type_ids tensor")?;

    // Output is last_hidden_state: [batch, seq_len, 384]
    let hidden_states = {
        let mut session = session
            .lock()
            .map_err(|e| anyhow::anyhow!("Session lock poisoned: {e}"))?;

        let outputs = session
            .run(ort::inputs! {
                "input_ids" => input_ids_tensor,
                "attention_mask" => attention_mask_tensor,
                "token_type_ids" => token_type_ids_tensor
            })
            .context("Embedding ONNX inference failed")?;

        let (_shape, data) = outputs[0]
            .try_extract_tensor::<f32>()
            .context("Failed to extract embedding output tensor")?;

        data.to_vec()
    };

    let embeddings = mean_pool(
        &hidden_states,
        &batch.attention_mask,
        batch.batch_size,
        batch.max_len,
    );

    debug!(
        batch_size = batch.batch_size,
        dim = EMBEDDING_DIM,
        "Computed sentence embeddings"
    );

    Ok(embeddings)
}

/// Mean pooling: average each sequence's token embeddings weighted by
/// the attention mask, so padding contributes nothing.
fn mean_pool(
    hidden_states: &[f32],
    attention_mask: &[i64],
    batch_size: usize,
    max_len: usize,
) -> Vec<Vec<f64>> {
    let mut embeddings = Vec::with_capacity(batch_size);

    for i in 0..batch_size {
        let mut sum = vec![0.0_f64; EMBEDDING_DIM];
        let mut mask_sum = 0.0_f64;

        for j in 0..max_len {
            if attention_mask[i * max_len + j] == 0 {
                continue;
            }
            mask_sum += 1.0;
            let offset = (i * max_len + j) * EMBEDDING_DIM;
            for (k, slot) in sum.iter_mut().enumerate() {
                *slot += hidden_states[offset + k] as f64;
            }
        }

        if mask_sum > 0.0 {
            for val in &mut sum {
                *val /= mask_sum;
            }
        }

        embeddings.push(sum);
    }

    embeddings
}
