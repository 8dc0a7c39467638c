// Sentence embeddings — the Embedder trait, the memo cache, and the
// local ONNX implementation.

pub mod cache;
pub mod minilm;
pub mod traits;
