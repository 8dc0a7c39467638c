use std::env;
use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::intent::Intent;

/// Default threshold for topic-level clustering. Looser than the page
/// threshold: broad semantic kinship is enough to share a topic.
pub const DEFAULT_TOPIC_THRESHOLD: f64 = 0.78;

/// Default threshold for page-group clustering. Stricter: each group
/// becomes a single target page, so near-duplication of intent is required.
pub const DEFAULT_PAGE_GROUP_THRESHOLD: f64 = 0.88;

/// Default threshold for sibling links between spoke pages.
pub const DEFAULT_SIBLING_THRESHOLD: f64 = 0.90;

/// Default SERP rank assumed when estimating traffic potential.
pub const DEFAULT_TARGET_RANK: usize = 3;

/// Central configuration loaded from environment variables.
///
/// The .env file is loaded automatically via dotenvy. Every field has a
/// default, so `Config::load()` succeeds in an empty environment.
pub struct Config {
    /// Similarity threshold for the coarse topic pass (0-1)
    pub topic_threshold: f64,
    /// Similarity threshold for the fine page-group pass (0-1)
    pub page_group_threshold: f64,
    /// Similarity threshold for sibling edges in the hub-cluster graph (0-1)
    pub sibling_threshold: f64,
    /// SERP position used for traffic-potential estimates
    pub target_rank: usize,
    /// The site's editorial focus — keywords matching it get an
    /// opportunity boost
    pub content_focus: Intent,
    /// Directory containing the ONNX embedding model files
    pub model_dir: PathBuf,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn load() -> Result<Self> {
        dotenvy::dotenv().ok();

        let content_focus = match env::var("KEYSTONE_CONTENT_FOCUS").as_deref() {
            Ok(raw) => raw
                .parse()
                .with_context(|| format!("Invalid KEYSTONE_CONTENT_FOCUS: {raw}"))?,
            // Informational is the safest default for content sites
            Err(_) => Intent::Informational,
        };

        let model_dir = env::var("KEYSTONE_MODEL_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| default_model_dir());

        Ok(Self {
            topic_threshold: env_threshold("KEYSTONE_TOPIC_THRESHOLD", DEFAULT_TOPIC_THRESHOLD)?,
            page_group_threshold: env_threshold(
                "KEYSTONE_PAGE_GROUP_THRESHOLD",
                DEFAULT_PAGE_GROUP_THRESHOLD,
            )?,
            sibling_threshold: env_threshold(
                "KEYSTONE_SIBLING_THRESHOLD",
                DEFAULT_SIBLING_THRESHOLD,
            )?,
            target_rank: match env::var("KEYSTONE_TARGET_RANK") {
                Ok(raw) => raw
                    .parse()
                    .with_context(|| format!("Invalid KEYSTONE_TARGET_RANK: {raw}"))?,
                Err(_) => DEFAULT_TARGET_RANK,
            },
            content_focus,
            model_dir,
        })
    }

    /// Check that the embedding model files are present.
    /// Call this before constructing the production embedder.
    pub fn require_model(&self) -> Result<()> {
        if !crate::embedding::minilm::model_files_present(&self.model_dir) {
            anyhow::bail!(
                "Embedding model files not found in {}\n\
                 Place model.onnx and tokenizer.json there, or set KEYSTONE_MODEL_DIR.",
                self.model_dir.display()
            );
        }
        Ok(())
    }
}

/// Returns the default directory for storing model files.
/// Uses the platform data directory: ~/.local/share/keystone/models/ on Linux.
pub fn default_model_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("keystone")
        .join("models")
        .join("all-MiniLM-L6-v2")
}

/// Parse a similarity threshold from an env var, falling back to a default.
/// Thresholds must land in [0, 1] — anything else is a configuration error.
fn env_threshold(var: &str, default: f64) -> Result<f64> {
    let value = match env::var(var) {
        Ok(raw) => raw
            .parse::<f64>()
            .with_context(|| format!("Invalid {var}: {raw}"))?,
        Err(_) => default,
    };

    if !(0.0..=1.0).contains(&value) {
        anyhow::bail!("{var} must be between 0 and 1, got {value}");
    }

    Ok(value)
}
