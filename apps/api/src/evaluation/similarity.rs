//! Semantic similarity between a resume and the reference job description.
//!
//! `AppState` carries the embedder as `Arc<dyn Embedder>` so the pretrained
//! model is loaded once at startup and can be swapped out in tests.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{anyhow, Context};
use async_trait::async_trait;
use fastembed::{EmbeddingModel, InitOptions, TextEmbedding};

use crate::errors::AppError;

// ────────────────────────────────────────────────────────────────────────────
// Trait definition
// ────────────────────────────────────────────────────────────────────────────

/// Turns texts into fixed-length vectors. Implementations must tolerate
/// concurrent calls from simultaneously handled requests.
#[async_trait]
pub trait Embedder: Send + Sync {
    fn model_name(&self) -> &str;

    /// One vector per input text, in input order.
    async fn embed(&self, texts: Vec<String>) -> Result<Vec<Vec<f32>>, AppError>;
}

// ────────────────────────────────────────────────────────────────────────────
// FastEmbedder — local ONNX sentence-embedding model
// ────────────────────────────────────────────────────────────────────────────

pub struct FastEmbedder {
    model: Arc<TextEmbedding>,
    name: String,
}

impl FastEmbedder {
    /// Loads (and on first use downloads) the named model. Blocking and slow;
    /// call once during startup, off the async runtime.
    pub fn load(name: &str, cache_dir: Option<PathBuf>) -> anyhow::Result<Self> {
        let model = model_from_name(name)
            .ok_or_else(|| anyhow!("Unsupported EMBEDDING_MODEL '{name}'"))?;

        let mut options = InitOptions::new(model).with_show_download_progress(false);
        if let Some(dir) = cache_dir {
            options = options.with_cache_dir(dir);
        }

        let model = TextEmbedding::try_new(options)
            .with_context(|| format!("Failed to load embedding model '{name}'"))?;

        Ok(Self {
            model: Arc::new(model),
            name: name.to_string(),
        })
    }
}

#[async_trait]
impl Embedder for FastEmbedder {
    fn model_name(&self) -> &str {
        &self.name
    }

    async fn embed(&self, texts: Vec<String>) -> Result<Vec<Vec<f32>>, AppError> {
        let model = Arc::clone(&self.model);
        let expected = texts.len();

        // ONNX inference is CPU-bound; keep it off the async workers.
        let vectors = tokio::task::spawn_blocking(move || model.embed(texts, None))
            .await
            .map_err(|e| AppError::ModelInference(format!("inference task aborted: {e}")))?
            .map_err(|e| AppError::ModelInference(e.to_string()))?;

        if vectors.len() != expected {
            return Err(AppError::ModelInference(format!(
                "expected {expected} embeddings, model returned {}",
                vectors.len()
            )));
        }
        Ok(vectors)
    }
}

/// Maps a sentence-transformers style model name onto a bundled fastembed model.
pub fn model_from_name(name: &str) -> Option<EmbeddingModel> {
    let short = name
        .trim()
        .trim_start_matches("sentence-transformers/")
        .trim_start_matches("BAAI/");

    match short.to_ascii_lowercase().as_str() {
        "all-minilm-l6-v2" => Some(EmbeddingModel::AllMiniLML6V2),
        "all-minilm-l12-v2" => Some(EmbeddingModel::AllMiniLML12V2),
        "bge-small-en-v1.5" => Some(EmbeddingModel::BGESmallENV15),
        "bge-base-en-v1.5" => Some(EmbeddingModel::BGEBaseENV15),
        _ => None,
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Scoring
// ────────────────────────────────────────────────────────────────────────────

/// Cosine of the angle between `a` and `b`.
/// Zero-magnitude or mismatched vectors score 0.0 rather than NaN.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    let dot: f32 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let norm_a = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a * norm_b)
}

/// Scales a similarity to a 0–100 score: truncated toward zero, then clamped.
pub fn scale_score(similarity: f32) -> u32 {
    let scaled = (similarity * 100.0).trunc();
    scaled.clamp(0.0, 100.0) as u32
}
