//! Embedding capability for the semantic tier, optionally backed by fastembed.

use thiserror::Error;

#[cfg(feature = "embeddings")]
use std::sync::Mutex;

#[cfg(feature = "embeddings")]
use fastembed::TextEmbedding;

#[derive(Debug, Error)]
pub enum EncodeError {
    #[error("failed to load embedding model: {reason}")]
    ModelLoadFailed { reason: String },

    #[error("embedding inference failed: {reason}")]
    InferenceFailed { reason: String },

    #[error("encoder returned {got} vectors for {expected} inputs")]
    CountMismatch { expected: usize, got: usize },
}

/// Turns strings into fixed-length vectors. Implementations must be pure:
/// the same text always yields the same vector.
pub trait Encoder: Send + Sync {
    fn encode_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EncodeError>;

    fn encode(&self, text: &str) -> Result<Vec<f32>, EncodeError> {
        let mut vectors = self.encode_batch(&[text.to_string()])?;
        if vectors.len() != 1 {
            return Err(EncodeError::CountMismatch {
                expected: 1,
                got: vectors.len(),
            });
        }
        Ok(vectors.swap_remove(0))
    }
}

/// Cosine similarity; zero when either vector has no magnitude.
pub fn cosine(a: &[f32], b: &[f32]) -> f32 {
    let dot = a.iter().zip(b).map(|(x, y)| x * y).sum::<f32>();
    let norm_a = a.iter().map(|v| v * v).sum::<f32>().sqrt();
    let norm_b = b.iter().map(|v| v * v).sum::<f32>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        0.0
    } else {
        dot / (norm_a * norm_b)
    }
}

/// Cosine similarity mapped onto the 0-100 score scale. Negative
/// similarities clamp to zero.
pub fn cosine_score(a: &[f32], b: &[f32]) -> f64 {
    (f64::from(cosine(a, b)) * 100.0).clamp(0.0, 100.0)
}

/// fastembed text encoder using the library's default model.
#[cfg(feature = "embeddings")]
pub struct FastEmbedEncoder {
    model: Mutex<TextEmbedding>,
}

#[cfg(feature = "embeddings")]
impl FastEmbedEncoder {
    pub fn try_new() -> Result<Self, EncodeError> {
        let model =
            TextEmbedding::try_new(Default::default()).map_err(|e| EncodeError::ModelLoadFailed {
                reason: e.to_string(),
            })?;
        Ok(Self {
            model: Mutex::new(model),
        })
    }
}

#[cfg(feature = "embeddings")]
impl Encoder for FastEmbedEncoder {
    #[allow(unused_mut)]
    fn encode_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EncodeError> {
        let mut model = self
            .model
            .lock()
            .map_err(|_| EncodeError::InferenceFailed {
                reason: "embedding model lock poisoned".to_string(),
            })?;
        let documents: Vec<&str> = texts.iter().map(String::as_str).collect();
        let vectors = model
            .embed(documents, None)
            .map_err(|e| EncodeError::InferenceFailed {
                reason: e.to_string(),
            })?;
        if vectors.len() != texts.len() {
            return Err(EncodeError::CountMismatch {
                expected: texts.len(),
                got: vectors.len(),
            });
        }
        Ok(vectors)
    }
}
