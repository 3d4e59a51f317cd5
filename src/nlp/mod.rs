//! Text handling: normalization, segmentation and the similarity capabilities.

pub mod embeddings;
pub mod normalize;
pub mod segment;
pub mod similarity;

pub use embeddings::{cosine, EncodeError, Encoder};
pub use normalize::normalize;
pub use segment::{locate_declaration, segment};
pub use similarity::{StringSimilarity, TokenSetRatio};
