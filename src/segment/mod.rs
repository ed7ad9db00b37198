//! Silence-based segmentation of decoded audio.

pub mod chunk;
pub mod segmenter;

pub use chunk::AudioChunk;
pub use segmenter::{Chunks, Segmenter, SegmenterConfig};
