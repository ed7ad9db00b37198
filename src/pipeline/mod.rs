//! Transcription pipeline: segmentation, recognition, checkpointing, assembly.

pub mod orchestrator;
pub mod transcript;

pub use orchestrator::{PipelineConfig, PipelineEvent, RunSummary, TranscriptionPipeline};
pub use transcript::{TranscriptBuilder, normalize_fragment};
