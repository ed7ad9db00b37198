//! Persisted transcription progress.

pub mod store;

pub use store::{Checkpoint, JsonProgressStore, ProgressStore, source_identity};
