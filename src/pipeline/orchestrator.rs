//! Drives the transcription run from decoded audio to assembled text.
//!
//! Chunks are processed strictly in index order: fragments are concatenated
//! positionally and the checkpoint encodes a single linear cursor. After
//! every chunk attempt the checkpoint is rewritten, so an interruption at
//! any point resumes at exactly the next unprocessed chunk. Per-chunk
//! recognition failures are tolerated and skipped; only decode failures
//! (before any chunk is processed) and exhausted checkpoint writes abort
//! a run.

use crate::audio::wav::DecodedAudio;
use crate::checkpoint::store::{Checkpoint, ProgressStore};
use crate::config::Config;
use crate::defaults;
use crate::error::Result;
use crate::pipeline::transcript::{TranscriptBuilder, normalize_fragment};
use crate::segment::{Segmenter, SegmenterConfig};
use crate::stt::client::{RecognizeError, RecognizeOutcome, SpeechService};
use crate::stt::retry::RetryPolicy;
use std::time::Duration;

/// Configuration for the transcription pipeline.
#[derive(Debug, Clone, Copy, Default)]
pub struct PipelineConfig {
    /// Segmenter configuration.
    pub segmenter: SegmenterConfig,
    /// Retry protocol for the recognition service.
    pub retry: RetryPolicy,
}

impl PipelineConfig {
    /// Creates pipeline configuration from app config.
    pub fn from_config(config: &Config) -> Self {
        Self {
            segmenter: SegmenterConfig {
                silence_threshold_dbfs: config.silence.threshold_dbfs,
                min_silence_ms: config.silence.min_silence_ms,
                keep_silence_ms: config.silence.keep_silence_ms,
                ..SegmenterConfig::default()
            },
            retry: RetryPolicy::new(
                config.retry.max_attempts,
                Duration::from_millis(config.retry.base_delay_ms),
            ),
        }
    }
}

/// Progress notifications emitted while a run executes.
#[derive(Debug, Clone, PartialEq)]
pub enum PipelineEvent {
    /// Segmentation finished with this many chunks.
    Segmented { total: usize },
    /// A matching checkpoint was found; processing continues at `next_index`.
    Resumed { next_index: usize, fragments: usize },
    /// A chunk is about to be recognized.
    ChunkStarted {
        index: usize,
        total: usize,
        duration_ms: u64,
    },
    /// A chunk produced a transcript fragment (already normalized).
    ChunkTranscribed { index: usize, text: String },
    /// The service found no recognizable speech in a chunk.
    ChunkUnintelligible { index: usize },
    /// Recognition failed after retries; the chunk is skipped.
    ChunkSkipped { index: usize, error: RecognizeError },
    /// The input contained no speech at all.
    NoSpeechFound,
    /// The run finished and the checkpoint was cleared.
    Completed { transcribed: usize, skipped: usize },
}

/// Outcome of a completed run.
#[derive(Debug, Clone, PartialEq)]
pub struct RunSummary {
    /// Assembled transcript, or the no-speech sentinel.
    pub transcript: String,
    /// Total chunks in the segmentation.
    pub total_chunks: usize,
    /// Chunks transcribed during this run (resumed fragments not included).
    pub transcribed: usize,
    /// Chunks the service heard nothing usable in.
    pub unintelligible: usize,
    /// Chunks skipped after recognition failures.
    pub skipped: usize,
    /// Resume position when a checkpoint was honored.
    pub resumed_at: Option<usize>,
}

/// Sequential transcription pipeline.
pub struct TranscriptionPipeline<S, P> {
    service: S,
    store: P,
    config: PipelineConfig,
}

impl<S: SpeechService, P: ProgressStore> TranscriptionPipeline<S, P> {
    /// Creates a pipeline with default configuration.
    pub fn new(service: S, store: P) -> Self {
        Self::with_config(service, store, PipelineConfig::default())
    }

    /// Creates a pipeline with custom configuration.
    pub fn with_config(service: S, store: P, config: PipelineConfig) -> Self {
        Self {
            service,
            store,
            config,
        }
    }

    /// Runs the pipeline to completion.
    pub async fn run(&self, audio: &DecodedAudio, source_id: &str) -> Result<RunSummary> {
        self.run_with_observer(audio, source_id, |_| {}).await
    }

    /// Runs the pipeline, reporting progress through `observe`.
    pub async fn run_with_observer(
        &self,
        audio: &DecodedAudio,
        source_id: &str,
        mut observe: impl FnMut(&PipelineEvent),
    ) -> Result<RunSummary> {
        let segmenter = Segmenter::with_config(self.config.segmenter);
        let chunks = segmenter.segment(audio);
        let total = chunks.len();
        observe(&PipelineEvent::Segmented { total });

        // Silent input is a successful run, and no checkpoint is written.
        if total == 0 {
            observe(&PipelineEvent::NoSpeechFound);
            return Ok(RunSummary {
                transcript: defaults::NO_SPEECH_TEXT.to_string(),
                total_chunks: 0,
                transcribed: 0,
                unintelligible: 0,
                skipped: 0,
                resumed_at: None,
            });
        }

        let (start_index, mut builder, resumed_at) = match self.store.load(source_id) {
            Some(checkpoint) => {
                let next = checkpoint.last_index.saturating_add(1).min(total);
                observe(&PipelineEvent::Resumed {
                    next_index: next,
                    fragments: checkpoint.fragments.len(),
                });
                (
                    next,
                    TranscriptBuilder::from_fragments(checkpoint.fragments),
                    Some(next),
                )
            }
            None => (0, TranscriptBuilder::new(), None),
        };

        let mut transcribed = 0usize;
        let mut unintelligible = 0usize;
        let mut skipped = 0usize;

        // Skip goes through the chunk iterator's nth, so already-attempted
        // chunks are never copied out of the decoded buffer.
        for chunk in chunks.skip(start_index) {
            let index = chunk.index;
            observe(&PipelineEvent::ChunkStarted {
                index,
                total,
                duration_ms: chunk.duration_ms(),
            });

            match self.config.retry.recognize(&self.service, &chunk).await {
                Ok(RecognizeOutcome::Transcribed(raw)) => match normalize_fragment(&raw) {
                    Some(fragment) => {
                        observe(&PipelineEvent::ChunkTranscribed {
                            index,
                            text: fragment.clone(),
                        });
                        builder.push(fragment);
                        transcribed += 1;
                    }
                    // Whitespace-only text from the service
                    None => {
                        observe(&PipelineEvent::ChunkUnintelligible { index });
                        unintelligible += 1;
                    }
                },
                Ok(RecognizeOutcome::Unintelligible) => {
                    observe(&PipelineEvent::ChunkUnintelligible { index });
                    unintelligible += 1;
                }
                Err(error) => {
                    observe(&PipelineEvent::ChunkSkipped { index, error });
                    skipped += 1;
                }
            }

            // The cursor advances no matter how the attempt went.
            self.save_checkpoint(&Checkpoint {
                source_id: source_id.to_string(),
                last_index: index,
                fragments: builder.fragments().to_vec(),
            })?;
        }

        self.store.clear(source_id)?;
        observe(&PipelineEvent::Completed {
            transcribed,
            skipped,
        });

        Ok(RunSummary {
            transcript: builder.finish(),
            total_chunks: total,
            transcribed,
            unintelligible,
            skipped,
            resumed_at,
        })
    }

    /// Persists a checkpoint, retrying a few times before giving up.
    fn save_checkpoint(&self, checkpoint: &Checkpoint) -> Result<()> {
        let mut last_error = None;
        for _ in 0..defaults::CHECKPOINT_SAVE_ATTEMPTS.max(1) {
            match self.store.save(checkpoint) {
                Ok(()) => return Ok(()),
                Err(e) => last_error = Some(e),
            }
        }
        Err(last_error.unwrap_or(crate::error::ScribeError::Checkpoint {
            message: "checkpoint save failed".to_string(),
        }))
    }
}
