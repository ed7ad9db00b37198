//! Default configuration constants for audioscribe.
//!
//! This module provides shared constants used across different configuration
//! types to ensure consistency and eliminate duplication.

use std::time::Duration;

/// Silence threshold in dBFS.
///
/// A 10ms analysis frame whose RMS level falls below this is considered
/// silent. −40 dBFS sits comfortably between room tone and quiet speech for
/// typical recordings.
pub const SILENCE_THRESHOLD_DBFS: f32 = -40.0;

/// Minimum silence duration in milliseconds for a gap to split the audio.
///
/// Shorter dips below the threshold (plosives, breaths, commas) stay inside
/// the surrounding chunk.
pub const MIN_SILENCE_MS: u32 = 500;

/// Silence padding in milliseconds kept on each side of an emitted chunk.
///
/// Keeps word onsets and offsets from being clipped at the split point.
pub const KEEP_SILENCE_MS: u32 = 100;

/// Analysis frame duration in milliseconds for silence detection.
pub const FRAME_MS: u32 = 10;

/// Maximum recognition attempts per chunk (first try included).
pub const MAX_ATTEMPTS: u32 = 3;

/// Base delay before the first retry. Doubles on each subsequent attempt.
pub const RETRY_BASE_DELAY: Duration = Duration::from_secs(1);

/// Default recognition service endpoint.
///
/// Matches the whisper.cpp `server` convention so a locally hosted model
/// works out of the box.
pub const SERVICE_ENDPOINT: &str = "http://localhost:8080/inference";

/// Default per-request timeout for the recognition service, in seconds.
pub const SERVICE_TIMEOUT_SECS: u64 = 30;

/// Default language hint sent to the recognition service.
pub const DEFAULT_LANGUAGE: &str = "en";

/// Attempts for persisting a checkpoint before the run is aborted.
pub const CHECKPOINT_SAVE_ATTEMPTS: u32 = 3;

/// Text returned when a run completes without a single recognized fragment.
pub const NO_SPEECH_TEXT: &str = "No speech could be recognized in the audio file.";
