//! Recognition service boundary.
//!
//! Every service integration maps its responses onto the three-outcome
//! contract here: recognized text, no recognizable speech, or a failure
//! that is either worth retrying or not. The retry and pipeline layers
//! switch on these variants and never see service-specific errors.

use crate::segment::AudioChunk;
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Mutex;
use thiserror::Error;

/// Successful response from the recognition service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecognizeOutcome {
    /// Recognized text, raw casing as returned by the service.
    Transcribed(String),
    /// The service understood the audio but found no recognizable speech.
    Unintelligible,
}

/// Failure from the recognition service.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RecognizeError {
    /// Connectivity or service-side trouble presumed recoverable by retrying.
    #[error("transient service error: {message}")]
    Transient { message: String },

    /// Rejected request (bad input, auth, quota). Retrying cannot help.
    #[error("service rejected request: {message}")]
    Fatal { message: String },
}

impl RecognizeError {
    /// Returns true if another attempt may succeed.
    pub fn is_transient(&self) -> bool {
        matches!(self, RecognizeError::Transient { .. })
    }
}

/// Result of a single recognition attempt.
pub type RecognizeResult = std::result::Result<RecognizeOutcome, RecognizeError>;

/// Trait for speech recognition backends.
///
/// This trait allows swapping implementations (real HTTP service vs mock).
#[async_trait]
pub trait SpeechService: Send + Sync {
    /// Recognize speech in one audio chunk.
    async fn recognize(&self, chunk: &AudioChunk) -> RecognizeResult;

    /// Returns the name of this service for logging/debugging.
    fn name(&self) -> &str;
}

/// Mock service for testing: replays a scripted sequence of results.
///
/// Each call pops the next scripted result; once the script is exhausted,
/// further calls repeat the last result (or report `Unintelligible` for an
/// empty script).
pub struct ScriptedService {
    name: String,
    script: Mutex<VecDeque<RecognizeResult>>,
    last: Mutex<Option<RecognizeResult>>,
    calls: Mutex<u32>,
}

impl ScriptedService {
    /// Creates a scripted service with no canned results.
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            script: Mutex::new(VecDeque::new()),
            last: Mutex::new(None),
            calls: Mutex::new(0),
        }
    }

    /// Appends a result to the script.
    pub fn then(self, result: RecognizeResult) -> Self {
        self.script
            .lock()
            .expect("script lock poisoned")
            .push_back(result);
        self
    }

    /// Appends a recognized-text result to the script.
    pub fn then_text(self, text: &str) -> Self {
        self.then(Ok(RecognizeOutcome::Transcribed(text.to_string())))
    }

    /// Appends a transient failure to the script.
    pub fn then_transient(self, message: &str) -> Self {
        self.then(Err(RecognizeError::Transient {
            message: message.to_string(),
        }))
    }

    /// Number of recognize calls made so far.
    pub fn call_count(&self) -> u32 {
        *self.calls.lock().expect("calls lock poisoned")
    }
}

#[async_trait]
impl SpeechService for ScriptedService {
    async fn recognize(&self, _chunk: &AudioChunk) -> RecognizeResult {
        *self.calls.lock().expect("calls lock poisoned") += 1;

        let mut script = self.script.lock().expect("script lock poisoned");
        if let Some(result) = script.pop_front() {
            *self.last.lock().expect("last lock poisoned") = Some(result.clone());
            return result;
        }
        self.last
            .lock()
            .expect("last lock poisoned")
            .clone()
            .unwrap_or(Ok(RecognizeOutcome::Unintelligible))
    }

    fn name(&self) -> &str {
        &self.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chunk() -> AudioChunk {
        AudioChunk {
            index: 0,
            samples: vec![0; 160],
            sample_rate: 16000,
        }
    }

    #[tokio::test]
    async fn test_scripted_service_replays_in_order() {
        let service = ScriptedService::new("scripted")
            .then_text("first")
            .then(Ok(RecognizeOutcome::Unintelligible))
            .then_transient("timeout");

        assert_eq!(
            service.recognize(&chunk()).await,
            Ok(RecognizeOutcome::Transcribed("first".to_string()))
        );
        assert_eq!(
            service.recognize(&chunk()).await,
            Ok(RecognizeOutcome::Unintelligible)
        );
        assert_eq!(
            service.recognize(&chunk()).await,
            Err(RecognizeError::Transient {
                message: "timeout".to_string()
            })
        );
        assert_eq!(service.call_count(), 3);
    }

    #[tokio::test]
    async fn test_scripted_service_repeats_last_result() {
        let service = ScriptedService::new("scripted").then_transient("down");

        let _ = service.recognize(&chunk()).await;
        let repeated = service.recognize(&chunk()).await;
        assert!(matches!(repeated, Err(ref e) if e.is_transient()));
    }

    #[tokio::test]
    async fn test_empty_script_is_unintelligible() {
        let service = ScriptedService::new("empty");
        assert_eq!(
            service.recognize(&chunk()).await,
            Ok(RecognizeOutcome::Unintelligible)
        );
    }

    #[test]
    fn test_is_transient() {
        let transient = RecognizeError::Transient {
            message: "x".to_string(),
        };
        let fatal = RecognizeError::Fatal {
            message: "x".to_string(),
        };
        assert!(transient.is_transient());
        assert!(!fatal.is_transient());
    }

    #[test]
    fn test_error_display() {
        let error = RecognizeError::Transient {
            message: "connection reset".to_string(),
        };
        assert_eq!(error.to_string(), "transient service error: connection reset");

        let error = RecognizeError::Fatal {
            message: "401 Unauthorized".to_string(),
        };
        assert_eq!(error.to_string(), "service rejected request: 401 Unauthorized");
    }

    #[test]
    fn test_service_trait_is_object_safe() {
        let service: Box<dyn SpeechService> = Box::new(ScriptedService::new("boxed"));
        assert_eq!(service.name(), "boxed");
    }
}
