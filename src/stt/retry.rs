//! Bounded exponential backoff around the recognition service.
//!
//! Only transient errors are retried. The backoff sleep suspends the
//! current chunk's task alone; nothing else in the pipeline is blocked.

use crate::defaults;
use crate::segment::AudioChunk;
use crate::stt::client::{RecognizeResult, SpeechService};
use std::time::Duration;

/// Retry protocol for one recognition call per chunk.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    /// Maximum attempts per chunk, first try included. Clamped to >= 1.
    pub max_attempts: u32,
    /// Delay before the first retry; doubles each attempt.
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: defaults::MAX_ATTEMPTS,
            base_delay: defaults::RETRY_BASE_DELAY,
        }
    }
}

impl RetryPolicy {
    /// Creates a policy with explicit bounds.
    pub fn new(max_attempts: u32, base_delay: Duration) -> Self {
        Self {
            max_attempts,
            base_delay,
        }
    }

    /// Runs the service on one chunk, retrying transient failures.
    ///
    /// Returns the final outcome: recognized text, unintelligible, or the
    /// last error once attempts are exhausted. Fatal errors are returned
    /// immediately without retrying.
    pub async fn recognize<S: SpeechService + ?Sized>(
        &self,
        service: &S,
        chunk: &AudioChunk,
    ) -> RecognizeResult {
        let max = self.max_attempts.max(1);
        let mut backoff = Backoff::new(self.base_delay);

        loop {
            let result = service.recognize(chunk).await;
            let retryable = matches!(&result, Err(e) if e.is_transient());
            if !retryable || backoff.attempt + 1 >= max {
                return result;
            }
            tokio::time::sleep(backoff.next_delay()).await;
        }
    }
}

/// Backoff state for a single chunk. Reset for every new chunk.
#[derive(Debug, Clone, Copy)]
struct Backoff {
    /// Retries performed so far.
    attempt: u32,
    /// Delay before the next retry.
    delay: Duration,
}

impl Backoff {
    fn new(base_delay: Duration) -> Self {
        Self {
            attempt: 0,
            delay: base_delay,
        }
    }

    /// Returns the current delay and doubles it for the next retry.
    fn next_delay(&mut self) -> Duration {
        let delay = self.delay;
        self.attempt += 1;
        self.delay = self.delay.saturating_mul(2);
        delay
    }
}
