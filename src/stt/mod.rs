//! Speech recognition: service adapter and retry protocol.

pub mod client;
pub mod http;
pub mod retry;

pub use client::{RecognizeError, RecognizeOutcome, RecognizeResult, ScriptedService, SpeechService};
pub use http::{HttpServiceConfig, HttpSpeechService};
pub use retry::RetryPolicy;
