//! Error types for audioscribe.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScribeError {
    // Configuration errors
    #[error("Configuration file not found at {path}")]
    ConfigFileNotFound { path: String },

    #[error("Configuration error: {0}")]
    Config(#[from] toml::de::Error),

    // Audio input errors, fatal to the run before any chunk is processed
    #[error("Failed to decode {path}: {message}")]
    Decode { path: String, message: String },

    #[error("No audio files found in {dir}")]
    NoAudioFiles { dir: String },

    // Recognition client construction
    #[error("Speech service error: {message}")]
    Service { message: String },

    // Progress persistence, surfaced only after local retries are exhausted
    #[error("Checkpoint error: {message}")]
    Checkpoint { message: String },

    // General I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    // Generic error for cases not covered above
    #[error("{0}")]
    Other(String),
}

// Type alias for convenience
pub type Result<T> = std::result::Result<T, ScribeError>;
