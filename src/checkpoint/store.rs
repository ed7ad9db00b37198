//! Checkpoint persistence for resumable runs.
//!
//! The pipeline saves a checkpoint after every chunk attempt and clears it
//! on completion. Writes go to a sibling temp file first and are renamed
//! into place, so an interruption can never corrupt the previous record.

use crate::error::{Result, ScribeError};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Persisted progress record for one source file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Checkpoint {
    /// Identity of the audio file this progress belongs to.
    pub source_id: String,
    /// Index of the last chunk attempted, inclusive. Advances by exactly
    /// one per attempt regardless of the attempt's outcome.
    pub last_index: usize,
    /// Normalized fragments of the successfully transcribed chunks so far,
    /// in chunk order.
    pub fragments: Vec<String>,
}

/// Trait for checkpoint storage.
///
/// This trait allows swapping implementations (sidecar JSON file vs mock).
pub trait ProgressStore: Send + Sync {
    /// Loads the checkpoint for `source_id`.
    ///
    /// Returns `None` when no checkpoint exists, when the stored record
    /// belongs to a different source (stale), or when the file cannot be
    /// parsed (corrupt records are treated as absent, never as failures).
    fn load(&self, source_id: &str) -> Option<Checkpoint>;

    /// Persists the checkpoint, fully replacing any previous record.
    fn save(&self, checkpoint: &Checkpoint) -> Result<()>;

    /// Removes the checkpoint. A missing record is not an error.
    fn clear(&self, source_id: &str) -> Result<()>;
}

/// Checkpoint store backed by a sidecar JSON file.
pub struct JsonProgressStore {
    path: PathBuf,
}

impl JsonProgressStore {
    /// Creates a store at an explicit path.
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// Creates a store beside the given audio file
    /// (`talk.wav` → `talk.wav.progress.json`).
    pub fn beside(audio_path: &Path) -> Self {
        let mut os = audio_path.as_os_str().to_owned();
        os.push(".progress.json");
        Self {
            path: PathBuf::from(os),
        }
    }

    /// Path of the checkpoint file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut os = self.path.as_os_str().to_owned();
        os.push(".tmp");
        PathBuf::from(os)
    }
}

impl ProgressStore for JsonProgressStore {
    fn load(&self, source_id: &str) -> Option<Checkpoint> {
        let contents = fs::read_to_string(&self.path).ok()?;
        let checkpoint: Checkpoint = serde_json::from_str(&contents).ok()?;
        if checkpoint.source_id != source_id {
            return None;
        }
        Some(checkpoint)
    }

    fn save(&self, checkpoint: &Checkpoint) -> Result<()> {
        let contents =
            serde_json::to_string_pretty(checkpoint).map_err(|e| ScribeError::Checkpoint {
                message: e.to_string(),
            })?;

        let temp = self.temp_path();
        fs::write(&temp, contents).map_err(|e| ScribeError::Checkpoint {
            message: format!("write {}: {e}", temp.display()),
        })?;
        fs::rename(&temp, &self.path).map_err(|e| ScribeError::Checkpoint {
            message: format!("rename {}: {e}", self.path.display()),
        })
    }

    fn clear(&self, _source_id: &str) -> Result<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(ScribeError::Checkpoint {
                message: format!("remove {}: {e}", self.path.display()),
            }),
        }
    }
}

/// Stable identity of an input file: its canonicalized absolute path.
pub fn source_identity(path: &Path) -> Result<String> {
    let canonical = fs::canonicalize(path)?;
    Ok(canonical.display().to_string())
}
