//! Terminal progress rendering and transcript file output.

use crate::error::Result;
use crate::pipeline::orchestrator::PipelineEvent;
use owo_colors::OwoColorize;
use std::fs;
use std::path::{Path, PathBuf};

/// Render a pipeline event to stderr.
///
/// `quiet` suppresses everything except skipped-chunk warnings; `verbose`
/// adds per-chunk timing lines.
pub fn render_event(event: &PipelineEvent, quiet: bool, verbose: u8) {
    match event {
        PipelineEvent::Segmented { total } => {
            if !quiet {
                let noun = if *total == 1 { "segment" } else { "segments" };
                eprintln!("Found {} speech {}", total, noun);
            }
        }
        PipelineEvent::Resumed {
            next_index,
            fragments,
        } => {
            if !quiet {
                eprintln!(
                    "{}",
                    format!(
                        "Resuming at chunk {} ({} fragments restored)",
                        next_index + 1,
                        fragments
                    )
                    .green()
                );
            }
        }
        PipelineEvent::ChunkStarted {
            index,
            total,
            duration_ms,
        } => {
            if !quiet && verbose >= 1 {
                eprintln!(
                    "{}",
                    format!(
                        "[{}/{}] processing {:.2}s of audio",
                        index + 1,
                        total,
                        *duration_ms as f64 / 1000.0
                    )
                    .dimmed()
                );
            }
        }
        PipelineEvent::ChunkTranscribed { index: _, text } => {
            if !quiet {
                eprintln!("{}", text.trim_end());
            }
        }
        PipelineEvent::ChunkUnintelligible { index } => {
            if !quiet {
                eprintln!(
                    "{}",
                    format!("chunk {}: no recognizable speech", index + 1).dimmed()
                );
            }
        }
        PipelineEvent::ChunkSkipped { index, error } => {
            // Always shown: a skipped chunk is missing from the transcript.
            eprintln!(
                "{}",
                format!("chunk {} skipped: {}", index + 1, error).yellow()
            );
        }
        PipelineEvent::NoSpeechFound => {
            if !quiet {
                eprintln!("No speech detected in the input");
            }
        }
        PipelineEvent::Completed {
            transcribed,
            skipped,
        } => {
            if !quiet {
                let line = format!("Done: {} transcribed, {} skipped", transcribed, skipped);
                if *skipped == 0 {
                    eprintln!("{}", line.green());
                } else {
                    eprintln!("{}", line.yellow());
                }
            }
        }
    }
}

/// Where the transcript for `input` goes: `--output` if given, otherwise
/// `<input stem>.txt` beside the input.
pub fn transcript_path(input: &Path, output: Option<&Path>) -> PathBuf {
    match output {
        Some(path) => path.to_path_buf(),
        None => input.with_extension("txt"),
    }
}

/// Write the transcript and return the path it was written to.
pub fn write_transcript(input: &Path, output: Option<&Path>, text: &str) -> Result<PathBuf> {
    let path = transcript_path(input, output);
    fs::write(&path, text)?;
    Ok(path)
}
