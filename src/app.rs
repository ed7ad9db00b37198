//! Composition root: wires config, input selection, the recognition client,
//! the progress store, and the pipeline together for the CLI.

use crate::audio::wav::{self, DecodedAudio};
use crate::checkpoint::store::{JsonProgressStore, ProgressStore, source_identity};
use crate::config::Config;
use crate::error::{Result, ScribeError};
use crate::output;
use crate::pipeline::orchestrator::{PipelineConfig, TranscriptionPipeline};
use crate::stt::http::{HttpServiceConfig, HttpSpeechService};
use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Transcribe one audio file end to end.
///
/// `path` may be a file or a directory; directories present a numbered menu
/// on stderr. The transcript lands beside the input unless `output_path`
/// overrides it.
pub async fn run_transcribe_command(
    config: Config,
    path: &Path,
    output_path: Option<&Path>,
    fresh: bool,
    quiet: bool,
    verbose: u8,
) -> Result<()> {
    let Some(input) = resolve_input(path)? else {
        eprintln!("No file selected.");
        return Ok(());
    };

    let audio = wav::decode_file(&input)?;
    if !quiet {
        report_input(&input, &audio);
    }

    let source_id = source_identity(&input)?;
    let store = JsonProgressStore::beside(&input);
    if fresh {
        store.clear(&source_id)?;
    }

    let service = HttpSpeechService::new(HttpServiceConfig {
        endpoint: config.service.endpoint.clone(),
        api_key: config.service.api_key.clone(),
        language: config.service.language.clone(),
        timeout: Duration::from_secs(config.service.timeout_secs),
    })?;

    let pipeline =
        TranscriptionPipeline::with_config(service, store, PipelineConfig::from_config(&config));
    let summary = pipeline
        .run_with_observer(&audio, &source_id, |event| {
            output::render_event(event, quiet, verbose)
        })
        .await?;

    let written = output::write_transcript(&input, output_path, &summary.transcript)?;
    if !quiet {
        eprintln!("Transcript saved to {}", written.display());
    }

    Ok(())
}

/// Lists the WAV files in a directory, sorted by name.
pub fn list_audio_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files: Vec<PathBuf> = std::fs::read_dir(dir)?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.is_file() && has_wav_extension(path))
        .collect();
    files.sort();
    Ok(files)
}

fn has_wav_extension(path: &Path) -> bool {
    path.extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("wav"))
}

/// Resolves a file-or-directory argument to a single audio file.
///
/// Returns `None` if the user declined to pick one.
pub fn resolve_input(path: &Path) -> Result<Option<PathBuf>> {
    if !path.is_dir() {
        return Ok(Some(path.to_path_buf()));
    }

    let files = list_audio_files(path)?;
    if files.is_empty() {
        return Err(ScribeError::NoAudioFiles {
            dir: path.display().to_string(),
        });
    }

    let stdin = std::io::stdin();
    select_file(&files, stdin.lock())
}

/// Presents a numbered menu on stderr and reads the selection.
fn select_file<R: BufRead>(files: &[PathBuf], mut input: R) -> Result<Option<PathBuf>> {
    eprintln!();
    eprintln!("Available audio files:");
    for (i, file) in files.iter().enumerate() {
        let name = file
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| file.display().to_string());
        eprintln!("  {}. {}", i + 1, name);
    }

    loop {
        eprint!("\nEnter the number of the file to process (or 'q' to quit): ");
        let _ = std::io::stderr().flush();

        let mut line = String::new();
        if input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        let choice = line.trim();
        if choice.eq_ignore_ascii_case("q") {
            return Ok(None);
        }
        match choice.parse::<usize>() {
            Ok(n) if (1..=files.len()).contains(&n) => return Ok(Some(files[n - 1].clone())),
            _ => eprintln!(
                "Please enter a number between 1 and {} or 'q' to quit",
                files.len()
            ),
        }
    }
}

/// Prints a short validation report for the selected input.
fn report_input(input: &Path, audio: &DecodedAudio) {
    if let Ok(metadata) = std::fs::metadata(input) {
        eprintln!(
            "File size: {:.2} MB",
            metadata.len() as f64 / (1024.0 * 1024.0)
        );
    }
    eprintln!("Duration: {:.2} s", audio.duration_secs());
    eprintln!("Channels: {}", audio.source_channels);
    eprintln!("Sample rate: {} Hz", audio.sample_rate);
}
