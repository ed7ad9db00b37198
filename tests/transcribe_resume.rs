//! End-to-end pipeline tests against a WAV file on disk.
//!
//! Covers the full flow the CLI drives: decode → segment → recognize →
//! checkpoint → assemble → write, including resuming from a sidecar
//! checkpoint left by an interrupted run.

use audioscribe::audio::wav;
use audioscribe::checkpoint::store::{Checkpoint, JsonProgressStore, ProgressStore, source_identity};
use audioscribe::defaults;
use audioscribe::output;
use audioscribe::pipeline::orchestrator::TranscriptionPipeline;
use audioscribe::stt::client::ScriptedService;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

const RATE: u32 = 16000;
const SPEECH: i16 = 3000;

fn tone(ms: u32, amplitude: i16) -> Vec<i16> {
    vec![amplitude; (RATE as usize * ms as usize) / 1000]
}

/// Writes a WAV fixture with `bursts` speech segments separated by 600ms
/// of near-silence, returning its path.
fn write_fixture(dir: &Path, bursts: usize) -> PathBuf {
    let quiet = (10f64.powf(-45.0 / 20.0) * i16::MAX as f64) as i16;
    let mut samples = Vec::new();
    for i in 0..bursts {
        if i > 0 {
            samples.extend(tone(600, quiet));
        }
        samples.extend(tone(500, SPEECH));
    }

    let path = dir.join("talk.wav");
    let bytes = wav::encode_wav(&samples, RATE).expect("Failed to encode fixture");
    std::fs::write(&path, bytes).expect("Failed to write fixture");
    path
}

#[tokio::test]
async fn test_transcribe_file_end_to_end() {
    let dir = TempDir::new().expect("tempdir");
    let input = write_fixture(dir.path(), 2);

    let audio = wav::decode_file(&input).expect("Failed to decode fixture");
    let source_id = source_identity(&input).expect("Failed to resolve source identity");
    let store = JsonProgressStore::beside(&input);
    let checkpoint_path = store.path().to_path_buf();

    let service = ScriptedService::new("scripted")
        .then_text("hello world")
        .then_text("goodbye now");
    let pipeline = TranscriptionPipeline::new(service, store);

    let summary = pipeline.run(&audio, &source_id).await.expect("run failed");
    assert_eq!(summary.transcript, "Hello world. Goodbye now. ");
    assert_eq!(summary.total_chunks, 2);

    // Write the transcript the way the CLI does
    let written = output::write_transcript(&input, None, &summary.transcript)
        .expect("Failed to write transcript");
    assert_eq!(written, dir.path().join("talk.txt"));
    assert_eq!(
        std::fs::read_to_string(written).expect("read transcript"),
        "Hello world. Goodbye now. "
    );

    // No checkpoint survives a completed run
    assert!(!checkpoint_path.exists());
}

#[tokio::test]
async fn test_resume_from_sidecar_checkpoint() {
    let dir = TempDir::new().expect("tempdir");
    let input = write_fixture(dir.path(), 5);

    let audio = wav::decode_file(&input).expect("Failed to decode fixture");
    let source_id = source_identity(&input).expect("Failed to resolve source identity");

    // An interrupted run attempted chunks 0..=2 and saved this state.
    let store = JsonProgressStore::beside(&input);
    store
        .save(&Checkpoint {
            source_id: source_id.clone(),
            last_index: 2,
            fragments: vec![
                "Part one. ".to_string(),
                "Part two. ".to_string(),
                "Part three. ".to_string(),
            ],
        })
        .expect("Failed to seed checkpoint");

    let service = ScriptedService::new("resumed")
        .then_text("part four")
        .then_text("part five");
    let pipeline = TranscriptionPipeline::new(service, store);

    let summary = pipeline.run(&audio, &source_id).await.expect("run failed");

    assert_eq!(summary.resumed_at, Some(3));
    assert_eq!(
        summary.transcript,
        "Part one. Part two. Part three. Part four. Part five. "
    );
    // Only the remaining chunks were attempted this run
    assert_eq!(
        summary.transcribed + summary.unintelligible + summary.skipped,
        2
    );
    assert!(!JsonProgressStore::beside(&input).path().exists());
}

#[tokio::test]
async fn test_checkpoint_for_other_file_is_ignored() {
    let dir = TempDir::new().expect("tempdir");
    let input = write_fixture(dir.path(), 2);

    let audio = wav::decode_file(&input).expect("Failed to decode fixture");
    let source_id = source_identity(&input).expect("Failed to resolve source identity");

    let store = JsonProgressStore::beside(&input);
    store
        .save(&Checkpoint {
            source_id: "/somewhere/else.wav".to_string(),
            last_index: 0,
            fragments: vec!["Stale. ".to_string()],
        })
        .expect("Failed to seed checkpoint");

    let service = ScriptedService::new("fresh")
        .then_text("hello world")
        .then_text("goodbye now");
    let pipeline = TranscriptionPipeline::new(service, store);

    let summary = pipeline.run(&audio, &source_id).await.expect("run failed");

    assert_eq!(summary.resumed_at, None);
    assert_eq!(summary.transcript, "Hello world. Goodbye now. ");
}

#[tokio::test]
async fn test_silent_file_reports_no_speech() {
    let dir = TempDir::new().expect("tempdir");
    let path = dir.path().join("quiet.wav");
    let bytes = wav::encode_wav(&tone(2000, 0), RATE).expect("Failed to encode fixture");
    std::fs::write(&path, bytes).expect("Failed to write fixture");

    let audio = wav::decode_file(&path).expect("Failed to decode fixture");
    let source_id = source_identity(&path).expect("Failed to resolve source identity");
    let store = JsonProgressStore::beside(&path);
    let checkpoint_path = store.path().to_path_buf();

    let pipeline = TranscriptionPipeline::new(ScriptedService::new("unused"), store);
    let summary = pipeline.run(&audio, &source_id).await.expect("run failed");

    assert_eq!(summary.transcript, defaults::NO_SPEECH_TEXT);
    assert_eq!(summary.total_chunks, 0);
    assert!(!checkpoint_path.exists());
}
