//! Splits decoded audio into speech-bounded chunks at silence gaps.
//!
//! The audio is scanned in fixed analysis frames; a contiguous span of
//! frames below the silence threshold that lasts at least the minimum
//! silence duration splits the recording. Each emitted chunk keeps a bit of
//! surrounding silence so word onsets and offsets are not clipped.

use crate::audio::level;
use crate::audio::wav::DecodedAudio;
use crate::defaults;
use crate::segment::chunk::AudioChunk;
use std::ops::Range;

/// Configuration for the segmenter.
#[derive(Debug, Clone, Copy)]
pub struct SegmenterConfig {
    /// Frames below this RMS level (dBFS) count as silent.
    pub silence_threshold_dbfs: f32,
    /// Minimum silence duration (ms) for a gap to split the audio.
    pub min_silence_ms: u32,
    /// Silence padding (ms) retained on each side of a chunk.
    pub keep_silence_ms: u32,
    /// Analysis frame duration (ms).
    pub frame_ms: u32,
}

impl Default for SegmenterConfig {
    fn default() -> Self {
        Self {
            silence_threshold_dbfs: defaults::SILENCE_THRESHOLD_DBFS,
            min_silence_ms: defaults::MIN_SILENCE_MS,
            keep_silence_ms: defaults::KEEP_SILENCE_MS,
            frame_ms: defaults::FRAME_MS,
        }
    }
}

/// Silence-based audio splitter.
pub struct Segmenter {
    config: SegmenterConfig,
}

impl Segmenter {
    /// Creates a segmenter with default configuration.
    pub fn new() -> Self {
        Self::with_config(SegmenterConfig::default())
    }

    /// Creates a segmenter with custom configuration.
    pub fn with_config(config: SegmenterConfig) -> Self {
        Self { config }
    }

    /// Segments decoded audio into an ordered, lazily-yielded chunk sequence.
    ///
    /// The sequence is re-derivable: segmenting the same audio twice yields
    /// identical chunks. Fully silent or empty input yields zero chunks;
    /// audio without a qualifying silence gap yields a single chunk covering
    /// the whole recording.
    pub fn segment<'a>(&self, audio: &'a DecodedAudio) -> Chunks<'a> {
        Chunks {
            samples: &audio.samples,
            sample_rate: audio.sample_rate,
            spans: self.speech_spans(audio),
            next: 0,
        }
    }

    /// Computes padded speech spans as sample ranges.
    fn speech_spans(&self, audio: &DecodedAudio) -> Vec<Range<usize>> {
        let total = audio.samples.len();
        let spf = samples_per_frame(audio.sample_rate, self.config.frame_ms);
        if total == 0 || spf == 0 {
            return Vec::new();
        }

        let silent: Vec<bool> = audio
            .samples
            .chunks(spf)
            .map(|frame| level::dbfs(frame) < self.config.silence_threshold_dbfs)
            .collect();

        // No frame above the threshold means no speech at all.
        if !silent.iter().any(|&s| !s) {
            return Vec::new();
        }

        let min_frames = self.config.min_silence_ms.div_ceil(self.config.frame_ms) as usize;
        let runs = qualifying_runs(&silent, min_frames);

        // Speech frame spans are the complement of the qualifying runs.
        let mut frame_spans: Vec<Range<usize>> = Vec::new();
        let mut cursor = 0usize;
        for run in &runs {
            if run.start > cursor {
                frame_spans.push(cursor..run.start);
            }
            cursor = run.end;
        }
        if cursor < silent.len() {
            frame_spans.push(cursor..silent.len());
        }

        let pad = (self.config.keep_silence_ms as usize * audio.sample_rate as usize) / 1000;
        let frame_count = silent.len();

        frame_spans
            .into_iter()
            .map(|span| {
                let mut start = span.start * spf;
                let mut end = (span.end * spf).min(total);

                // Extend left into a preceding silence run. Between two
                // chunks the extension stops at the run midpoint; a run at
                // the very start of the audio belongs to this chunk alone.
                if let Some(run) = runs.iter().find(|r| r.end == span.start) {
                    let run_len = run_samples(run, spf, total);
                    let budget = if run.start == 0 { run_len } else { run_len / 2 };
                    start -= pad.min(budget);
                }

                // Extend right into a following silence run, symmetrically.
                if let Some(run) = runs.iter().find(|r| r.start == span.end) {
                    let run_len = run_samples(run, spf, total);
                    let budget = if run.end == frame_count {
                        run_len
                    } else {
                        run_len / 2
                    };
                    end = (end + pad.min(budget)).min(total);
                }

                start..end
            })
            .collect()
    }
}

impl Default for Segmenter {
    fn default() -> Self {
        Self::new()
    }
}

fn samples_per_frame(sample_rate: u32, frame_ms: u32) -> usize {
    ((sample_rate as u64 * frame_ms as u64) / 1000) as usize
}

/// Length of a frame-indexed silence run in samples, clamped to the buffer.
fn run_samples(run: &Range<usize>, spf: usize, total: usize) -> usize {
    let start = run.start * spf;
    let end = (run.end * spf).min(total);
    end.saturating_sub(start)
}

/// Maximal runs of silent frames at least `min_frames` long.
fn qualifying_runs(silent: &[bool], min_frames: usize) -> Vec<Range<usize>> {
    let mut runs = Vec::new();
    let mut i = 0;
    while i < silent.len() {
        if silent[i] {
            let start = i;
            while i < silent.len() && silent[i] {
                i += 1;
            }
            if i - start >= min_frames {
                runs.push(start..i);
            }
        } else {
            i += 1;
        }
    }
    runs
}

/// Lazy iterator over the segmented chunks.
///
/// Spans are computed up front; chunk sample buffers are only copied out
/// when a chunk is actually yielded, so already-completed chunks can be
/// skipped cheaply on resume via [`Iterator::nth`].
pub struct Chunks<'a> {
    samples: &'a [i16],
    sample_rate: u32,
    spans: Vec<Range<usize>>,
    next: usize,
}

impl Iterator for Chunks<'_> {
    type Item = AudioChunk;

    fn next(&mut self) -> Option<AudioChunk> {
        let span = self.spans.get(self.next)?.clone();
        let chunk = AudioChunk {
            index: self.next,
            samples: self.samples[span].to_vec(),
            sample_rate: self.sample_rate,
        };
        self.next += 1;
        Some(chunk)
    }

    fn nth(&mut self, n: usize) -> Option<AudioChunk> {
        self.next = self.next.saturating_add(n).min(self.spans.len());
        self.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.spans.len() - self.next;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for Chunks<'_> {}
