//! WAV decoding for the transcription pipeline.
//!
//! Reads a WAV file into mono 16-bit PCM at its native sample rate,
//! averaging multi-channel audio down to one channel. Also encodes chunk
//! samples back into an in-memory WAV for the recognition service.

use crate::error::{Result, ScribeError};
use std::io::{Cursor, Read, Seek};
use std::path::Path;

/// Decoded audio ready for segmentation: mono samples at the source rate.
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedAudio {
    /// Mono 16-bit PCM samples.
    pub samples: Vec<i16>,
    /// Sample rate in Hz.
    pub sample_rate: u32,
    /// Channel count of the source file before downmixing.
    pub source_channels: u16,
}

impl DecodedAudio {
    /// Duration of the decoded audio in seconds.
    pub fn duration_secs(&self) -> f64 {
        if self.sample_rate == 0 {
            return 0.0;
        }
        self.samples.len() as f64 / self.sample_rate as f64
    }

    /// Duration of the decoded audio in milliseconds.
    pub fn duration_ms(&self) -> u64 {
        (self.duration_secs() * 1000.0).round() as u64
    }
}

/// Decode a WAV file into mono PCM.
///
/// Multi-channel audio is downmixed by averaging channels. Any parse or
/// format failure aborts the run before segmentation.
pub fn decode_file(path: &Path) -> Result<DecodedAudio> {
    let file = std::fs::File::open(path).map_err(|e| ScribeError::Decode {
        path: path.display().to_string(),
        message: e.to_string(),
    })?;
    decode_reader(std::io::BufReader::new(file), &path.display().to_string())
}

/// Decode WAV data from any reader (for testing/flexibility).
pub fn decode_reader<R: Read>(reader: R, label: &str) -> Result<DecodedAudio> {
    let mut wav_reader = hound::WavReader::new(reader).map_err(|e| ScribeError::Decode {
        path: label.to_string(),
        message: e.to_string(),
    })?;

    let spec = wav_reader.spec();
    let channels = spec.channels;
    if channels == 0 {
        return Err(ScribeError::Decode {
            path: label.to_string(),
            message: "WAV header declares zero channels".to_string(),
        });
    }

    let raw_samples: Vec<i16> = wav_reader
        .samples::<i16>()
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(|e| ScribeError::Decode {
            path: label.to_string(),
            message: e.to_string(),
        })?;

    Ok(DecodedAudio {
        samples: downmix(&raw_samples, channels),
        sample_rate: spec.sample_rate,
        source_channels: channels,
    })
}

/// Average interleaved channels into mono.
fn downmix(raw: &[i16], channels: u16) -> Vec<i16> {
    if channels <= 1 {
        return raw.to_vec();
    }
    let channels = channels as usize;
    raw.chunks_exact(channels)
        .map(|frame| {
            let sum: i32 = frame.iter().map(|&s| s as i32).sum();
            (sum / channels as i32) as i16
        })
        .collect()
}

/// Encode mono PCM samples as an in-memory WAV payload.
pub fn encode_wav(samples: &[i16], sample_rate: u32) -> Result<Vec<u8>> {
    let spec = hound::WavSpec {
        channels: 1,
        sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };

    let mut cursor = Cursor::new(Vec::new());
    write_wav(&mut cursor, spec, samples).map_err(|e| ScribeError::Other(format!(
        "Failed to encode WAV payload: {e}"
    )))?;
    Ok(cursor.into_inner())
}

fn write_wav<W: std::io::Write + Seek>(
    writer: &mut W,
    spec: hound::WavSpec,
    samples: &[i16],
) -> std::result::Result<(), hound::Error> {
    let mut wav_writer = hound::WavWriter::new(writer, spec)?;
    for &sample in samples {
        wav_writer.write_sample(sample)?;
    }
    wav_writer.finalize()
}
