use hound::{SampleFormat, WavReader};
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::error::{ClientError, Result};

/// Sequential reader over the raw PCM frames of a WAV file.
///
/// Chunks are returned as the little-endian sample bytes stored in the
/// container, so they can be forwarded as LINEAR_PCM audio content unchanged.
/// Each session owns its own instance; `reopen` starts over from the first
/// frame.
pub struct FrameSource {
    path: PathBuf,
    reader: WavReader<BufReader<File>>,
    sample_rate: u32,
    channels: u16,
    bits_per_sample: u16,
    frame_count: u32,
    frames_read: u32,
}

impl FrameSource {
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        let reader = WavReader::open(&path).map_err(|source| ClientError::AudioOpen {
            path: path.clone(),
            source,
        })?;

        let spec = reader.spec();
        if spec.sample_format != SampleFormat::Int {
            return Err(ClientError::UnsupportedAudio {
                path,
                reason: "float samples are not LINEAR_PCM".to_string(),
            });
        }
        if !matches!(spec.bits_per_sample, 8 | 16 | 24 | 32) {
            return Err(ClientError::UnsupportedAudio {
                path,
                reason: format!("{} bits per sample", spec.bits_per_sample),
            });
        }
        if spec.sample_rate == 0 || spec.channels == 0 {
            return Err(ClientError::UnsupportedAudio {
                path,
                reason: "sample rate and channel count must be non-zero".to_string(),
            });
        }

        let frame_count = reader.duration();

        debug!(
            "Opened {}: {}Hz, {} channels, {} bits, {} frames",
            path.display(),
            spec.sample_rate,
            spec.channels,
            spec.bits_per_sample,
            frame_count
        );

        Ok(Self {
            path,
            reader,
            sample_rate: spec.sample_rate,
            channels: spec.channels,
            bits_per_sample: spec.bits_per_sample,
            frame_count,
            frames_read: 0,
        })
    }

    /// Open a fresh reader over the same file, positioned at the first frame.
    pub fn reopen(&self) -> Result<Self> {
        Self::open(&self.path)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn channels(&self) -> u16 {
        self.channels
    }

    pub fn frame_count(&self) -> u32 {
        self.frame_count
    }

    /// Duration in seconds (frame count / sample rate).
    pub fn duration_seconds(&self) -> f64 {
        self.frame_count as f64 / self.sample_rate as f64
    }

    /// Read up to `frames` frames of raw PCM.
    ///
    /// Returns `None` once every frame has been read.
    pub fn read_chunk(&mut self, frames: usize) -> Result<Option<Vec<u8>>> {
        let remaining = (self.frame_count - self.frames_read) as usize;
        let frames = frames.min(remaining);
        if frames == 0 {
            return Ok(None);
        }

        let sample_bytes = (self.bits_per_sample / 8) as usize;
        let wanted = frames * self.channels as usize;
        let mut bytes = Vec::with_capacity(wanted * sample_bytes);

        for sample in self.reader.samples::<i32>().take(wanted) {
            let sample = sample.map_err(|source| ClientError::AudioRead {
                path: self.path.clone(),
                source,
            })?;
            push_sample(&mut bytes, sample, self.bits_per_sample);
        }

        let read_frames = bytes.len() / (sample_bytes * self.channels as usize);
        if read_frames == 0 {
            return Ok(None);
        }
        self.frames_read += read_frames as u32;

        Ok(Some(bytes))
    }
}

fn push_sample(bytes: &mut Vec<u8>, sample: i32, bits_per_sample: u16) {
    match bits_per_sample {
        // 8-bit WAV is stored unsigned
        8 => bytes.push((sample + 128) as u8),
        16 => bytes.extend_from_slice(&(sample as i16).to_le_bytes()),
        24 => bytes.extend_from_slice(&sample.to_le_bytes()[..3]),
        _ => bytes.extend_from_slice(&sample.to_le_bytes()),
    }
}
