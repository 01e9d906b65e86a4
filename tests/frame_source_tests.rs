// Integration tests for reading raw PCM chunks out of WAV files

mod common;

use anyhow::Result;
use std::path::PathBuf;
use streaming_asr_client::{ClientError, FrameSource};
use tempfile::TempDir;

#[test]
fn test_open_reports_rate_frames_and_duration() -> Result<()> {
    let dir = TempDir::new()?;
    let path = common::write_wav(dir.path(), "speech.wav", 16000, 1, 24000);

    let source = FrameSource::open(&path)?;

    assert_eq!(source.sample_rate(), 16000);
    assert_eq!(source.channels(), 1);
    assert_eq!(source.frame_count(), 24000);
    assert!((source.duration_seconds() - 1.5).abs() < 1e-9);

    Ok(())
}

#[test]
fn test_chunks_cover_file_then_eof() -> Result<()> {
    let dir = TempDir::new()?;
    // 4000 frames = 2 full chunks of 1600 + 800
    let path = common::write_wav(dir.path(), "speech.wav", 16000, 1, 4000);
    let mut source = FrameSource::open(&path)?;

    let sizes: Vec<usize> = std::iter::from_fn(|| source.read_chunk(1600).unwrap())
        .map(|chunk| chunk.len())
        .collect();

    assert_eq!(sizes, vec![3200, 3200, 1600]);
    assert!(source.read_chunk(1600)?.is_none(), "EOF should be sticky");

    Ok(())
}

#[test]
fn test_chunk_bytes_are_little_endian_pcm() -> Result<()> {
    let dir = TempDir::new()?;
    let path = common::write_wav(dir.path(), "ramp.wav", 8000, 1, 4);
    let mut source = FrameSource::open(&path)?;

    let chunk = source.read_chunk(16)?.unwrap();
    assert_eq!(chunk, vec![0, 0, 1, 0, 2, 0, 3, 0]);

    Ok(())
}

#[test]
fn test_stereo_chunk_counts_frames_not_samples() -> Result<()> {
    let dir = TempDir::new()?;
    let path = common::write_wav(dir.path(), "stereo.wav", 44100, 2, 1000);
    let mut source = FrameSource::open(&path)?;

    assert_eq!(source.frame_count(), 1000);
    // 400 frames * 2 channels * 2 bytes
    assert_eq!(source.read_chunk(400)?.unwrap().len(), 1600);

    Ok(())
}

#[test]
fn test_reopen_yields_identical_chunks() -> Result<()> {
    let dir = TempDir::new()?;
    let path = common::write_wav(dir.path(), "speech.wav", 16000, 1, 5000);

    let mut first = FrameSource::open(&path)?;
    let first_chunks: Vec<Vec<u8>> = std::iter::from_fn(|| first.read_chunk(1600).unwrap()).collect();

    let mut second = first.reopen()?;
    let second_chunks: Vec<Vec<u8>> = std::iter::from_fn(|| second.read_chunk(1600).unwrap()).collect();

    assert_eq!(first_chunks.len(), 4);
    assert_eq!(first_chunks, second_chunks);

    Ok(())
}

#[test]
fn test_open_nonexistent_file_fails() {
    let result = FrameSource::open(PathBuf::from("/nonexistent/path/to/audio.wav"));
    assert!(matches!(result, Err(ClientError::AudioOpen { .. })));
}

#[test]
fn test_open_non_wav_file_fails() -> Result<()> {
    let dir = TempDir::new()?;
    let path = dir.path().join("notes.txt");
    std::fs::write(&path, "definitely not a RIFF header")?;

    let result = FrameSource::open(&path);
    assert!(matches!(result, Err(ClientError::AudioOpen { .. })));

    Ok(())
}

#[test]
fn test_float_wav_is_unsupported() -> Result<()> {
    let dir = TempDir::new()?;
    let path = dir.path().join("float.wav");
    let spec = hound::WavSpec {
        channels: 1,
        sample_rate: 16000,
        bits_per_sample: 32,
        sample_format: hound::SampleFormat::Float,
    };
    let mut writer = hound::WavWriter::create(&path, spec)?;
    writer.write_sample(0.25f32)?;
    writer.finalize()?;

    let result = FrameSource::open(&path);
    assert!(matches!(result, Err(ClientError::UnsupportedAudio { .. })));

    Ok(())
}

#[test]
fn test_truncated_data_is_read_error() -> Result<()> {
    let dir = TempDir::new()?;
    let path = common::write_wav(dir.path(), "cut.wav", 16000, 1, 16000);
    // keep the header and 5000 of the 16000 samples
    let header_len = std::fs::metadata(&path)?.len() - 32000;
    common::truncate(&path, header_len + 10000);

    let mut source = FrameSource::open(&path)?;
    for _ in 0..3 {
        assert!(source.read_chunk(1600)?.is_some());
    }
    let err = source.read_chunk(1600).unwrap_err();
    assert!(matches!(err, ClientError::AudioRead { .. }));

    Ok(())
}
