use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Audio encoding announced to the recognition service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Encoding {
    LinearPcm,
}

/// Recognition parameters sent as the first message of every stream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecognitionConfig {
    pub encoding: Encoding,
    pub sample_rate_hertz: u32,
    pub language_code: String,
    pub max_alternatives: u32,
    pub enable_automatic_punctuation: bool,
    pub enable_word_time_offsets: bool,
    /// Always requested; the renderer distinguishes interim from final results.
    pub interim_results: bool,
}

/// Configuration shared read-only by every session of a run.
///
/// Each session receives its own clone at launch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// PCM WAV file streamed by every session
    pub input_file: PathBuf,

    /// Number of times each session replays the file
    pub num_iterations: u32,

    /// Pace chunks to the audio's real-time rate
    pub simulate_realtime: bool,

    /// Frames per outbound audio chunk
    pub chunk_frames: usize,

    pub language_code: String,

    pub max_alternatives: u32,

    pub automatic_punctuation: bool,

    /// Append a word timing table to every final result
    pub word_time_offsets: bool,

    /// Directory receiving `output_<id>.txt`
    pub output_dir: PathBuf,
}

impl SessionConfig {
    pub const DEFAULT_CHUNK_FRAMES: usize = 1600;

    /// Build the recognition config for audio at `sample_rate_hertz`.
    pub fn recognition_config(&self, sample_rate_hertz: u32) -> RecognitionConfig {
        RecognitionConfig {
            encoding: Encoding::LinearPcm,
            sample_rate_hertz,
            language_code: self.language_code.clone(),
            max_alternatives: self.max_alternatives,
            enable_automatic_punctuation: self.automatic_punctuation,
            enable_word_time_offsets: self.word_time_offsets,
            interim_results: true,
        }
    }

    pub fn output_path(&self, session_id: usize) -> PathBuf {
        self.output_dir.join(format!("output_{}.txt", session_id))
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            input_file: PathBuf::new(),
            num_iterations: 1,
            simulate_realtime: false,
            chunk_frames: Self::DEFAULT_CHUNK_FRAMES,
            language_code: "en-US".to_string(),
            max_alternatives: 1,
            automatic_punctuation: false,
            word_time_offsets: false,
            output_dir: PathBuf::from("."),
        }
    }
}
