use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Summary of a session that ran to completion
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionReport {
    pub session_id: usize,

    pub output_path: PathBuf,

    /// Audio chunks handed to the stream, across all iterations
    pub chunks_sent: u64,

    pub interim_results: usize,

    pub final_results: usize,

    pub elapsed: Duration,
}

/// A word and its position in the audio, in milliseconds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WordInfo {
    pub word: String,
    pub start_time_ms: f32,
    pub end_time_ms: f32,
}

/// One ranked hypothesis for a segment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Alternative {
    pub transcript: String,
    pub words: Vec<WordInfo>,
}

/// A transcription result received from the service.
///
/// Interim results may be superseded by later ones; a final result closes
/// its segment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranscriptionResult {
    pub is_final: bool,
    pub alternatives: Vec<Alternative>,
}

impl TranscriptionResult {
    pub fn interim(transcript: impl Into<String>) -> Self {
        Self {
            is_final: false,
            alternatives: vec![Alternative {
                transcript: transcript.into(),
                words: Vec::new(),
            }],
        }
    }

    pub fn final_result(alternatives: Vec<Alternative>) -> Self {
        Self {
            is_final: true,
            alternatives,
        }
    }
}
