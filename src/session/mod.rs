//! Streaming recognition sessions
//!
//! This module provides:
//! - `StreamSession`: one bidirectional stream, fed by a paced producer,
//!   rendering results into its own output file
//! - `SessionOrchestrator`: fans out N sessions and joins them
//! - `TranscriptWriter`: the text format of `output_<id>.txt`

mod config;
mod orchestrator;
mod render;
mod session;
mod stats;

pub use config::{Encoding, RecognitionConfig, SessionConfig};
pub use orchestrator::{RunSummary, SessionOrchestrator, SessionOutcome};
pub use render::TranscriptWriter;
pub use session::StreamSession;
pub use stats::{Alternative, SessionReport, TranscriptionResult, WordInfo};
