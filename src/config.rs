use clap::Parser;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::{ClientError, Result};
use crate::session::SessionConfig;

/// Streaming transcription against a remote speech recognition service
#[derive(Debug, Default, Parser)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Number of concurrent client sessions
    #[arg(long)]
    pub num_clients: Option<usize>,

    /// Number of iterations over the file
    #[arg(long)]
    pub num_iterations: Option<u32>,

    /// Name of the WAV file with LINEAR_PCM encoding to transcribe
    #[arg(long)]
    pub input_file: Option<PathBuf>,

    /// Pace audio chunks to simulate realtime transcription
    #[arg(long)]
    pub simulate_realtime: bool,

    /// Output word timestamps
    #[arg(long)]
    pub word_time_offsets: bool,

    /// Maximum number of alternative transcripts to return (up to limit configured on server)
    #[arg(long)]
    pub max_alternatives: Option<u32>,

    /// Request automatically punctuated transcripts
    #[arg(long)]
    pub automatic_punctuation: bool,

    /// URI of the recognition service
    #[arg(long)]
    pub service_uri: Option<String>,

    /// Frames per audio chunk
    #[arg(long)]
    pub chunk_frames: Option<usize>,

    #[arg(long)]
    pub language_code: Option<String>,

    /// Directory receiving output_<id>.txt
    #[arg(long)]
    pub output_dir: Option<PathBuf>,

    /// Optional settings file (toml, yaml or json)
    #[arg(long)]
    pub config: Option<PathBuf>,
}

/// Effective settings of one run.
///
/// Layered from lowest to highest precedence: defaults, the optional
/// settings file, `ASR_CLIENT_*` environment variables, command line flags.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    pub num_clients: usize,
    pub num_iterations: u32,
    pub input_file: Option<PathBuf>,
    pub simulate_realtime: bool,
    pub word_time_offsets: bool,
    pub max_alternatives: u32,
    pub automatic_punctuation: bool,
    pub service_uri: String,
    pub chunk_frames: usize,
    pub language_code: String,
    pub output_dir: PathBuf,
}

impl Default for Settings {
    fn default() -> Self {
        let session = SessionConfig::default();
        Self {
            num_clients: 1,
            num_iterations: session.num_iterations,
            input_file: None,
            simulate_realtime: session.simulate_realtime,
            word_time_offsets: session.word_time_offsets,
            max_alternatives: session.max_alternatives,
            automatic_punctuation: session.automatic_punctuation,
            service_uri: "localhost:50051".to_string(),
            chunk_frames: session.chunk_frames,
            language_code: session.language_code,
            output_dir: session.output_dir,
        }
    }
}

impl Settings {
    pub const ENV_PREFIX: &'static str = "ASR_CLIENT";

    pub fn load(cli: &Cli) -> Result<Self> {
        let mut builder = config::Config::builder()
            .add_source(config::Config::try_from(&Settings::default())?);

        if let Some(path) = &cli.config {
            builder = builder.add_source(config::File::from(path.as_path()));
        }

        builder = builder.add_source(
            config::Environment::with_prefix(Self::ENV_PREFIX)
                .prefix_separator("_")
                .try_parsing(true),
        );

        if let Some(n) = cli.num_clients {
            builder = builder.set_override("num_clients", n as i64)?;
        }
        if let Some(n) = cli.num_iterations {
            builder = builder.set_override("num_iterations", n as i64)?;
        }
        if let Some(path) = &cli.input_file {
            builder = builder.set_override("input_file", path.display().to_string())?;
        }
        if cli.simulate_realtime {
            builder = builder.set_override("simulate_realtime", true)?;
        }
        if cli.word_time_offsets {
            builder = builder.set_override("word_time_offsets", true)?;
        }
        if let Some(n) = cli.max_alternatives {
            builder = builder.set_override("max_alternatives", n as i64)?;
        }
        if cli.automatic_punctuation {
            builder = builder.set_override("automatic_punctuation", true)?;
        }
        if let Some(uri) = &cli.service_uri {
            builder = builder.set_override("service_uri", uri.clone())?;
        }
        if let Some(n) = cli.chunk_frames {
            builder = builder.set_override("chunk_frames", n as i64)?;
        }
        if let Some(code) = &cli.language_code {
            builder = builder.set_override("language_code", code.clone())?;
        }
        if let Some(dir) = &cli.output_dir {
            builder = builder.set_override("output_dir", dir.display().to_string())?;
        }

        let settings: Settings = builder.build()?.try_deserialize()?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<()> {
        if self.input_file.is_none() {
            return Err(ClientError::Config("--input-file is required".to_string()));
        }
        if self.num_clients == 0 {
            return Err(ClientError::Config("num_clients must be at least 1".to_string()));
        }
        if self.num_iterations == 0 {
            return Err(ClientError::Config("num_iterations must be at least 1".to_string()));
        }
        if self.max_alternatives == 0 {
            return Err(ClientError::Config("max_alternatives must be at least 1".to_string()));
        }
        if self.chunk_frames == 0 {
            return Err(ClientError::Config("chunk_frames must be at least 1".to_string()));
        }
        Ok(())
    }

    /// Per-session configuration shared by every session of the run.
    pub fn session_config(&self) -> Result<SessionConfig> {
        let input_file = self
            .input_file
            .clone()
            .ok_or_else(|| ClientError::Config("--input-file is required".to_string()))?;

        Ok(SessionConfig {
            input_file,
            num_iterations: self.num_iterations,
            simulate_realtime: self.simulate_realtime,
            chunk_frames: self.chunk_frames,
            language_code: self.language_code.clone(),
            max_alternatives: self.max_alternatives,
            automatic_punctuation: self.automatic_punctuation,
            word_time_offsets: self.word_time_offsets,
            output_dir: self.output_dir.clone(),
        })
    }
}
