use std::fmt;
use std::path::PathBuf;

/// Error category used when reporting a failed session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Config,
    AudioRead,
    Transport,
    OutputWrite,
    Aborted,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ErrorKind::Config => "config",
            ErrorKind::AudioRead => "audio read",
            ErrorKind::Transport => "transport",
            ErrorKind::OutputWrite => "output write",
            ErrorKind::Aborted => "aborted",
        };
        f.write_str(name)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// Invalid or missing settings, detected before any session starts.
    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("failed to load settings: {0}")]
    Settings(#[from] config::ConfigError),

    #[error("failed to open audio file {path}: {source}")]
    AudioOpen {
        path: PathBuf,
        #[source]
        source: hound::Error,
    },

    #[error("failed to read audio from {path}: {source}")]
    AudioRead {
        path: PathBuf,
        #[source]
        source: hound::Error,
    },

    #[error("unsupported audio in {path}: {reason}")]
    UnsupportedAudio { path: PathBuf, reason: String },

    #[error("failed to connect to {uri}: {source}")]
    Connect {
        uri: String,
        #[source]
        source: tonic::transport::Error,
    },

    #[error("invalid service uri {uri}: {reason}")]
    InvalidUri { uri: String, reason: String },

    /// Stream reset or error status returned by the service.
    #[error("transport error: {0}")]
    Transport(#[from] tonic::Status),

    #[error("failed to write output {path}: {source}")]
    OutputWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("session task aborted: {0}")]
    Aborted(String),
}

impl ClientError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ClientError::Config(_) | ClientError::Settings(_) => ErrorKind::Config,
            ClientError::AudioOpen { .. }
            | ClientError::AudioRead { .. }
            | ClientError::UnsupportedAudio { .. } => ErrorKind::AudioRead,
            ClientError::Connect { .. }
            | ClientError::InvalidUri { .. }
            | ClientError::Transport(_) => ErrorKind::Transport,
            ClientError::OutputWrite { .. } => ErrorKind::OutputWrite,
            ClientError::Aborted(_) => ErrorKind::Aborted,
        }
    }
}

pub type Result<T> = std::result::Result<T, ClientError>;
