pub mod audio;
pub mod config;
pub mod error;
pub mod rpc;
pub mod session;

pub use audio::{FrameSource, OutboundMessage, PacedRequestProducer};
pub use config::{Cli, Settings};
pub use error::{ClientError, ErrorKind};
pub use rpc::{Connector, GrpcConnector, GrpcRecognizer, RecognizerClient, ResponseStream};
pub use session::{
    Alternative, RecognitionConfig, RunSummary, SessionConfig, SessionOrchestrator, SessionOutcome,
    SessionReport, StreamSession, TranscriptWriter, TranscriptionResult, WordInfo,
};
