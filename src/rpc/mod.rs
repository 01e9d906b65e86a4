pub mod client;
pub mod messages;

pub use client::{Connector, GrpcConnector, GrpcRecognizer, RecognizerClient, ResponseStream};
pub use messages::{StreamingRecognizeRequest, StreamingRecognizeResponse};
