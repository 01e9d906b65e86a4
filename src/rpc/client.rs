use async_trait::async_trait;
use futures::stream::{BoxStream, StreamExt};
use tokio_stream::wrappers::ReceiverStream;
use tonic::codec::ProstCodec;
use tonic::codegen::http::uri::PathAndQuery;
use tonic::transport::{Channel, Endpoint};
use tracing::info;

use super::messages::{StreamingRecognizeRequest, StreamingRecognizeResponse};
use crate::error::{ClientError, Result};

const STREAMING_RECOGNIZE_PATH: &str = "/nvidia.jarvis.asr.JarvisASR/StreamingRecognize";

/// Inbound side of a bidirectional recognition stream.
pub type ResponseStream = BoxStream<'static, std::result::Result<StreamingRecognizeResponse, tonic::Status>>;

/// A client able to open bidirectional recognition streams.
///
/// The outbound stream is consumed by the transport concurrently with the
/// returned inbound stream, so a paced producer never blocks result delivery.
#[async_trait]
pub trait RecognizerClient: Send {
    async fn streaming_recognize(
        &mut self,
        requests: ReceiverStream<StreamingRecognizeRequest>,
    ) -> std::result::Result<ResponseStream, tonic::Status>;
}

/// Creates one client per session.
#[async_trait]
pub trait Connector: Send + Sync + 'static {
    type Client: RecognizerClient + 'static;

    async fn connect(&self, session_id: usize) -> Result<Self::Client>;
}

/// gRPC client for the `StreamingRecognize` method.
#[derive(Debug, Clone)]
pub struct GrpcRecognizer {
    inner: tonic::client::Grpc<Channel>,
}

impl GrpcRecognizer {
    pub fn new(channel: Channel) -> Self {
        Self {
            inner: tonic::client::Grpc::new(channel),
        }
    }

    pub async fn connect(uri: &str) -> Result<Self> {
        let uri = normalize_uri(uri);
        info!("Connecting to recognition service at {}", uri);

        let endpoint = Endpoint::from_shared(uri.clone()).map_err(|e| ClientError::InvalidUri {
            uri: uri.clone(),
            reason: e.to_string(),
        })?;
        let channel = endpoint
            .connect()
            .await
            .map_err(|source| ClientError::Connect { uri, source })?;

        Ok(Self::new(channel))
    }
}

#[async_trait]
impl RecognizerClient for GrpcRecognizer {
    async fn streaming_recognize(
        &mut self,
        requests: ReceiverStream<StreamingRecognizeRequest>,
    ) -> std::result::Result<ResponseStream, tonic::Status> {
        self.inner
            .ready()
            .await
            .map_err(|e| tonic::Status::unavailable(format!("Service was not ready: {}", e)))?;

        let codec: ProstCodec<StreamingRecognizeRequest, StreamingRecognizeResponse> =
            ProstCodec::default();
        let path = PathAndQuery::from_static(STREAMING_RECOGNIZE_PATH);
        let response = self
            .inner
            .streaming(tonic::Request::new(requests), path, codec)
            .await?;

        Ok(response.into_inner().boxed())
    }
}

/// Opens a dedicated gRPC channel for every session.
#[derive(Debug, Clone)]
pub struct GrpcConnector {
    uri: String,
}

impl GrpcConnector {
    pub fn new(uri: impl Into<String>) -> Self {
        Self { uri: uri.into() }
    }
}

#[async_trait]
impl Connector for GrpcConnector {
    type Client = GrpcRecognizer;

    async fn connect(&self, session_id: usize) -> Result<GrpcRecognizer> {
        info!("Session {}: opening channel", session_id);
        GrpcRecognizer::connect(&self.uri).await
    }
}

/// Prepend `http://` when the uri has no scheme (`localhost:50051`).
pub fn normalize_uri(uri: &str) -> String {
    if uri.contains("://") {
        uri.to_string()
    } else {
        format!("http://{}", uri)
    }
}
