use futures::stream::StreamExt;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::{self, Instant};
use tokio_stream::wrappers::ReceiverStream;
use tracing::{error, info, warn};

use super::config::SessionConfig;
use super::render::TranscriptWriter;
use super::stats::{SessionReport, TranscriptionResult};
use crate::audio::{FrameSource, OutboundMessage, PacedRequestProducer};
use crate::error::{ClientError, Result};
use crate::rpc::{Connector, RecognizerClient, ResponseStream, StreamingRecognizeRequest};

/// Outbound messages buffered between the producer and the transport.
const OUTBOUND_BUFFER: usize = 16;

/// How long to wait for the producer once the service has closed the stream.
const PRODUCER_GRACE: Duration = Duration::from_secs(1);

/// One bidirectional recognition stream transcribing the input file.
///
/// The producer runs in its own task and feeds the outbound stream through a
/// bounded channel, while this task renders inbound results as they arrive.
pub struct StreamSession {
    id: usize,
    config: SessionConfig,
}

impl StreamSession {
    pub fn new(id: usize, config: SessionConfig) -> Self {
        Self { id, config }
    }

    pub fn id(&self) -> usize {
        self.id
    }

    /// Run the session to completion.
    ///
    /// A read error ends the outbound stream but results already in flight
    /// are still rendered before the error is returned. Transport and output
    /// errors end the session immediately.
    pub async fn run<C: Connector>(self, connector: &C) -> Result<SessionReport> {
        let started = Instant::now();

        let source = FrameSource::open(&self.config.input_file)?;
        if self.id == 0 {
            println!("File duration: {:.2}s", source.duration_seconds());
        }
        info!(
            "Session {}: streaming {} ({}Hz, {} frames, {} iterations)",
            self.id,
            source.path().display(),
            source.sample_rate(),
            source.frame_count(),
            self.config.num_iterations
        );

        let output_path = self.config.output_path(self.id);
        let file = File::create(&output_path).map_err(|source| ClientError::OutputWrite {
            path: output_path.clone(),
            source,
        })?;

        let client = connector.connect(self.id).await?;

        let recognition = self.config.recognition_config(source.sample_rate());
        let producer = PacedRequestProducer::new(
            source,
            recognition,
            self.config.chunk_frames,
            self.config.num_iterations,
            self.config.simulate_realtime,
        );

        let (interim_results, final_results, chunks_sent) =
            self.stream(client, producer, file, &output_path).await?;

        let report = SessionReport {
            session_id: self.id,
            output_path,
            chunks_sent,
            interim_results,
            final_results,
            elapsed: started.elapsed(),
        };

        info!(
            "Session {}: done in {:.2}s ({} chunks, {} interim, {} final)",
            self.id,
            report.elapsed.as_secs_f64(),
            report.chunks_sent,
            report.interim_results,
            report.final_results
        );

        Ok(report)
    }

    async fn stream<R: RecognizerClient>(
        &self,
        mut client: R,
        producer: PacedRequestProducer,
        file: File,
        output_path: &Path,
    ) -> Result<(usize, usize, u64)> {
        let (request_tx, request_rx) = mpsc::channel(OUTBOUND_BUFFER);
        let chunks_sent = Arc::new(AtomicU64::new(0));
        let mut pump = tokio::spawn(pump_requests(
            self.id,
            producer,
            request_tx,
            Arc::clone(&chunks_sent),
        ));

        let responses = match client.streaming_recognize(ReceiverStream::new(request_rx)).await {
            Ok(responses) => responses,
            Err(status) => {
                pump.abort();
                error!("Session {}: failed to open stream: {}", self.id, status);
                return Err(status.into());
            }
        };

        let mut writer = TranscriptWriter::new(BufWriter::new(file), self.config.word_time_offsets);
        let drained = drain_responses(self.id, responses, &mut writer, output_path).await;

        if let Err(e) = drained {
            pump.abort();
            error!("Session {}: {}", self.id, e);
            return Err(e);
        }

        match time::timeout(PRODUCER_GRACE, &mut pump).await {
            Ok(Ok(produced)) => produced?,
            Ok(Err(e)) => return Err(ClientError::Aborted(e.to_string())),
            Err(_) => {
                pump.abort();
                warn!(
                    "Session {}: stream closed by the service before all audio was sent",
                    self.id
                );
            }
        }

        Ok((
            writer.interim_count(),
            writer.final_count(),
            chunks_sent.load(Ordering::SeqCst),
        ))
    }
}

/// Forward producer messages to the outbound stream until the producer is
/// exhausted, fails, or the stream is closed.
async fn pump_requests(
    session_id: usize,
    mut producer: PacedRequestProducer,
    requests: mpsc::Sender<StreamingRecognizeRequest>,
    chunks_sent: Arc<AtomicU64>,
) -> Result<()> {
    loop {
        match producer.next_message().await {
            Ok(Some(message)) => {
                let is_audio = matches!(message, OutboundMessage::AudioChunk(_));
                if requests.send(message.into()).await.is_err() {
                    warn!("Session {}: outbound stream closed early", session_id);
                    return Ok(());
                }
                if is_audio {
                    chunks_sent.fetch_add(1, Ordering::SeqCst);
                }
            }
            Ok(None) => {
                info!(
                    "Session {}: all audio sent ({} chunks)",
                    session_id,
                    producer.chunks_sent()
                );
                return Ok(());
            }
            Err(e) => {
                error!("Session {}: stopping audio: {}", session_id, e);
                return Err(e);
            }
        }
    }
}

async fn drain_responses<W: Write>(
    session_id: usize,
    mut responses: ResponseStream,
    writer: &mut TranscriptWriter<W>,
    output_path: &Path,
) -> Result<()> {
    let write_error = |source: std::io::Error| ClientError::OutputWrite {
        path: PathBuf::from(output_path),
        source,
    };

    while let Some(response) = responses.next().await {
        let response = response?;
        // only the leading result of a response is rendered
        let Some(result) = response.results.into_iter().next() else {
            continue;
        };
        writer
            .write_result(&TranscriptionResult::from(result))
            .map_err(write_error)?;
        writer.flush().map_err(write_error)?;
    }

    info!("Session {}: inbound stream closed", session_id);
    writer.flush().map_err(write_error)
}
