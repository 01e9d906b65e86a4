use std::time::Duration;
use tokio::time::{self, Instant};
use tracing::{debug, info};

use super::file::FrameSource;
use crate::error::Result;
use crate::session::RecognitionConfig;

/// One outbound protocol message of a streaming session.
#[derive(Debug, Clone, PartialEq)]
pub enum OutboundMessage {
    /// Always the first message of a stream.
    Config(RecognitionConfig),
    /// Raw PCM bytes, in file order.
    AudioChunk(Vec<u8>),
}

/// Turns a `FrameSource` into the outbound message sequence of a session.
///
/// The sequence is one `Config` message followed by the chunks of every
/// iteration over the file. With pacing enabled, the k-th chunk of an
/// iteration is never emitted earlier than `k * chunk_frames / sample_rate`
/// seconds after that iteration started. Sleeps only ever move forward: a
/// producer that is already behind real time is not slowed down further.
pub struct PacedRequestProducer {
    source: Option<FrameSource>,
    config: RecognitionConfig,
    chunk_frames: usize,
    num_iterations: u32,
    simulate_realtime: bool,
    config_sent: bool,
    iteration: u32,
    chunks_in_iteration: u64,
    chunks_total: u64,
    iteration_start: Instant,
}

impl PacedRequestProducer {
    pub fn new(
        source: FrameSource,
        config: RecognitionConfig,
        chunk_frames: usize,
        num_iterations: u32,
        simulate_realtime: bool,
    ) -> Self {
        Self {
            source: Some(source),
            config,
            chunk_frames: chunk_frames.max(1),
            num_iterations: num_iterations.max(1),
            simulate_realtime,
            config_sent: false,
            iteration: 0,
            chunks_in_iteration: 0,
            chunks_total: 0,
            iteration_start: Instant::now(),
        }
    }

    /// Number of audio chunks emitted so far, across all iterations.
    pub fn chunks_sent(&self) -> u64 {
        self.chunks_total
    }

    /// Produce the next message, or `None` once every iteration is exhausted.
    ///
    /// A read error ends production: it is returned once and every later
    /// call yields `None`.
    pub async fn next_message(&mut self) -> Result<Option<OutboundMessage>> {
        if !self.config_sent {
            self.config_sent = true;
            self.iteration_start = Instant::now();
            return Ok(Some(OutboundMessage::Config(self.config.clone())));
        }

        loop {
            let chunk = match self.source.as_mut() {
                Some(source) => source.read_chunk(self.chunk_frames),
                None => return Ok(None),
            };

            let chunk = match chunk {
                Ok(chunk) => chunk,
                Err(e) => {
                    self.source = None;
                    return Err(e);
                }
            };

            match chunk {
                Some(bytes) => {
                    self.chunks_in_iteration += 1;
                    self.chunks_total += 1;
                    if self.simulate_realtime {
                        self.pace().await;
                    }
                    return Ok(Some(OutboundMessage::AudioChunk(bytes)));
                }
                None => {
                    if let Err(e) = self.start_next_iteration() {
                        self.source = None;
                        return Err(e);
                    }
                }
            }
        }
    }

    fn start_next_iteration(&mut self) -> Result<()> {
        self.iteration += 1;
        info!(
            "Iteration {}/{} finished ({} chunks)",
            self.iteration, self.num_iterations, self.chunks_in_iteration
        );

        let Some(source) = self.source.take() else {
            return Ok(());
        };
        if self.iteration >= self.num_iterations {
            return Ok(());
        }

        self.source = Some(source.reopen()?);
        self.chunks_in_iteration = 0;
        self.iteration_start = Instant::now();
        Ok(())
    }

    async fn pace(&self) {
        let Some(source) = self.source.as_ref() else {
            return;
        };

        let target = Duration::from_secs_f64(
            self.chunks_in_iteration as f64 * self.chunk_frames as f64
                / source.sample_rate() as f64,
        );
        let elapsed = self.iteration_start.elapsed();
        if elapsed < target {
            debug!("Pacing chunk {}: sleeping {:?}", self.chunks_in_iteration, target - elapsed);
            time::sleep_until(self.iteration_start + target).await;
        }
    }
}
