// Shared fixtures for integration tests: generated WAV files and an
// in-process recognition service.

#![allow(dead_code)]

use async_trait::async_trait;
use futures::stream::StreamExt;
use std::collections::HashMap;
use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use streaming_asr_client::rpc::messages::{
    streaming_recognize_request::StreamingRequest, SpeechRecognitionAlternative,
    StreamingRecognitionResult, StreamingRecognizeRequest, StreamingRecognizeResponse, WordInfo,
};
use streaming_asr_client::{ClientError, Connector, RecognizerClient, ResponseStream};
use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;
use tonic::{Code, Status};

/// Write a 16-bit WAV whose samples count up from zero (wrapping).
pub fn write_wav(dir: &Path, name: &str, sample_rate: u32, channels: u16, frames: u32) -> PathBuf {
    let path = dir.join(name);
    let spec = hound::WavSpec {
        channels,
        sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };

    let mut writer = hound::WavWriter::create(&path, spec).unwrap();
    for i in 0..frames * channels as u32 {
        writer.write_sample(i as i16).unwrap();
    }
    writer.finalize().unwrap();

    path
}

/// Cut the file to `len` bytes so reads fail after the header promises more data.
pub fn truncate(path: &Path, len: u64) {
    let file = OpenOptions::new().write(true).open(path).unwrap();
    file.set_len(len).unwrap();
}

pub fn interim(transcript: &str) -> StreamingRecognizeResponse {
    StreamingRecognizeResponse {
        results: vec![StreamingRecognitionResult {
            alternatives: vec![alternative(transcript, Vec::new())],
            is_final: false,
            stability: 0.5,
        }],
    }
}

pub fn final_response(alternatives: Vec<SpeechRecognitionAlternative>) -> StreamingRecognizeResponse {
    StreamingRecognizeResponse {
        results: vec![StreamingRecognitionResult {
            alternatives,
            is_final: true,
            stability: 1.0,
        }],
    }
}

pub fn alternative(transcript: &str, words: Vec<WordInfo>) -> SpeechRecognitionAlternative {
    SpeechRecognitionAlternative {
        transcript: transcript.to_string(),
        confidence: 0.9,
        words,
    }
}

pub fn word(word: &str, start_time: i32, end_time: i32) -> WordInfo {
    WordInfo {
        start_time,
        end_time,
        word: word.to_string(),
        confidence: 0.9,
    }
}

/// What the fake service does for one session.
#[derive(Clone, Default)]
pub struct Script {
    /// Sent as soon as the first request arrives, while audio is still flowing
    pub early_responses: Vec<StreamingRecognizeResponse>,
    /// Replayed once the client has closed its outbound stream
    pub responses: Vec<StreamingRecognizeResponse>,
    /// Status sent after the responses, ending the stream with an error
    pub trailing_error: Option<(Code, String)>,
    /// Reject the call before any stream is opened
    pub open_error: Option<(Code, String)>,
    /// Fail to connect at all
    pub connect_error: bool,
}

impl Script {
    pub fn replying(responses: Vec<StreamingRecognizeResponse>) -> Self {
        Self {
            responses,
            ..Default::default()
        }
    }
}

pub type Recorded = Arc<Mutex<HashMap<usize, Vec<StreamingRecognizeRequest>>>>;

/// Connector handing out in-process fake recognizers.
#[derive(Clone, Default)]
pub struct FakeConnector {
    pub default_script: Script,
    pub scripts: HashMap<usize, Script>,
    pub recorded: Recorded,
}

impl FakeConnector {
    pub fn new(default_script: Script) -> Self {
        Self {
            default_script,
            ..Default::default()
        }
    }

    pub fn with_script(mut self, session_id: usize, script: Script) -> Self {
        self.scripts.insert(session_id, script);
        self
    }

    pub fn requests(&self, session_id: usize) -> Vec<StreamingRecognizeRequest> {
        self.recorded
            .lock()
            .unwrap()
            .get(&session_id)
            .cloned()
            .unwrap_or_default()
    }
}

#[async_trait]
impl Connector for FakeConnector {
    type Client = FakeRecognizer;

    async fn connect(&self, session_id: usize) -> Result<FakeRecognizer, ClientError> {
        let script = self
            .scripts
            .get(&session_id)
            .cloned()
            .unwrap_or_else(|| self.default_script.clone());

        if script.connect_error {
            return Err(ClientError::Transport(Status::unavailable("connection refused")));
        }

        Ok(FakeRecognizer {
            session_id,
            script,
            recorded: Arc::clone(&self.recorded),
        })
    }
}

pub struct FakeRecognizer {
    session_id: usize,
    script: Script,
    recorded: Recorded,
}

#[async_trait]
impl RecognizerClient for FakeRecognizer {
    async fn streaming_recognize(
        &mut self,
        mut requests: ReceiverStream<StreamingRecognizeRequest>,
    ) -> Result<ResponseStream, Status> {
        if let Some((code, message)) = self.script.open_error.clone() {
            return Err(Status::new(code, message));
        }

        let (tx, rx) = mpsc::channel(16);
        let script = self.script.clone();
        let recorded = Arc::clone(&self.recorded);
        let session_id = self.session_id;

        tokio::spawn(async move {
            let mut received = Vec::new();
            let mut early = Some(script.early_responses);
            while let Some(request) = requests.next().await {
                received.push(request);
                for response in early.take().unwrap_or_default() {
                    if tx.send(Ok(response)).await.is_err() {
                        return;
                    }
                }
            }
            recorded.lock().unwrap().insert(session_id, received);

            for response in script.responses {
                if tx.send(Ok(response)).await.is_err() {
                    return;
                }
            }
            if let Some((code, message)) = script.trailing_error {
                let _ = tx.send(Err(Status::new(code, message))).await;
            }
        });

        Ok(ReceiverStream::new(rx).boxed())
    }
}

pub fn is_config(request: &StreamingRecognizeRequest) -> bool {
    matches!(request.streaming_request, Some(StreamingRequest::StreamingConfig(_)))
}

pub fn audio_bytes(request: &StreamingRecognizeRequest) -> Option<&[u8]> {
    match &request.streaming_request {
        Some(StreamingRequest::AudioContent(bytes)) => Some(bytes),
        _ => None,
    }
}

/// Split `Time 1.23s: rest` into the seconds text and the rest.
pub fn split_time(line: &str, prefix: &str) -> (String, String) {
    let line = line
        .strip_prefix(prefix)
        .unwrap_or_else(|| panic!("line {:?} lacks prefix {:?}", line, prefix));
    let (secs, rest) = line.split_once("s: ").unwrap();
    (secs.to_string(), rest.to_string())
}

/// Elapsed times are non-negative with exactly two decimals.
pub fn assert_elapsed_format(secs: &str) {
    let (whole, fraction) = secs.split_once('.').unwrap();
    assert!(whole.chars().all(|c| c.is_ascii_digit()), "bad seconds {:?}", secs);
    assert_eq!(fraction.len(), 2, "bad seconds {:?}", secs);
    assert!(fraction.chars().all(|c| c.is_ascii_digit()), "bad seconds {:?}", secs);
}
