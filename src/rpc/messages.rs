// Wire messages of the streaming recognition service.
//
// Field tags and scalar types follow `jarvis_asr.proto` / `audio.proto` of
// the jarvis_api 1.0.0-b.2 release (package `nvidia.jarvis.asr`), which the
// later `riva_asr.proto` keeps unchanged for these messages. Only the fields
// this client reads or writes are declared.

use crate::audio::OutboundMessage;
use crate::session::{self, Encoding};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, prost::Enumeration)]
#[repr(i32)]
pub enum AudioEncoding {
    EncodingUnspecified = 0,
    LinearPcm = 1,
    Flac = 2,
    Mulaw = 3,
    Alaw = 20,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct RecognitionConfig {
    #[prost(enumeration = "AudioEncoding", tag = "1")]
    pub encoding: i32,
    #[prost(int32, tag = "2")]
    pub sample_rate_hertz: i32,
    #[prost(string, tag = "3")]
    pub language_code: String,
    #[prost(int32, tag = "4")]
    pub max_alternatives: i32,
    #[prost(bool, tag = "8")]
    pub enable_word_time_offsets: bool,
    #[prost(bool, tag = "11")]
    pub enable_automatic_punctuation: bool,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct StreamingRecognitionConfig {
    #[prost(message, optional, tag = "1")]
    pub config: Option<RecognitionConfig>,
    #[prost(bool, tag = "2")]
    pub interim_results: bool,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct StreamingRecognizeRequest {
    #[prost(oneof = "streaming_recognize_request::StreamingRequest", tags = "1, 2")]
    pub streaming_request: Option<streaming_recognize_request::StreamingRequest>,
}

pub mod streaming_recognize_request {
    #[derive(Clone, PartialEq, prost::Oneof)]
    pub enum StreamingRequest {
        #[prost(message, tag = "1")]
        StreamingConfig(super::StreamingRecognitionConfig),
        #[prost(bytes = "vec", tag = "2")]
        AudioContent(Vec<u8>),
    }
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct StreamingRecognizeResponse {
    #[prost(message, repeated, tag = "1")]
    pub results: Vec<StreamingRecognitionResult>,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct StreamingRecognitionResult {
    #[prost(message, repeated, tag = "1")]
    pub alternatives: Vec<SpeechRecognitionAlternative>,
    #[prost(bool, tag = "2")]
    pub is_final: bool,
    #[prost(float, tag = "3")]
    pub stability: f32,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct SpeechRecognitionAlternative {
    #[prost(string, tag = "1")]
    pub transcript: String,
    #[prost(float, tag = "2")]
    pub confidence: f32,
    #[prost(message, repeated, tag = "3")]
    pub words: Vec<WordInfo>,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct WordInfo {
    /// Milliseconds from the start of the audio (varint on the wire)
    #[prost(int32, tag = "1")]
    pub start_time: i32,
    #[prost(int32, tag = "2")]
    pub end_time: i32,
    #[prost(string, tag = "3")]
    pub word: String,
    #[prost(float, tag = "4")]
    pub confidence: f32,
}

impl From<Encoding> for AudioEncoding {
    fn from(encoding: Encoding) -> Self {
        match encoding {
            Encoding::LinearPcm => AudioEncoding::LinearPcm,
        }
    }
}

impl From<session::RecognitionConfig> for StreamingRecognitionConfig {
    fn from(config: session::RecognitionConfig) -> Self {
        StreamingRecognitionConfig {
            config: Some(RecognitionConfig {
                encoding: AudioEncoding::from(config.encoding) as i32,
                sample_rate_hertz: config.sample_rate_hertz as i32,
                language_code: config.language_code,
                max_alternatives: config.max_alternatives as i32,
                enable_word_time_offsets: config.enable_word_time_offsets,
                enable_automatic_punctuation: config.enable_automatic_punctuation,
            }),
            interim_results: config.interim_results,
        }
    }
}

impl From<OutboundMessage> for StreamingRecognizeRequest {
    fn from(message: OutboundMessage) -> Self {
        use streaming_recognize_request::StreamingRequest;

        let request = match message {
            OutboundMessage::Config(config) => StreamingRequest::StreamingConfig(config.into()),
            OutboundMessage::AudioChunk(bytes) => StreamingRequest::AudioContent(bytes),
        };
        StreamingRecognizeRequest {
            streaming_request: Some(request),
        }
    }
}

impl From<StreamingRecognitionResult> for session::TranscriptionResult {
    fn from(result: StreamingRecognitionResult) -> Self {
        session::TranscriptionResult {
            is_final: result.is_final,
            alternatives: result
                .alternatives
                .into_iter()
                .map(|alternative| session::Alternative {
                    transcript: alternative.transcript,
                    words: alternative
                        .words
                        .into_iter()
                        .map(|word| session::WordInfo {
                            word: word.word,
                            start_time_ms: word.start_time as f32,
                            end_time_ms: word.end_time as f32,
                        })
                        .collect(),
                })
                .collect(),
        }
    }
}
