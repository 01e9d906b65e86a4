pub mod file;
pub mod producer;

pub use file::FrameSource;
pub use producer::{OutboundMessage, PacedRequestProducer};
