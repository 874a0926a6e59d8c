//! Speech output
//!
//! Where spoken responses go. Delivery is fire-and-forget: the session logs
//! a failed `speak` and moves on.

use async_trait::async_trait;

use crate::error::AssistantResult;

pub mod channel;
pub mod console;
pub mod mmi;

pub use channel::ChannelSink;
pub use console::{LogSink, OutputFormat, StdoutSink};
pub use mmi::encode_speech_request;

/// Trait for speech outputs
#[async_trait]
pub trait SpeechSink: Send + Sync + std::fmt::Debug {
    /// Speak the given text
    async fn speak(&self, text: &str) -> AssistantResult<()>;

    /// Get the sink name
    fn name(&self) -> &str;
}
