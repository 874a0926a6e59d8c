//! Channel-backed speech sink
//!
//! Hands utterances to another task, e.g. a WebSocket writer.

use async_trait::async_trait;
use tokio::sync::mpsc;

use super::SpeechSink;
use crate::error::{AssistantError, AssistantResult};

#[derive(Debug, Clone)]
pub struct ChannelSink {
    tx: mpsc::UnboundedSender<String>,
}

impl ChannelSink {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<String>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

#[async_trait]
impl SpeechSink for ChannelSink {
    async fn speak(&self, text: &str) -> AssistantResult<()> {
        self.tx
            .send(text.to_string())
            .map_err(|_| AssistantError::Speech("speech receiver dropped".to_string()))
    }

    fn name(&self) -> &str {
        "channel"
    }
}
