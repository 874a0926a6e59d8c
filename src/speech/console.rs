//! Local speech sinks

use async_trait::async_trait;
use std::io::Write;
use tracing::info;

use super::{encode_speech_request, SpeechSink};
use crate::error::AssistantResult;

/// Sink that only logs what would have been spoken
#[derive(Debug, Default)]
pub struct LogSink;

#[async_trait]
impl SpeechSink for LogSink {
    async fn speak(&self, text: &str) -> AssistantResult<()> {
        info!("🗣️ {}", text);
        Ok(())
    }

    fn name(&self) -> &str {
        "log"
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Plain,
    /// One MMI speech request per line
    Mmi,
}

/// Sink that prints each utterance on its own stdout line
#[derive(Debug)]
pub struct StdoutSink {
    format: OutputFormat,
    language: String,
}

impl StdoutSink {
    pub fn new(format: OutputFormat, language: impl Into<String>) -> Self {
        Self {
            format,
            language: language.into(),
        }
    }

    /// Line written for `text`
    pub fn render(&self, text: &str) -> String {
        match self.format {
            OutputFormat::Plain => text.to_string(),
            OutputFormat::Mmi => encode_speech_request(text, &self.language),
        }
    }
}

#[async_trait]
impl SpeechSink for StdoutSink {
    async fn speak(&self, text: &str) -> AssistantResult<()> {
        let line = self.render(text);
        let mut stdout = std::io::stdout().lock();
        writeln!(stdout, "{}", line)?;
        stdout.flush()?;
        Ok(())
    }

    fn name(&self) -> &str {
        "stdout"
    }
}
