//! Mock speech sink for testing
//!
//! Records all spoken text for verification.

use async_trait::async_trait;
use std::sync::{Arc, Mutex};

use wayfinder::error::{AssistantError, AssistantResult};
use wayfinder::speech::SpeechSink;

#[derive(Debug, Default)]
pub struct MockSink {
    /// All text that was "spoken"
    pub spoken: Arc<Mutex<Vec<String>>>,
    /// Simulate delivery failure
    pub should_fail: Arc<Mutex<bool>>,
}

impl MockSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_spoken(&self) -> Vec<String> {
        self.spoken.lock().unwrap().clone()
    }

    pub fn was_spoken(&self, text: &str) -> bool {
        self.spoken.lock().unwrap().iter().any(|s| s.contains(text))
    }

    pub fn fail(&self, fail: bool) {
        *self.should_fail.lock().unwrap() = fail;
    }
}

#[async_trait]
impl SpeechSink for MockSink {
    async fn speak(&self, text: &str) -> AssistantResult<()> {
        if *self.should_fail.lock().unwrap() {
            return Err(AssistantError::Speech("mock sink failure".to_string()));
        }
        self.spoken.lock().unwrap().push(text.to_string());
        Ok(())
    }

    fn name(&self) -> &str {
        "mock"
    }
}
