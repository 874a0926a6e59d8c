//! Handler that counts its invocations

use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use wayfinder::error::{AssistantError, AssistantResult};
use wayfinder::intent::{IntentContext, IntentHandler, IntentResponse};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SpyBehavior {
    Succeed,
    Fail,
    Panic,
}

pub struct SpyHandler {
    intents: &'static [&'static str],
    threshold: f32,
    confirm: bool,
    behavior: SpyBehavior,
    pub calls: Arc<AtomicUsize>,
    /// Confidence and confirmed flag of every call
    pub seen: Arc<Mutex<Vec<(f32, bool)>>>,
}

impl SpyHandler {
    pub fn new(intents: &'static [&'static str], threshold: f32) -> Self {
        Self {
            intents,
            threshold,
            confirm: false,
            behavior: SpyBehavior::Succeed,
            calls: Arc::new(AtomicUsize::new(0)),
            seen: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn requiring_confirmation(mut self) -> Self {
        self.confirm = true;
        self
    }

    pub fn behaving(mut self, behavior: SpyBehavior) -> Self {
        self.behavior = behavior;
        self
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl IntentHandler for SpyHandler {
    fn name(&self) -> &str {
        "spy"
    }

    fn supported_intents(&self) -> &[&'static str] {
        self.intents
    }

    fn confidence_threshold(&self) -> f32 {
        self.threshold
    }

    fn requires_confirmation(&self) -> bool {
        self.confirm
    }

    async fn execute(&self, ctx: &IntentContext) -> AssistantResult<IntentResponse> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.seen.lock().unwrap().push((ctx.confidence, ctx.confirmed));
        match self.behavior {
            SpyBehavior::Succeed => Ok(IntentResponse::ok(format!("spy handled {}", ctx.intent))),
            SpyBehavior::Fail => Err(AssistantError::Action("spy failure".to_string())),
            SpyBehavior::Panic => panic!("spy panic"),
        }
    }
}
