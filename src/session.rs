//! Session loop
//!
//! One task owns the assistant and the idle watchdog. Inbound envelopes and
//! idle polling are multiplexed with `tokio::select!`, so the confirmation
//! slot and idle state never need a lock.

use futures::FutureExt;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::MissedTickBehavior;
use tracing::{debug, error, info, warn};

use crate::assistant::Assistant;
use crate::config::Config;
use crate::envelope;
use crate::idle::IdleWatchdog;
use crate::router::panic_message;
use crate::speech::SpeechSink;

/// Spoken when a dispatch cycle blows up outside the router
pub const FALLBACK_MESSAGE: &str = "Sorry, something went wrong.";

/// Default idle poll interval
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(5);

pub struct Session {
    assistant: Assistant,
    watchdog: IdleWatchdog,
    sink: Arc<dyn SpeechSink>,
    poll_interval: Duration,
    greeting: Option<String>,
}

impl Session {
    pub fn new(assistant: Assistant, watchdog: IdleWatchdog, sink: Arc<dyn SpeechSink>) -> Self {
        Self {
            assistant,
            watchdog,
            sink,
            poll_interval: DEFAULT_POLL_INTERVAL,
            greeting: None,
        }
    }

    /// Session with idle settings and greeting from configuration
    pub fn from_config(config: &Config, assistant: Assistant, sink: Arc<dyn SpeechSink>) -> Self {
        let greeting = (!config.greeting.trim().is_empty()).then(|| config.greeting.clone());
        Self::new(assistant, IdleWatchdog::new(config.idle_threshold()), sink)
            .with_poll_interval(config.idle_poll_interval())
            .with_greeting(greeting)
    }

    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval.max(Duration::from_millis(1));
        self
    }

    pub fn with_greeting(mut self, greeting: Option<String>) -> Self {
        self.greeting = greeting;
        self
    }

    pub fn assistant(&self) -> &Assistant {
        &self.assistant
    }

    pub fn watchdog(&self) -> &IdleWatchdog {
        &self.watchdog
    }

    /// Run one dispatch cycle for a raw envelope.
    ///
    /// Returns what was spoken, if anything. Filtered or undecodable frames
    /// produce nothing and don't count as user activity.
    pub async fn process_envelope(&mut self, raw: &str) -> Option<String> {
        let event = envelope::decode(raw)?;
        self.watchdog.record_activity();

        let outcome = AssertUnwindSafe(self.assistant.handle_event(event))
            .catch_unwind()
            .await;
        let message = match outcome {
            Ok(message) => message,
            Err(panic) => {
                error!("💥 Dispatch cycle panicked: {}", panic_message(panic.as_ref()));
                FALLBACK_MESSAGE.to_string()
            }
        };

        if message.is_empty() {
            debug!("Nothing to say for this cycle");
            return None;
        }
        self.speak(&message).await;
        Some(message)
    }

    /// Speak the idle prompt if one is due
    pub async fn poll_idle(&mut self) -> Option<String> {
        if !self.watchdog.should_prompt() {
            return None;
        }

        let message = self.watchdog.idle_message().to_string();
        info!(
            "💤 User idle for {}s, prompting",
            self.watchdog.idle_duration().as_secs()
        );
        self.speak(&message).await;
        Some(message)
    }

    async fn speak(&self, text: &str) {
        if let Err(e) = self.sink.speak(text).await {
            warn!("⚠️ Speech delivery via {} failed: {}", self.sink.name(), e);
        }
    }

    /// Drive the session until every envelope sender is dropped
    pub async fn run(mut self, mut inbound: mpsc::Receiver<String>) {
        info!("🚀 Session started (speech via {})", self.sink.name());
        if let Some(greeting) = self.greeting.clone() {
            self.speak(&greeting).await;
        }

        let mut idle_poll = tokio::time::interval(self.poll_interval);
        idle_poll.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // The first tick completes immediately
        idle_poll.tick().await;

        loop {
            tokio::select! {
                frame = inbound.recv() => match frame {
                    Some(raw) => {
                        self.process_envelope(&raw).await;
                    }
                    None => {
                        info!("Inbound channel closed, ending session");
                        break;
                    }
                },
                _ = idle_poll.tick() => {
                    self.poll_idle().await;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::confirmation::StaleConfirmationPolicy;
    use crate::executor::DryRunExecutor;
    use crate::handlers::default_registry;
    use crate::router::{DispatchPolicy, IntentRouter};
    use crate::speech::ChannelSink;

    fn session() -> (Session, mpsc::UnboundedReceiver<String>) {
        let router = IntentRouter::new(Arc::new(default_registry()), DispatchPolicy::default());
        let assistant = Assistant::new(
            router,
            Arc::new(DryRunExecutor::new()),
            StaleConfirmationPolicy::Discard,
        );
        let (sink, spoken) = ChannelSink::new();
        (Session::new(assistant, IdleWatchdog::default(), Arc::new(sink)), spoken)
    }

    #[tokio::test]
    async fn test_ack_frames_are_silent() {
        let (mut session, mut spoken) = session();
        assert_eq!(session.process_envelope("OK").await, None);
        assert_eq!(
            session
                .process_envelope(r#"<mmi:mmi><mmi:startResponse/></mmi:mmi>"#)
                .await,
            None
        );
        assert!(spoken.try_recv().is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn test_idle_prompt_once() {
        let (mut session, mut spoken) = session();
        assert_eq!(session.poll_idle().await, None);

        tokio::time::advance(Duration::from_secs(130)).await;
        let prompt = session.poll_idle().await.unwrap();
        assert_eq!(prompt, spoken.recv().await.unwrap());
        assert_eq!(session.poll_idle().await, None);
    }
}
