//! Assistant Orchestrator
//!
//! Receives decoded events, consults the confirmation slot first, routes
//! everything else, and turns each result into one spoken message.

use std::sync::Arc;
use tracing::{debug, info};

use crate::config::Config;
use crate::confirmation::{
    ConfirmationPhase, ConfirmationState, PendingConfirmation, StaleConfirmationPolicy,
};
use crate::domain::MapState;
use crate::event::{Entities, RecognitionEvent};
use crate::executor::ActionExecutor;
use crate::intent::{IntentContext, Metadata};
use crate::registry::HandlerRegistry;
use crate::router::{DispatchPolicy, IntentRouter};

pub const AFFIRM_INTENT: &str = "affirm";
pub const DENY_INTENT: &str = "deny";

const DENIED_MESSAGE: &str = "Cancelled. What would you like to do instead?";
const NOTHING_TO_DENY: &str = "Okay";
const NOTHING_TO_AFFIRM: &str =
    "I'm not sure what you're confirming. Could you repeat your request?";

#[derive(Debug)]
pub struct Assistant {
    router: IntentRouter,
    executor: Arc<dyn ActionExecutor>,
    confirmations: ConfirmationState,
    stale_policy: StaleConfirmationPolicy,
    map_state: MapState,
}

impl Assistant {
    pub fn new(
        router: IntentRouter,
        executor: Arc<dyn ActionExecutor>,
        stale_policy: StaleConfirmationPolicy,
    ) -> Self {
        info!(
            "🤖 Assistant ready ({} intents, executor: {})",
            router.registry().len(),
            executor.name()
        );
        Self {
            router,
            executor,
            confirmations: ConfirmationState::new(),
            stale_policy,
            map_state: MapState::default(),
        }
    }

    /// Wire an assistant from configuration and a handler registry
    pub fn from_config(
        config: &Config,
        registry: Arc<HandlerRegistry>,
        executor: Arc<dyn ActionExecutor>,
    ) -> Self {
        let router = IntentRouter::new(registry, DispatchPolicy::from_config(config));
        Self::new(router, executor, config.stale_confirmation)
    }

    /// Handle one decoded event; returns the message to speak
    pub async fn handle_event(&mut self, event: RecognitionEvent) -> String {
        let ctx = IntentContext::from_event(event, Arc::clone(&self.executor));
        self.handle_intent(ctx).await
    }

    /// Handle one intent; returns the message to speak
    pub async fn handle_intent(&mut self, ctx: IntentContext) -> String {
        info!(
            "Handling intent: {}, confidence: {:.2}, entities: {}",
            ctx.intent, ctx.confidence, ctx.entities
        );

        if self.confirmations.phase() == ConfirmationPhase::AwaitingConfirmation {
            match ctx.intent.as_str() {
                AFFIRM_INTENT => return self.handle_affirmation().await,
                DENY_INTENT => return self.handle_denial(),
                _ => match self.stale_policy {
                    StaleConfirmationPolicy::Discard => {
                        info!("New intent '{}' discards the pending confirmation", ctx.intent);
                        self.confirmations.clear();
                    }
                    StaleConfirmationPolicy::Keep => {
                        debug!("Keeping pending confirmation while routing '{}'", ctx.intent);
                    }
                },
            }
        }

        self.route(ctx).await
    }

    /// Dispatch, park deferrals, track map state
    async fn route(&mut self, ctx: IntentContext) -> String {
        let response = self.router.dispatch(&ctx).await;

        if response.requires_follow_up {
            if let Some(follow_up) = response.follow_up.clone() {
                self.confirmations
                    .set_pending(PendingConfirmation::from_follow_up(follow_up));
            }
            info!("Requesting confirmation: {}", response.message);
            return response.message;
        }

        self.map_state.apply(&ctx.intent, &ctx.entities, &response);
        response.message
    }

    /// Re-run the pending intent as confirmed
    pub async fn handle_affirmation(&mut self) -> String {
        let pending = match self.confirmations.affirm() {
            Some(pending) => pending,
            None => return NOTHING_TO_AFFIRM.to_string(),
        };

        let (raw_text, metadata) = match &pending.context {
            Some(follow_up) => (follow_up.raw_text.clone(), follow_up.metadata.clone()),
            None => (String::new(), Metadata::new()),
        };

        let mut ctx = IntentContext::new(
            pending.intent,
            1.0,
            pending.entities,
            Arc::clone(&self.executor),
        );
        ctx.raw_text = raw_text;
        ctx.metadata = metadata;
        ctx.confirmed = true;

        self.route(ctx).await
    }

    pub fn handle_denial(&mut self) -> String {
        if self.confirmations.deny() {
            DENIED_MESSAGE.to_string()
        } else {
            NOTHING_TO_DENY.to_string()
        }
    }

    /// Forget map state and any pending confirmation
    pub fn reset(&mut self) {
        self.map_state = MapState::default();
        self.confirmations.clear();
        info!("Assistant state reset");
    }

    pub fn confirmations(&self) -> &ConfirmationState {
        &self.confirmations
    }

    pub fn map_state(&self) -> &MapState {
        &self.map_state
    }

    pub fn router(&self) -> &IntentRouter {
        &self.router
    }

    pub fn stale_policy(&self) -> StaleConfirmationPolicy {
        self.stale_policy
    }

    /// Convenience for callers that have no event, e.g. tests and tools
    pub async fn handle(&mut self, intent: &str, confidence: f32, entities: Entities) -> String {
        let ctx = IntentContext::new(intent, confidence, entities, Arc::clone(&self.executor));
        self.handle_intent(ctx).await
    }
}
