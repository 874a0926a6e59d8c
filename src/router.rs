//! Intent Router
//!
//! Looks up the handler for an intent, applies the confidence and
//! confirmation policy, and executes it. Nothing a handler does (error or
//! panic) escapes `dispatch`.

use futures::FutureExt;
use std::collections::HashMap;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use tracing::{error, info, warn};

use crate::config::Config;
use crate::confirmation::{confirmation_prompt, humanize};
use crate::intent::{DeferralReason, FollowUp, IntentContext, IntentHandler, IntentResponse};
use crate::registry::HandlerRegistry;

/// Dispatch policy knobs that come from configuration
#[derive(Debug, Clone, Default)]
pub struct DispatchPolicy {
    /// Per-intent thresholds that win over the handler's own
    pub threshold_overrides: HashMap<String, f32>,
    /// Intents that always need an explicit yes
    pub confirmation_required: Vec<String>,
}

impl DispatchPolicy {
    pub fn from_config(config: &Config) -> Self {
        Self {
            threshold_overrides: config.confidence_overrides.clone(),
            confirmation_required: config.confirmation_required.clone(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct IntentRouter {
    registry: Arc<HandlerRegistry>,
    policy: DispatchPolicy,
}

impl IntentRouter {
    pub fn new(registry: Arc<HandlerRegistry>, policy: DispatchPolicy) -> Self {
        Self { registry, policy }
    }

    pub fn registry(&self) -> &Arc<HandlerRegistry> {
        &self.registry
    }

    pub fn policy(&self) -> &DispatchPolicy {
        &self.policy
    }

    /// Threshold in force for an intent served by `handler`
    pub fn threshold_for(&self, intent: &str, handler: &dyn IntentHandler) -> f32 {
        self.policy
            .threshold_overrides
            .get(intent)
            .copied()
            .unwrap_or_else(|| handler.confidence_threshold())
    }

    fn needs_confirmation(&self, intent: &str, handler: &dyn IntentHandler) -> bool {
        handler.requires_confirmation()
            || self.policy.confirmation_required.iter().any(|i| i == intent)
    }

    /// Route one intent. Always returns a response.
    pub async fn dispatch(&self, ctx: &IntentContext) -> IntentResponse {
        let handler = match self.registry.lookup(&ctx.intent) {
            Some(handler) => handler,
            None => {
                warn!("❓ No handler registered for intent '{}'", ctx.intent);
                return IntentResponse::failed_with_error(
                    format!("I don't know how to handle '{}'", ctx.intent),
                    format!("no handler registered for intent '{}'", ctx.intent),
                );
            }
        };

        let threshold = self.threshold_for(&ctx.intent, handler.as_ref());
        if ctx.confidence < threshold {
            info!(
                "🤔 Confidence {:.2} below threshold {:.2} for '{}'",
                ctx.confidence, threshold, ctx.intent
            );
            return Self::defer(ctx, handler.as_ref(), DeferralReason::LowConfidence);
        }

        if !ctx.confirmed && self.needs_confirmation(&ctx.intent, handler.as_ref()) {
            info!("🔒 '{}' requires confirmation", ctx.intent);
            return Self::defer(ctx, handler.as_ref(), DeferralReason::ConfirmationRequired);
        }

        info!(
            "🎯 Executing {} for '{}' (confidence: {:.2})",
            handler.name(),
            ctx.intent,
            ctx.confidence
        );

        match AssertUnwindSafe(handler.execute(ctx)).catch_unwind().await {
            Ok(Ok(response)) => response,
            Ok(Err(e)) => {
                error!("❌ Handler {} failed on '{}': {}", handler.name(), ctx.intent, e);
                Self::handler_failure(&ctx.intent, e.to_string())
            }
            Err(panic) => {
                let reason = panic_message(panic.as_ref());
                error!(
                    "💥 Handler {} panicked on '{}': {}",
                    handler.name(),
                    ctx.intent,
                    reason
                );
                Self::handler_failure(&ctx.intent, reason)
            }
        }
    }

    fn defer(ctx: &IntentContext, handler: &dyn IntentHandler, reason: DeferralReason) -> IntentResponse {
        let mut response = IntentResponse::deferred(FollowUp {
            handler: handler.name().to_string(),
            reason,
            intent: ctx.intent.clone(),
            confidence: ctx.confidence,
            entities: ctx.entities.clone(),
            raw_text: ctx.raw_text.clone(),
            metadata: ctx.metadata.clone(),
        });
        response.message = confirmation_prompt(&ctx.intent, &ctx.entities);
        response
    }

    fn handler_failure(intent: &str, error: String) -> IntentResponse {
        IntentResponse::failed_with_error(
            format!("Sorry, I ran into a problem trying to {}", humanize(intent)),
            error,
        )
    }
}

/// Best-effort text of a panic payload
pub fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
