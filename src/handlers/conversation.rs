//! Small talk and bare yes/no replies

use async_trait::async_trait;

use crate::error::AssistantResult;
use crate::intent::{IntentContext, IntentHandler, IntentResponse};

pub const HELP_TEXT: &str = "I can help you with the map. You can search for places, \
get directions, zoom in or out, change the map view, show traffic, and get place \
information like reviews and photos. Just tell me what you want to do.";

pub struct ConversationHandler;

#[async_trait]
impl IntentHandler for ConversationHandler {
    fn name(&self) -> &str {
        "conversation"
    }

    fn supported_intents(&self) -> &[&'static str] {
        &["greet", "goodbye", "thanks", "help", "cancel"]
    }

    fn confidence_threshold(&self) -> f32 {
        0.60
    }

    async fn execute(&self, ctx: &IntentContext) -> AssistantResult<IntentResponse> {
        let message = match ctx.intent.as_str() {
            "greet" => "Hi! How can I help you with the map?",
            "goodbye" => "Goodbye! See you next time!",
            "thanks" => "You're welcome! I'm here whenever you need me.",
            "help" => HELP_TEXT,
            "cancel" => "Cancelled",
            other => {
                return Ok(IntentResponse::failed(format!(
                    "I don't know how to handle '{}'",
                    other
                )))
            }
        };
        Ok(IntentResponse::ok(message))
    }
}

/// Yes/no with nothing waiting on it
pub struct ConfirmationReplyHandler;

#[async_trait]
impl IntentHandler for ConfirmationReplyHandler {
    fn name(&self) -> &str {
        "confirmation_reply"
    }

    fn supported_intents(&self) -> &[&'static str] {
        &["affirm", "deny"]
    }

    fn confidence_threshold(&self) -> f32 {
        0.50
    }

    async fn execute(&self, ctx: &IntentContext) -> AssistantResult<IntentResponse> {
        Ok(match ctx.intent.as_str() {
            "deny" => IntentResponse::ok("Ok, cancelled."),
            _ => IntentResponse::ok("Ok, confirmed!"),
        })
    }
}
