//! Intent contexts, responses and the handler trait
//!
//! A handler receives one immutable `IntentContext` per dispatch and answers
//! with an `IntentResponse`. Deferred responses carry a `FollowUp` that the
//! orchestrator turns into a pending confirmation.

use async_trait::async_trait;
use serde_json::{Map, Value};
use std::sync::Arc;

use crate::error::AssistantResult;
use crate::event::{Entities, RecognitionEvent};
use crate::executor::ActionExecutor;

/// Free-form JSON object attached to contexts and responses
pub type Metadata = Map<String, Value>;

/// Default confidence threshold for handlers that don't override it
pub const DEFAULT_CONFIDENCE_THRESHOLD: f32 = 0.75;

/// Everything a handler needs for one dispatch
#[derive(Debug, Clone)]
pub struct IntentContext {
    pub intent: String,
    pub confidence: f32,
    pub entities: Entities,
    pub raw_text: String,
    pub executor: Arc<dyn ActionExecutor>,
    /// Carries `text` and, for speech, the raw `nlu` payload
    pub metadata: Metadata,
    /// Set when this dispatch re-runs an intent the user just affirmed
    pub confirmed: bool,
}

impl IntentContext {
    pub fn new(
        intent: impl Into<String>,
        confidence: f32,
        entities: Entities,
        executor: Arc<dyn ActionExecutor>,
    ) -> Self {
        Self {
            intent: intent.into(),
            confidence,
            entities,
            raw_text: String::new(),
            executor,
            metadata: Metadata::new(),
            confirmed: false,
        }
    }

    /// Build the context for a freshly decoded event
    pub fn from_event(event: RecognitionEvent, executor: Arc<dyn ActionExecutor>) -> Self {
        let mut metadata = Metadata::new();
        metadata.insert("text".to_string(), Value::String(event.raw_text.clone()));
        if let Some(nlu) = event.nlu {
            metadata.insert("nlu".to_string(), nlu);
        }

        Self {
            intent: event.intent,
            confidence: event.confidence,
            entities: event.entities,
            raw_text: event.raw_text,
            executor,
            metadata,
            confirmed: false,
        }
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        let text = text.into();
        self.metadata
            .insert("text".to_string(), Value::String(text.clone()));
        self.raw_text = text;
        self
    }

    pub fn entity(&self, name: &str) -> Option<&str> {
        self.entities.get(name)
    }

    /// Transcribed text, trimmed
    pub fn text(&self) -> &str {
        self.raw_text.trim()
    }

    /// All values the NLU engine produced for one entity name.
    ///
    /// The flattened `entities` map keeps only the last value; this reads
    /// the raw payload so handlers can see duplicates.
    pub fn nlu_entity_values(&self, name: &str) -> Vec<String> {
        let nlu = match self.metadata.get("nlu") {
            Some(Value::String(s)) => serde_json::from_str::<Value>(s).ok(),
            Some(other) => Some(other.clone()),
            None => None,
        };

        nlu.as_ref()
            .and_then(|n| n.get("entities"))
            .and_then(|e| e.as_array())
            .map(|entities| {
                entities
                    .iter()
                    .filter(|e| e.get("entity").and_then(|v| v.as_str()) == Some(name))
                    .filter_map(|e| match e.get("value") {
                        Some(Value::String(s)) => Some(s.clone()),
                        Some(Value::Null) | None => None,
                        Some(other) => Some(other.to_string()),
                    })
                    .collect()
            })
            .unwrap_or_default()
    }
}

/// Why a dispatch was deferred instead of executed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeferralReason {
    LowConfidence,
    ConfirmationRequired,
}

impl DeferralReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            DeferralReason::LowConfidence => "low_confidence",
            DeferralReason::ConfirmationRequired => "confirmation_required",
        }
    }
}

/// What to re-run once the user confirms
#[derive(Debug, Clone, PartialEq)]
pub struct FollowUp {
    /// Name of the handler that would have executed
    pub handler: String,
    pub reason: DeferralReason,
    pub intent: String,
    pub confidence: f32,
    pub entities: Entities,
    pub raw_text: String,
    pub metadata: Metadata,
}

/// Outcome of a dispatch
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IntentResponse {
    pub success: bool,
    /// Spoken to the user when non-empty
    pub message: String,
    pub data: Option<Metadata>,
    /// Implies `success == false`
    pub requires_follow_up: bool,
    pub follow_up: Option<FollowUp>,
}

impl IntentResponse {
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
            ..Default::default()
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            ..Default::default()
        }
    }

    /// Failed response with the error recorded under `data.error`
    pub fn failed_with_error(message: impl Into<String>, error: impl ToString) -> Self {
        Self::failed(message).with_data("error", error.to_string())
    }

    pub fn with_data(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.data
            .get_or_insert_with(Metadata::new)
            .insert(key.to_string(), value.into());
        self
    }

    /// Deferred response: nothing executed, waiting on the user
    pub fn deferred(follow_up: FollowUp) -> Self {
        Self {
            success: false,
            message: String::new(),
            data: None,
            requires_follow_up: true,
            follow_up: Some(follow_up),
        }
    }

    pub fn is_deferred(&self) -> bool {
        self.requires_follow_up && self.follow_up.is_some()
    }
}

/// A capability the assistant can dispatch intents to
#[async_trait]
pub trait IntentHandler: Send + Sync {
    /// Handler name, used in logs and follow-ups
    fn name(&self) -> &str;

    /// Intent names this handler serves
    fn supported_intents(&self) -> &[&'static str];

    /// Minimum confidence required to execute without asking
    fn confidence_threshold(&self) -> f32 {
        DEFAULT_CONFIDENCE_THRESHOLD
    }

    /// Whether the action must always be confirmed first
    fn requires_confirmation(&self) -> bool {
        false
    }

    async fn execute(&self, ctx: &IntentContext) -> AssistantResult<IntentResponse>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::Modality;
    use crate::executor::DryRunExecutor;
    use serde_json::json;

    fn executor() -> Arc<dyn ActionExecutor> {
        Arc::new(DryRunExecutor::new())
    }

    #[test]
    fn test_context_from_event() {
        let mut event = RecognitionEvent::new(Modality::Speech, "search_location", 0.9)
            .with_entity("location", "Aveiro")
            .with_text("find Aveiro");
        event.nlu = Some(json!({"intent": {"name": "search_location"}}));

        let ctx = IntentContext::from_event(event, executor());
        assert_eq!(ctx.intent, "search_location");
        assert_eq!(ctx.entity("location"), Some("Aveiro"));
        assert_eq!(ctx.metadata["text"], "find Aveiro");
        assert!(ctx.metadata.contains_key("nlu"));
        assert!(!ctx.confirmed);
    }

    #[test]
    fn test_nlu_entity_values_keeps_duplicates() {
        let mut ctx = IntentContext::new("get_directions", 0.9, Entities::new(), executor());
        ctx.metadata.insert(
            "nlu".to_string(),
            json!({"entities": [
                {"entity": "destination", "value": "Lisboa"},
                {"entity": "mode", "value": "car"},
                {"entity": "destination", "value": "Porto"}
            ]}),
        );
        assert_eq!(ctx.nlu_entity_values("destination"), vec!["Lisboa", "Porto"]);
        assert!(ctx.nlu_entity_values("origin").is_empty());

        // Double-encoded payloads are read too
        ctx.metadata.insert(
            "nlu".to_string(),
            Value::String(r#"{"entities":[{"entity":"origin","value":"Faro"}]}"#.to_string()),
        );
        assert_eq!(ctx.nlu_entity_values("origin"), vec!["Faro"]);
    }

    #[test]
    fn test_response_constructors() {
        let ok = IntentResponse::ok("Done");
        assert!(ok.success && !ok.requires_follow_up);

        let failed = IntentResponse::failed_with_error("Nope", "boom");
        assert!(!failed.success);
        assert_eq!(failed.data.unwrap()["error"], "boom");

        let deferred = IntentResponse::deferred(FollowUp {
            handler: "navigation".to_string(),
            reason: DeferralReason::LowConfidence,
            intent: "start_navigation".to_string(),
            confidence: 0.4,
            entities: Entities::new(),
            raw_text: String::new(),
            metadata: Metadata::new(),
        });
        assert!(deferred.is_deferred());
        assert!(!deferred.success);
    }
}
