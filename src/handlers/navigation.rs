//! Directions and turn-by-turn navigation

use async_trait::async_trait;
use serde_json::Value;
use tracing::{info, warn};

use crate::domain::TransportMode;
use crate::error::AssistantResult;
use crate::executor::SearchOutcome;
use crate::intent::{IntentContext, IntentHandler, IntentResponse};

pub struct DirectionsHandler;

impl DirectionsHandler {
    /// Work out (origin, destination).
    ///
    /// "from Lixa to Lisboa" often arrives as two `destination` entities and
    /// no `origin`; read that as origin then destination.
    fn endpoints(ctx: &IntentContext) -> (Option<String>, Option<String>) {
        let mut origin = ctx.entity("origin").map(str::to_string);
        let mut destination = ctx.entity("destination").map(str::to_string);

        let destinations = ctx.nlu_entity_values("destination");
        if destinations.len() >= 2 && origin.is_none() {
            origin = Some(destinations[0].clone());
            destination = Some(destinations[1].clone());
            info!("Dual destinations read as {:?} -> {:?}", origin, destination);
        } else if destinations.len() == 1 {
            destination = Some(destinations[0].clone());
        }

        if destination.is_none() {
            let text = ctx.text();
            if text.chars().count() > 2 {
                info!("Using full text as destination: {}", text);
                destination = Some(text.to_string());
            }
        }

        (origin, destination)
    }
}

#[async_trait]
impl IntentHandler for DirectionsHandler {
    fn name(&self) -> &str {
        "directions"
    }

    fn supported_intents(&self) -> &[&'static str] {
        &["get_directions"]
    }

    async fn execute(&self, ctx: &IntentContext) -> AssistantResult<IntentResponse> {
        let (origin, destination) = Self::endpoints(ctx);
        let destination = match destination {
            Some(d) => d,
            None => {
                return Ok(IntentResponse::failed_with_error(
                    "Where do you want to go?",
                    "missing_destination",
                ))
            }
        };

        info!(
            "🧭 Directions: {} -> {}",
            origin.as_deref().unwrap_or("current location"),
            destination
        );
        if let Err(e) = ctx.executor.reset_view().await {
            warn!("Could not reset the map before directions: {}", e);
        }

        let executor = &ctx.executor;
        let mut routed = executor
            .set_directions(&destination, origin.as_deref())
            .await?;
        if !routed {
            info!("Direct directions failed, searching for {} first", destination);
            if executor.search(&destination).await? != SearchOutcome::NotFound {
                routed = executor
                    .set_directions(&destination, origin.as_deref())
                    .await?;
            }
        }
        if !routed {
            return Ok(IntentResponse::failed(format!(
                "Sorry, I couldn't get directions to {}. Please try again.",
                destination
            )));
        }

        let requested_mode = ctx.entity("transport_mode");
        let mut mode_text = String::new();
        if let Some(phrase) = requested_mode {
            match TransportMode::from_phrase(phrase) {
                Some(mode) => {
                    if executor.select_transport_mode(mode).await? {
                        mode_text = format!(" by {}", mode.spoken());
                    }
                }
                None => warn!("Unknown transport mode: {}", phrase),
            }
        }

        let message = format!(
            "Showing directions from {} to {}{}",
            origin.as_deref().unwrap_or("your current location"),
            destination,
            mode_text
        );
        Ok(IntentResponse::ok(message)
            .with_data("origin", origin.map(Value::String).unwrap_or(Value::Null))
            .with_data("destination", destination)
            .with_data(
                "transport_mode",
                requested_mode.map(|m| Value::String(m.to_string())).unwrap_or(Value::Null),
            ))
    }
}

pub struct StartNavigationHandler;

#[async_trait]
impl IntentHandler for StartNavigationHandler {
    fn name(&self) -> &str {
        "start_navigation"
    }

    fn supported_intents(&self) -> &[&'static str] {
        &["start_navigation"]
    }

    fn confidence_threshold(&self) -> f32 {
        0.80
    }

    fn requires_confirmation(&self) -> bool {
        true
    }

    async fn execute(&self, ctx: &IntentContext) -> AssistantResult<IntentResponse> {
        info!("▶️ Starting navigation");
        if !ctx.executor.start_navigation().await? {
            return Ok(IntentResponse::failed(
                "Sorry, I couldn't start navigation. Make sure you have directions set.",
            ));
        }
        Ok(IntentResponse::ok("Navigation started. Have a good trip!"))
    }
}

pub struct StopNavigationHandler;

#[async_trait]
impl IntentHandler for StopNavigationHandler {
    fn name(&self) -> &str {
        "stop_navigation"
    }

    fn supported_intents(&self) -> &[&'static str] {
        &["stop_navigation"]
    }

    fn confidence_threshold(&self) -> f32 {
        0.70
    }

    async fn execute(&self, ctx: &IntentContext) -> AssistantResult<IntentResponse> {
        info!("⏹️ Stopping navigation");
        if !ctx.executor.stop_navigation().await? {
            return Ok(IntentResponse::failed("Sorry, I couldn't stop navigation."));
        }
        Ok(IntentResponse::ok("Navigation stopped"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::Entities;
    use crate::executor::DryRunExecutor;
    use serde_json::json;
    use std::sync::Arc;

    fn context(entities: Entities) -> IntentContext {
        IntentContext::new("get_directions", 0.9, entities, Arc::new(DryRunExecutor::new()))
    }

    #[test]
    fn test_dual_destinations_become_origin() {
        let mut ctx = context([("destination", "Lisboa")].into_iter().collect());
        ctx.metadata.insert(
            "nlu".to_string(),
            json!({"entities": [
                {"entity": "destination", "value": "Lixa"},
                {"entity": "destination", "value": "Lisboa"}
            ]}),
        );

        let (origin, destination) = DirectionsHandler::endpoints(&ctx);
        assert_eq!(origin.as_deref(), Some("Lixa"));
        assert_eq!(destination.as_deref(), Some("Lisboa"));
    }

    #[test]
    fn test_explicit_origin_is_kept() {
        let mut ctx = context([("origin", "Braga"), ("destination", "Porto")]
            .into_iter()
            .collect());
        ctx.metadata.insert(
            "nlu".to_string(),
            json!({"entities": [
                {"entity": "destination", "value": "Porto"},
                {"entity": "destination", "value": "Faro"}
            ]}),
        );

        let (origin, destination) = DirectionsHandler::endpoints(&ctx);
        assert_eq!(origin.as_deref(), Some("Braga"));
        assert_eq!(destination.as_deref(), Some("Porto"));
    }

    #[test]
    fn test_text_fallback() {
        let ctx = context(Entities::new()).with_text("Coimbra");
        assert_eq!(DirectionsHandler::endpoints(&ctx).1.as_deref(), Some("Coimbra"));

        let ctx = context(Entities::new()).with_text("go");
        assert_eq!(DirectionsHandler::endpoints(&ctx).1, None);
    }

    #[tokio::test]
    async fn test_missing_destination() {
        let response = DirectionsHandler.execute(&context(Entities::new())).await.unwrap();
        assert!(!response.success);
        assert_eq!(response.message, "Where do you want to go?");
    }
}
