//! Picking a search result or an alternative route by ordinal

use async_trait::async_trait;
use tracing::info;

use crate::domain::parse_ordinal;
use crate::error::AssistantResult;
use crate::intent::{IntentContext, IntentHandler, IntentResponse};

/// Words that point back at the main route
const MAIN_ROUTE_WORDS: &[&str] = &[
    "previous", "main", "original", "first", "anterior", "principal", "primeira", "primeiro",
];

pub struct SelectPlaceHandler;

#[async_trait]
impl IntentHandler for SelectPlaceHandler {
    fn name(&self) -> &str {
        "select_place"
    }

    fn supported_intents(&self) -> &[&'static str] {
        &["select_place"]
    }

    async fn execute(&self, ctx: &IntentContext) -> AssistantResult<IntentResponse> {
        let ordinal = match ctx.entity("ordinal") {
            Some(ordinal) => ordinal,
            None => {
                return Ok(IntentResponse::failed(
                    "Which result do you want? Say 'first', 'second' and so on.",
                ))
            }
        };

        let index = match parse_ordinal(ordinal) {
            Some(index) => index,
            None => {
                return Ok(IntentResponse::failed(format!(
                    "I didn't understand '{}'. Use 'first', 'second' and so on.",
                    ordinal
                )))
            }
        };

        info!("👆 Selecting result #{}", index);
        let response = match ctx.executor.select_result(index - 1).await? {
            Some(name) if !name.is_empty() => {
                IntentResponse::ok(format!("Selected {}", name)).with_data("place_name", name)
            }
            Some(_) => IntentResponse::ok(format!("Selected result number {}", index)),
            None => IntentResponse::failed(format!(
                "I couldn't find result number {}. How many results are there?",
                index
            )),
        };
        Ok(response.with_data("index", index))
    }
}

pub struct AlternativeRouteHandler;

impl AlternativeRouteHandler {
    /// 0-based route index; the first alternative unless told otherwise
    fn route_index(ctx: &IntentContext) -> usize {
        if let Some(ordinal) = ctx.entity("ordinal") {
            return parse_ordinal(ordinal).map(|n| n - 1).unwrap_or(1);
        }

        let text = ctx.text().to_lowercase();
        let main_route = text
            .split_whitespace()
            .any(|word| MAIN_ROUTE_WORDS.contains(&word));
        if main_route {
            0
        } else {
            1
        }
    }
}

#[async_trait]
impl IntentHandler for AlternativeRouteHandler {
    fn name(&self) -> &str {
        "alternative_route"
    }

    fn supported_intents(&self) -> &[&'static str] {
        &["select_alternative_route"]
    }

    fn confidence_threshold(&self) -> f32 {
        0.70
    }

    async fn execute(&self, ctx: &IntentContext) -> AssistantResult<IntentResponse> {
        let index = Self::route_index(ctx);
        info!("🛣️ Selecting route #{}", index + 1);

        if !ctx.executor.select_alternative_route(index).await? {
            return Ok(IntentResponse::failed(
                "I couldn't find alternative routes. Ask for directions first.",
            ));
        }
        Ok(IntentResponse::ok(format!("Selected route number {}", index + 1)))
    }
}
