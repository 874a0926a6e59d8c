//! Location search

use async_trait::async_trait;
use tracing::{info, warn};

use crate::error::AssistantResult;
use crate::executor::SearchOutcome;
use crate::intent::{IntentContext, IntentHandler, IntentResponse};

/// How many result names are read out
const SPOKEN_RESULTS: usize = 3;

pub struct SearchHandler;

impl SearchHandler {
    /// The full transcription wins over the `location` entity; NLU tends to
    /// split queries like "restaurants near the river".
    fn query(ctx: &IntentContext) -> Option<String> {
        let text = ctx.text();
        let query = if !text.is_empty() {
            text
        } else {
            ctx.entity("location").unwrap_or_default().trim()
        };

        (query.chars().count() > 2).then(|| query.to_string())
    }
}

#[async_trait]
impl IntentHandler for SearchHandler {
    fn name(&self) -> &str {
        "search"
    }

    fn supported_intents(&self) -> &[&'static str] {
        &["search_location"]
    }

    fn confidence_threshold(&self) -> f32 {
        0.70
    }

    async fn execute(&self, ctx: &IntentContext) -> AssistantResult<IntentResponse> {
        let query = match Self::query(ctx) {
            Some(q) => q,
            None => {
                return Ok(IntentResponse::failed_with_error(
                    "I didn't catch the location. Which place should I look for?",
                    "invalid_location",
                ))
            }
        };

        info!("🔎 Searching for: {}", query);
        if let Err(e) = ctx.executor.reset_view().await {
            warn!("Could not reset the map before searching: {}", e);
        }

        let response = match ctx.executor.search(&query).await? {
            SearchOutcome::Place(name) => IntentResponse::ok(format!("Found {}", name))
                .with_data("direct_match", true)
                .with_data("place_name", name),
            SearchOutcome::Results(names) if names.is_empty() => {
                IntentResponse::ok(format!("I couldn't find any results for {}.", query))
            }
            SearchOutcome::Results(names) => {
                let top: Vec<String> = names.into_iter().take(SPOKEN_RESULTS).collect();
                let message = if top.len() == 1 {
                    format!("Found {}", top[0])
                } else {
                    format!("Found {} results: {}", top.len(), top.join(", "))
                };
                IntentResponse::ok(message).with_data("results", top)
            }
            SearchOutcome::NotFound => {
                return Ok(IntentResponse::failed(format!(
                    "Sorry, I couldn't search for {}. Please try again.",
                    query
                )))
            }
        };

        Ok(response.with_data("query", query))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::Entities;
    use crate::executor::DryRunExecutor;
    use std::sync::Arc;

    fn ctx(text: &str, location: Option<&str>) -> IntentContext {
        let mut entities = Entities::new();
        if let Some(location) = location {
            entities.insert("location", location);
        }
        IntentContext::new("search_location", 0.9, entities, Arc::new(DryRunExecutor::new()))
            .with_text(text)
    }

    #[test]
    fn test_query_prefers_text() {
        let ctx = ctx(" restaurants near the river ", Some("river"));
        assert_eq!(
            SearchHandler::query(&ctx).as_deref(),
            Some("restaurants near the river")
        );
    }

    #[test]
    fn test_query_falls_back_to_entity() {
        assert_eq!(SearchHandler::query(&ctx("", Some("Lisboa"))).as_deref(), Some("Lisboa"));
        assert_eq!(SearchHandler::query(&ctx("", Some("ab"))), None);
        assert_eq!(SearchHandler::query(&ctx("", None)), None);
    }
}
