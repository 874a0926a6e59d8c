//! Information about the selected place

use async_trait::async_trait;
use tracing::info;

use crate::error::AssistantResult;
use crate::intent::{IntentContext, IntentHandler, IntentResponse};

/// Reviews fetched per request
const MAX_REVIEWS: usize = 3;

pub struct PlaceInfoHandler;

impl PlaceInfoHandler {
    fn select_first(what: &str) -> IntentResponse {
        IntentResponse::failed(format!("Please select a place first to see its {}", what))
    }

    async fn details(ctx: &IntentContext) -> AssistantResult<IntentResponse> {
        let details = match ctx.executor.place_details().await? {
            Some(details) => details,
            None => return Ok(Self::select_first("details")),
        };

        let mut parts = vec![details.name.clone()];
        if details.rating.is_some() {
            parts.push(details.rating_text());
        }
        if let Some(open) = details.is_open_now {
            parts.push(if open { "Open now" } else { "Closed" }.to_string());
        }

        Ok(IntentResponse::ok(parts.join(". ")).with_data("place_name", details.name))
    }

    async fn reviews(ctx: &IntentContext) -> AssistantResult<IntentResponse> {
        let details = match ctx.executor.place_details().await? {
            Some(details) => details,
            None => return Ok(Self::select_first("reviews")),
        };

        let reviews = ctx.executor.reviews(MAX_REVIEWS).await?;
        if reviews.is_empty() {
            return Ok(IntentResponse::ok("This place has no reviews yet"));
        }

        Ok(IntentResponse::ok(format!(
            "Showing reviews for {}. I found {} recent reviews",
            details.name,
            reviews.len()
        ))
        .with_data("reviews", reviews))
    }

    async fn photos(ctx: &IntentContext) -> AssistantResult<IntentResponse> {
        let details = match ctx.executor.place_details().await? {
            Some(details) => details,
            None => return Ok(Self::select_first("photos")),
        };

        if !ctx.executor.show_photos().await? {
            return Ok(IntentResponse::failed("Sorry, I couldn't open the photos"));
        }
        Ok(IntentResponse::ok(format!("Showing photos of {}", details.name)))
    }

    async fn opening_hours(ctx: &IntentContext) -> AssistantResult<IntentResponse> {
        let details = match ctx.executor.place_details().await? {
            Some(details) => details,
            None => return Ok(Self::select_first("opening hours")),
        };

        let hours = ctx.executor.opening_hours().await?;
        let message = match (details.is_open_now, hours) {
            (Some(open), Some(hours)) => format!(
                "{} is {} now. Hours: {}",
                details.name,
                if open { "open" } else { "closed" },
                hours
            ),
            (Some(open), None) => format!(
                "{} is {} now",
                details.name,
                if open { "open" } else { "closed" }
            ),
            (None, Some(hours)) => format!("{} hours: {}", details.name, hours),
            (None, None) => {
                return Ok(IntentResponse::failed(format!(
                    "Opening hours aren't available for {}",
                    details.name
                )))
            }
        };
        Ok(IntentResponse::ok(message))
    }
}

#[async_trait]
impl IntentHandler for PlaceInfoHandler {
    fn name(&self) -> &str {
        "place_info"
    }

    fn supported_intents(&self) -> &[&'static str] {
        &[
            "show_place_details",
            "show_reviews",
            "show_photos",
            "get_opening_hours",
        ]
    }

    fn confidence_threshold(&self) -> f32 {
        0.70
    }

    async fn execute(&self, ctx: &IntentContext) -> AssistantResult<IntentResponse> {
        info!("📍 Place info: {}", ctx.intent);
        match ctx.intent.as_str() {
            "show_place_details" => Self::details(ctx).await,
            "show_reviews" => Self::reviews(ctx).await,
            "show_photos" => Self::photos(ctx).await,
            "get_opening_hours" => Self::opening_hours(ctx).await,
            other => Ok(IntentResponse::failed(format!(
                "I don't know how to handle '{}'",
                other
            ))),
        }
    }
}
