//! Map controls: zoom, recenter, traffic layer and map type

use async_trait::async_trait;
use tracing::info;

use crate::domain::{MapType, ZoomDirection, ZoomLevel};
use crate::error::AssistantResult;
use crate::executor::SearchOutcome;
use crate::intent::{IntentContext, IntentHandler, IntentResponse};

/// Filler words stripped from "center on ..." transcriptions
const CENTER_FILLERS: &[&str] = &[
    "center", "centre", "recenter", "recentre", "the", "map", "on", "in", "at",
];

pub struct MapControlHandler;

impl MapControlHandler {
    async fn zoom(ctx: &IntentContext, direction: ZoomDirection) -> AssistantResult<IntentResponse> {
        let phrase = ctx.entity("zoom_level");
        let steps = phrase.map(ZoomLevel::from_phrase).unwrap_or_default().steps();
        ctx.executor.zoom(direction, steps).await?;

        let verb = match direction {
            ZoomDirection::In => "Zooming in",
            ZoomDirection::Out => "Zooming out",
        };
        Ok(match phrase {
            Some(level) => IntentResponse::ok(format!("{} {}", verb, level)),
            None => IntentResponse::ok(verb),
        })
    }

    /// Location named in a recenter request, if any
    fn recenter_target(ctx: &IntentContext) -> Option<String> {
        if let Some(location) = ctx.entity("location").or_else(|| ctx.entity("destination")) {
            return Some(location.to_string());
        }

        let text = ctx.text().to_lowercase();
        let remaining: Vec<&str> = text
            .split_whitespace()
            .filter(|word| !CENTER_FILLERS.contains(word))
            .collect();
        (!remaining.is_empty()).then(|| remaining.join(" "))
    }

    async fn recenter(ctx: &IntentContext) -> AssistantResult<IntentResponse> {
        match Self::recenter_target(ctx) {
            Some(location) => {
                info!("🎯 Centering map on {}", location);
                if ctx.executor.search(&location).await? != SearchOutcome::NotFound {
                    return Ok(IntentResponse::ok(format!("Map centered on {}", location)));
                }
            }
            None => {
                if ctx.executor.recenter().await? {
                    return Ok(IntentResponse::ok("Map recentered on your location"));
                }
            }
        }
        Ok(IntentResponse::failed("Sorry, I couldn't recenter the map"))
    }

    async fn center_location(ctx: &IntentContext) -> AssistantResult<IntentResponse> {
        let location = match ctx.entity("location").or_else(|| ctx.entity("destination")) {
            Some(location) => location,
            None => {
                return Ok(IntentResponse::failed(
                    "Which place should I center the map on?",
                ))
            }
        };

        info!("🎯 Centering map on {}", location);
        if !ctx.executor.center_on(location).await? {
            return Ok(IntentResponse::failed(format!("I couldn't find {}", location)));
        }
        Ok(IntentResponse::ok(format!("Centered on {}", location)).with_data("location", location))
    }

    async fn traffic(ctx: &IntentContext, visible: bool) -> AssistantResult<IntentResponse> {
        info!("🚦 Traffic layer visible={}", visible);
        let done = ctx.executor.set_traffic(visible).await?;
        Ok(match (done, visible) {
            (true, true) => IntentResponse::ok("Showing traffic on the map"),
            (true, false) => IntentResponse::ok("Traffic hidden"),
            (false, true) => IntentResponse::failed("I couldn't show traffic. Please try again."),
            (false, false) => IntentResponse::failed("I couldn't hide traffic. Please try again."),
        })
    }
}

#[async_trait]
impl IntentHandler for MapControlHandler {
    fn name(&self) -> &str {
        "map_control"
    }

    fn supported_intents(&self) -> &[&'static str] {
        &[
            "zoom_in",
            "zoom_out",
            "recenter_map",
            "center_location",
            "show_traffic",
            "hide_traffic",
        ]
    }

    fn confidence_threshold(&self) -> f32 {
        0.70
    }

    async fn execute(&self, ctx: &IntentContext) -> AssistantResult<IntentResponse> {
        match ctx.intent.as_str() {
            "zoom_in" => Self::zoom(ctx, ZoomDirection::In).await,
            "zoom_out" => Self::zoom(ctx, ZoomDirection::Out).await,
            "recenter_map" => Self::recenter(ctx).await,
            "center_location" => Self::center_location(ctx).await,
            "show_traffic" => Self::traffic(ctx, true).await,
            "hide_traffic" => Self::traffic(ctx, false).await,
            other => Ok(IntentResponse::failed(format!(
                "I don't know how to handle '{}'",
                other
            ))),
        }
    }
}

pub struct MapTypeHandler;

#[async_trait]
impl IntentHandler for MapTypeHandler {
    fn name(&self) -> &str {
        "map_type"
    }

    fn supported_intents(&self) -> &[&'static str] {
        &["change_map_type"]
    }

    async fn execute(&self, ctx: &IntentContext) -> AssistantResult<IntentResponse> {
        let phrase = match ctx.entity("map_type") {
            Some(phrase) => phrase,
            None => {
                return Ok(IntentResponse::failed_with_error(
                    "Which map type do you want? Satellite, terrain or default?",
                    "missing entity: map_type",
                ))
            }
        };

        let map_type = match MapType::from_phrase(phrase) {
            Some(map_type) => map_type,
            None => {
                return Ok(IntentResponse::failed(format!(
                    "I don't recognise the map type '{}'",
                    phrase
                )))
            }
        };

        if !ctx.executor.set_map_type(map_type).await? {
            return Ok(IntentResponse::failed(format!(
                "Sorry, I couldn't switch to the {} view",
                map_type.as_str()
            )));
        }
        Ok(IntentResponse::ok(format!("Switched to the {} view", map_type.as_str())))
    }
}
