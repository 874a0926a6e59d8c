//! Active route: duration, distance, transport mode and direction

use async_trait::async_trait;
use tracing::info;

use crate::domain::TransportMode;
use crate::error::AssistantResult;
use crate::intent::{IntentContext, IntentHandler, IntentResponse};

const NO_ROUTE: &str = "I can't see any active directions. Ask for directions first.";

/// Keywords that name a transport mode inside a longer sentence
const MODE_KEYWORDS: &[(&str, &str)] = &[
    ("walk", "walking"),
    ("foot", "on foot"),
    ("caminhar", "caminhar"),
    ("andar", "andar"),
    ("pé", "a pé"),
    ("car", "car"),
    ("drive", "driving"),
    ("carro", "carro"),
    ("conduzir", "carro"),
    ("transit", "transit"),
    ("public transport", "public transport"),
    ("transportes", "transportes públicos"),
    ("bus", "bus"),
    ("autocarro", "autocarro"),
    ("train", "train"),
    ("comboio", "comboio"),
    ("metro", "metro"),
    ("bike", "bike"),
    ("bicycle", "bicycle"),
    ("bicicleta", "bicicleta"),
    ("motorcycle", "motorcycle"),
    ("mota", "mota"),
    ("scooter", "scooter"),
];

pub struct TripInfoHandler;

impl TripInfoHandler {
    /// Transport mode phrase from the entity, or spotted in the text
    fn mode_phrase(ctx: &IntentContext) -> Option<String> {
        if let Some(mode) = ctx.entity("transport_mode") {
            return Some(mode.to_string());
        }

        let text = ctx.text().to_lowercase();
        if text.is_empty() {
            return None;
        }
        let spotted = MODE_KEYWORDS
            .iter()
            .find(|(keyword, _)| {
                if keyword.contains(' ') {
                    text.contains(keyword)
                } else {
                    text.split_whitespace().any(|word| word == *keyword)
                }
            })
            .map(|(_, mode)| mode.to_string());
        Some(spotted.unwrap_or(text))
    }

    async fn change_mode(ctx: &IntentContext) -> AssistantResult<IntentResponse> {
        let phrase = match Self::mode_phrase(ctx) {
            Some(phrase) => phrase,
            None => {
                return Ok(IntentResponse::failed(
                    "Which transport mode do you want to use?",
                ))
            }
        };

        let mode = match TransportMode::from_phrase(&phrase) {
            Some(mode) => mode,
            None => {
                return Ok(IntentResponse::failed(format!(
                    "I don't recognise the transport mode {}",
                    phrase
                )))
            }
        };

        info!("🚗 Changing transport mode to {}", mode.as_str());
        if !ctx.executor.select_transport_mode(mode).await? {
            return Ok(IntentResponse::failed(format!(
                "Sorry, I can't travel by {} on this route",
                mode.spoken()
            )));
        }
        Ok(IntentResponse::ok(format!("Switched to {}", mode.spoken()))
            .with_data("transport_mode", mode.as_str()))
    }
}

#[async_trait]
impl IntentHandler for TripInfoHandler {
    fn name(&self) -> &str {
        "trip_info"
    }

    fn supported_intents(&self) -> &[&'static str] {
        &[
            "get_trip_duration",
            "get_trip_distance",
            "change_transport_mode",
            "swap_route",
            "reverse_route",
            "invert_route",
        ]
    }

    fn confidence_threshold(&self) -> f32 {
        0.70
    }

    async fn execute(&self, ctx: &IntentContext) -> AssistantResult<IntentResponse> {
        let executor = &ctx.executor;
        let response = match ctx.intent.as_str() {
            "get_trip_duration" => match executor.trip_duration().await? {
                Some(duration) => IntentResponse::ok(format!("The trip takes {}", duration))
                    .with_data("duration", duration),
                None => IntentResponse::failed(NO_ROUTE),
            },
            "get_trip_distance" => match executor.trip_distance().await? {
                Some(distance) => IntentResponse::ok(format!("The distance is {}", distance))
                    .with_data("distance", distance),
                None => IntentResponse::failed(NO_ROUTE),
            },
            "change_transport_mode" => return Self::change_mode(ctx).await,
            "swap_route" | "reverse_route" | "invert_route" => {
                if executor.swap_route().await? {
                    IntentResponse::ok("I reversed the route")
                } else {
                    IntentResponse::failed(
                        "I can't reverse the route. Make sure you have active directions.",
                    )
                }
            }
            other => IntentResponse::failed(format!("I don't know how to handle '{}'", other)),
        };
        Ok(response)
    }
}
