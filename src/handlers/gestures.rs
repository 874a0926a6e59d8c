//! Gesture actions
//!
//! Swipes are street-view aware: in street view they turn or step the
//! camera, on the map they pan.

use async_trait::async_trait;
use tracing::info;

use crate::domain::{PanDirection, PlaceCategory, ZoomDirection};
use crate::error::AssistantResult;
use crate::intent::{IntentContext, IntentHandler, IntentResponse};

/// Pan steps per swipe on the map
const SWIPE_PAN_STEPS: u32 = 3;

/// Zoom clicks per zoom gesture
const GESTURE_ZOOM_STEPS: u32 = 2;

pub struct GestureHandler;

impl GestureHandler {
    async fn swipe(ctx: &IntentContext, direction: PanDirection) -> AssistantResult<IntentResponse> {
        let executor = &ctx.executor;

        if executor.in_street_view().await? {
            let (done, ok_msg, fail_msg) = match direction {
                PanDirection::Left | PanDirection::Right => (
                    executor.rotate_street_view(direction).await?,
                    format!("Looking {}", direction.as_str()),
                    "I couldn't turn",
                ),
                PanDirection::Up => (
                    executor.move_street_view(true).await?,
                    "Moving forward".to_string(),
                    "I couldn't move forward",
                ),
                PanDirection::Down => (
                    executor.move_street_view(false).await?,
                    "Moving back".to_string(),
                    "I couldn't move back",
                ),
            };
            return Ok(Self::outcome(done, &ok_msg, fail_msg));
        }

        if executor.pan(direction, SWIPE_PAN_STEPS).await? {
            Ok(IntentResponse::ok(format!("Moving {}", direction.as_str())))
        } else {
            Ok(IntentResponse::failed("I couldn't move the map"))
        }
    }

    async fn filter(ctx: &IntentContext, category: PlaceCategory) -> AssistantResult<IntentResponse> {
        if !ctx.executor.apply_filter(category).await? {
            return Ok(IntentResponse::failed(format!(
                "I couldn't show {}",
                category.label()
            )));
        }
        Ok(IntentResponse::ok(format!("Showing {} in the area", category.label())))
    }

    async fn forward(ctx: &IntentContext) -> AssistantResult<IntentResponse> {
        if !ctx.executor.in_street_view().await? {
            return Ok(IntentResponse::failed("I'm not in street view"));
        }
        if ctx.executor.move_street_view(true).await? {
            Ok(IntentResponse::ok("Moving forward"))
        } else {
            Ok(IntentResponse::failed("I couldn't move forward"))
        }
    }

    fn outcome(done: bool, ok: &str, failed: &str) -> IntentResponse {
        if done {
            IntentResponse::ok(ok)
        } else {
            IntentResponse::failed(failed)
        }
    }
}

#[async_trait]
impl IntentHandler for GestureHandler {
    fn name(&self) -> &str {
        "gestures"
    }

    fn supported_intents(&self) -> &[&'static str] {
        &[
            "gesture_swipe_left",
            "gesture_swipe_right",
            "gesture_swipe_up",
            "gesture_swipe_down",
            "gesture_zoom_in",
            "gesture_zoom_out",
            "gesture_restaurants",
            "gesture_hotels",
            "gesture_gas_stations",
            "gesture_transports",
            "gesture_camera",
            "gesture_enter_street",
            "gesture_exit_street",
            "gesture_forward",
            "gesture_select",
            "gesture_up_option",
            "gesture_down_option",
        ]
    }

    fn confidence_threshold(&self) -> f32 {
        0.70
    }

    async fn execute(&self, ctx: &IntentContext) -> AssistantResult<IntentResponse> {
        info!("👋 Gesture: {}", ctx.intent);
        let executor = &ctx.executor;

        match ctx.intent.as_str() {
            "gesture_swipe_left" => Self::swipe(ctx, PanDirection::Left).await,
            "gesture_swipe_right" => Self::swipe(ctx, PanDirection::Right).await,
            "gesture_swipe_up" => Self::swipe(ctx, PanDirection::Up).await,
            "gesture_swipe_down" => Self::swipe(ctx, PanDirection::Down).await,
            "gesture_zoom_in" => {
                executor.zoom(ZoomDirection::In, GESTURE_ZOOM_STEPS).await?;
                Ok(IntentResponse::ok("Zooming in"))
            }
            "gesture_zoom_out" => {
                executor.zoom(ZoomDirection::Out, GESTURE_ZOOM_STEPS).await?;
                Ok(IntentResponse::ok("Zooming out"))
            }
            "gesture_restaurants" => Self::filter(ctx, PlaceCategory::Restaurants).await,
            "gesture_hotels" => Self::filter(ctx, PlaceCategory::Hotels).await,
            "gesture_gas_stations" => Self::filter(ctx, PlaceCategory::GasStations).await,
            "gesture_transports" => Self::filter(ctx, PlaceCategory::Transit).await,
            "gesture_camera" => Ok(Self::outcome(
                executor.open_explore().await?,
                "Opening things to do",
                "I couldn't find the 'Things to do' button",
            )),
            "gesture_enter_street" => Ok(Self::outcome(
                executor.enter_street_view().await?,
                "Entering street view",
                "Street view isn't available here",
            )),
            "gesture_exit_street" => Ok(Self::outcome(
                executor.exit_street_view().await?,
                "Leaving street view",
                "I couldn't leave street view",
            )),
            "gesture_forward" => Self::forward(ctx).await,
            "gesture_select" => {
                executor.select_result(0).await?;
                Ok(IntentResponse::ok("Selected"))
            }
            "gesture_up_option" => {
                executor.focus_option(true).await?;
                Ok(IntentResponse::ok("Previous option"))
            }
            "gesture_down_option" => {
                executor.focus_option(false).await?;
                Ok(IntentResponse::ok("Next option"))
            }
            other => Ok(IntentResponse::failed(format!(
                "I don't know how to handle '{}'",
                other
            ))),
        }
    }
}
