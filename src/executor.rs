//! Action Executor capability
//!
//! The side-effecting layer (browser automation against the map UI) lives
//! outside the dispatch core. Handlers only see this trait; timeouts and
//! retries are the implementation's concern.

use async_trait::async_trait;
use tracing::info;

use crate::domain::{MapType, PanDirection, PlaceCategory, TransportMode, ZoomDirection};
use crate::error::{AssistantError, AssistantResult};

/// Result of a map search
#[derive(Debug, Clone, PartialEq)]
pub enum SearchOutcome {
    /// The map jumped straight to a single place page
    Place(String),
    /// A list of result names, best first
    Results(Vec<String>),
    NotFound,
}

/// Details of the currently selected place
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlaceDetails {
    pub name: String,
    pub rating: Option<f32>,
    pub total_ratings: Option<u32>,
    pub is_open_now: Option<bool>,
}

impl PlaceDetails {
    pub fn rating_text(&self) -> String {
        match (self.rating, self.total_ratings) {
            (Some(rating), Some(total)) => format!("{:.1} stars from {} reviews", rating, total),
            (Some(rating), None) => format!("{:.1} stars", rating),
            _ => "no rating available".to_string(),
        }
    }
}

/// Operations a handler may invoke on the map.
///
/// Boolean results mean "the UI did what was asked"; `Err` means the attempt
/// itself broke. Less common operations default to `Unsupported`.
#[async_trait]
pub trait ActionExecutor: Send + Sync + std::fmt::Debug {
    /// Backend name
    fn name(&self) -> &str;

    /// Close open panels before a fresh search or route
    async fn reset_view(&self) -> AssistantResult<()> {
        Ok(())
    }

    async fn search(&self, query: &str) -> AssistantResult<SearchOutcome>;

    async fn set_directions(&self, destination: &str, origin: Option<&str>)
        -> AssistantResult<bool>;

    async fn select_transport_mode(&self, mode: TransportMode) -> AssistantResult<bool> {
        let _ = mode;
        Err(AssistantError::unsupported("select_transport_mode"))
    }

    async fn start_navigation(&self) -> AssistantResult<bool>;

    async fn stop_navigation(&self) -> AssistantResult<bool> {
        Err(AssistantError::unsupported("stop_navigation"))
    }

    async fn zoom(&self, direction: ZoomDirection, steps: u32) -> AssistantResult<()>;

    async fn pan(&self, direction: PanDirection, steps: u32) -> AssistantResult<bool>;

    async fn set_map_type(&self, map_type: MapType) -> AssistantResult<bool> {
        let _ = map_type;
        Err(AssistantError::unsupported("set_map_type"))
    }

    async fn set_traffic(&self, visible: bool) -> AssistantResult<bool> {
        let _ = visible;
        Err(AssistantError::unsupported("set_traffic"))
    }

    async fn recenter(&self) -> AssistantResult<bool> {
        Err(AssistantError::unsupported("recenter"))
    }

    async fn center_on(&self, location: &str) -> AssistantResult<bool> {
        let _ = location;
        Err(AssistantError::unsupported("center_on"))
    }

    async fn place_details(&self) -> AssistantResult<Option<PlaceDetails>> {
        Err(AssistantError::unsupported("place_details"))
    }

    async fn reviews(&self, limit: usize) -> AssistantResult<Vec<String>> {
        let _ = limit;
        Err(AssistantError::unsupported("reviews"))
    }

    async fn show_photos(&self) -> AssistantResult<bool> {
        Err(AssistantError::unsupported("show_photos"))
    }

    async fn opening_hours(&self) -> AssistantResult<Option<String>> {
        Err(AssistantError::unsupported("opening_hours"))
    }

    async fn trip_duration(&self) -> AssistantResult<Option<String>> {
        Err(AssistantError::unsupported("trip_duration"))
    }

    async fn trip_distance(&self) -> AssistantResult<Option<String>> {
        Err(AssistantError::unsupported("trip_distance"))
    }

    async fn swap_route(&self) -> AssistantResult<bool> {
        Err(AssistantError::unsupported("swap_route"))
    }

    /// Open the result at a 0-based index, returning its name
    async fn select_result(&self, index: usize) -> AssistantResult<Option<String>> {
        let _ = index;
        Err(AssistantError::unsupported("select_result"))
    }

    async fn select_alternative_route(&self, index: usize) -> AssistantResult<bool> {
        let _ = index;
        Err(AssistantError::unsupported("select_alternative_route"))
    }

    async fn apply_filter(&self, category: PlaceCategory) -> AssistantResult<bool> {
        let _ = category;
        Err(AssistantError::unsupported("apply_filter"))
    }

    /// Open the "things to do" explore menu
    async fn open_explore(&self) -> AssistantResult<bool> {
        Err(AssistantError::unsupported("open_explore"))
    }

    async fn in_street_view(&self) -> AssistantResult<bool> {
        Ok(false)
    }

    async fn enter_street_view(&self) -> AssistantResult<bool> {
        Err(AssistantError::unsupported("enter_street_view"))
    }

    async fn exit_street_view(&self) -> AssistantResult<bool> {
        Err(AssistantError::unsupported("exit_street_view"))
    }

    async fn rotate_street_view(&self, direction: PanDirection) -> AssistantResult<bool> {
        let _ = direction;
        Err(AssistantError::unsupported("rotate_street_view"))
    }

    /// Step forward (`true`) or backward in street view
    async fn move_street_view(&self, forward: bool) -> AssistantResult<bool> {
        let _ = forward;
        Err(AssistantError::unsupported("move_street_view"))
    }

    /// Move keyboard focus to the previous (`true`) or next option of a list
    async fn focus_option(&self, up: bool) -> AssistantResult<()> {
        let _ = up;
        Err(AssistantError::unsupported("focus_option"))
    }
}

/// Executor that logs every operation and reports success.
///
/// Backs the command-line simulator when no browser is attached.
#[derive(Debug, Default)]
pub struct DryRunExecutor;

impl DryRunExecutor {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl ActionExecutor for DryRunExecutor {
    fn name(&self) -> &str {
        "dry-run"
    }

    async fn search(&self, query: &str) -> AssistantResult<SearchOutcome> {
        info!("🔎 [dry-run] search '{}'", query);
        Ok(SearchOutcome::Place(query.to_string()))
    }

    async fn set_directions(
        &self,
        destination: &str,
        origin: Option<&str>,
    ) -> AssistantResult<bool> {
        info!(
            "🧭 [dry-run] directions {} -> {}",
            origin.unwrap_or("current location"),
            destination
        );
        Ok(true)
    }

    async fn select_transport_mode(&self, mode: TransportMode) -> AssistantResult<bool> {
        info!("🚗 [dry-run] transport mode {}", mode.as_str());
        Ok(true)
    }

    async fn start_navigation(&self) -> AssistantResult<bool> {
        info!("▶️ [dry-run] start navigation");
        Ok(true)
    }

    async fn stop_navigation(&self) -> AssistantResult<bool> {
        info!("⏹️ [dry-run] stop navigation");
        Ok(true)
    }

    async fn zoom(&self, direction: ZoomDirection, steps: u32) -> AssistantResult<()> {
        info!("🔍 [dry-run] zoom {:?} x{}", direction, steps);
        Ok(())
    }

    async fn pan(&self, direction: PanDirection, steps: u32) -> AssistantResult<bool> {
        info!("↔️ [dry-run] pan {} x{}", direction.as_str(), steps);
        Ok(true)
    }

    async fn set_map_type(&self, map_type: MapType) -> AssistantResult<bool> {
        info!("🗺️ [dry-run] map type {}", map_type.as_str());
        Ok(true)
    }

    async fn set_traffic(&self, visible: bool) -> AssistantResult<bool> {
        info!("🚦 [dry-run] traffic visible={}", visible);
        Ok(true)
    }

    async fn recenter(&self) -> AssistantResult<bool> {
        info!("🎯 [dry-run] recenter");
        Ok(true)
    }

    async fn center_on(&self, location: &str) -> AssistantResult<bool> {
        info!("🎯 [dry-run] center on '{}'", location);
        Ok(true)
    }

    async fn place_details(&self) -> AssistantResult<Option<PlaceDetails>> {
        info!("📍 [dry-run] place details");
        Ok(None)
    }

    async fn reviews(&self, limit: usize) -> AssistantResult<Vec<String>> {
        info!("⭐ [dry-run] top {} reviews", limit);
        Ok(Vec::new())
    }

    async fn show_photos(&self) -> AssistantResult<bool> {
        info!("📷 [dry-run] photos");
        Ok(true)
    }

    async fn opening_hours(&self) -> AssistantResult<Option<String>> {
        info!("🕘 [dry-run] opening hours");
        Ok(None)
    }

    async fn trip_duration(&self) -> AssistantResult<Option<String>> {
        Ok(None)
    }

    async fn trip_distance(&self) -> AssistantResult<Option<String>> {
        Ok(None)
    }

    async fn swap_route(&self) -> AssistantResult<bool> {
        info!("🔁 [dry-run] swap route");
        Ok(true)
    }

    async fn select_result(&self, index: usize) -> AssistantResult<Option<String>> {
        info!("👆 [dry-run] select result #{}", index + 1);
        Ok(Some(format!("result {}", index + 1)))
    }

    async fn select_alternative_route(&self, index: usize) -> AssistantResult<bool> {
        info!("🛣️ [dry-run] alternative route #{}", index + 1);
        Ok(true)
    }

    async fn apply_filter(&self, category: PlaceCategory) -> AssistantResult<bool> {
        info!("🏷️ [dry-run] filter {}", category.label());
        Ok(true)
    }

    async fn open_explore(&self) -> AssistantResult<bool> {
        info!("🧭 [dry-run] explore menu");
        Ok(true)
    }

    async fn enter_street_view(&self) -> AssistantResult<bool> {
        info!("🚶 [dry-run] enter street view");
        Ok(true)
    }

    async fn exit_street_view(&self) -> AssistantResult<bool> {
        info!("🚶 [dry-run] exit street view");
        Ok(true)
    }

    async fn focus_option(&self, up: bool) -> AssistantResult<()> {
        info!("⌨️ [dry-run] focus {} option", if up { "previous" } else { "next" });
        Ok(())
    }
}
