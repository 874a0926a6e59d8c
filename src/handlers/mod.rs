//! Capability handlers
//!
//! One module per handler family. `default_registry` wires them all up.

use std::sync::Arc;
use tracing::info;

use crate::registry::HandlerRegistry;

pub mod conversation;
pub mod gestures;
pub mod map_control;
pub mod navigation;
pub mod place_info;
pub mod search;
pub mod selection;
pub mod trip_info;

pub use conversation::{ConfirmationReplyHandler, ConversationHandler};
pub use gestures::GestureHandler;
pub use map_control::{MapControlHandler, MapTypeHandler};
pub use navigation::{DirectionsHandler, StartNavigationHandler, StopNavigationHandler};
pub use place_info::PlaceInfoHandler;
pub use search::SearchHandler;
pub use selection::{AlternativeRouteHandler, SelectPlaceHandler};
pub use trip_info::TripInfoHandler;

/// Registry with every built-in handler
pub fn default_registry() -> HandlerRegistry {
    let mut registry = HandlerRegistry::new();

    registry.register(Arc::new(SearchHandler));
    registry.register(Arc::new(DirectionsHandler));
    registry.register(Arc::new(StartNavigationHandler));
    registry.register(Arc::new(StopNavigationHandler));
    registry.register(Arc::new(MapControlHandler));
    registry.register(Arc::new(MapTypeHandler));
    registry.register(Arc::new(PlaceInfoHandler));
    registry.register(Arc::new(TripInfoHandler));
    registry.register(Arc::new(SelectPlaceHandler));
    registry.register(Arc::new(AlternativeRouteHandler));
    registry.register(Arc::new(GestureHandler));
    registry.register(Arc::new(ConversationHandler));
    registry.register(Arc::new(ConfirmationReplyHandler));

    info!("📋 Registered handlers for {} intents", registry.len());
    registry
}
