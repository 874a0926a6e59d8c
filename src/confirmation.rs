//! Confirmation State Machine
//!
//! Holds at most one pending confirmation. A deferred dispatch parks its
//! intent here until the user affirms (re-run) or denies (drop) it.

use lazy_static::lazy_static;
use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::{info, warn};

use crate::event::Entities;
use crate::intent::FollowUp;

/// What happens to a pending confirmation when an unrelated intent arrives
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StaleConfirmationPolicy {
    /// Drop the pending confirmation, then route the new intent
    #[default]
    Discard,
    /// Route the new intent and keep waiting for affirm/deny
    Keep,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfirmationPhase {
    Idle,
    AwaitingConfirmation,
}

/// An intent waiting on the user's yes/no
#[derive(Debug, Clone, PartialEq)]
pub struct PendingConfirmation {
    pub intent: String,
    pub confidence: f32,
    pub entities: Entities,
    /// Follow-up of the deferred response, used to rebuild the context
    pub context: Option<FollowUp>,
}

impl PendingConfirmation {
    pub fn from_follow_up(follow_up: FollowUp) -> Self {
        Self {
            intent: follow_up.intent.clone(),
            confidence: follow_up.confidence,
            entities: follow_up.entities.clone(),
            context: Some(follow_up),
        }
    }
}

/// Single-slot confirmation state
#[derive(Debug, Default)]
pub struct ConfirmationState {
    pending: Option<PendingConfirmation>,
}

impl ConfirmationState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> ConfirmationPhase {
        if self.pending.is_some() {
            ConfirmationPhase::AwaitingConfirmation
        } else {
            ConfirmationPhase::Idle
        }
    }

    pub fn has_pending(&self) -> bool {
        self.pending.is_some()
    }

    pub fn pending(&self) -> Option<&PendingConfirmation> {
        self.pending.as_ref()
    }

    /// Park an intent; replaces any earlier pending one
    pub fn set_pending(&mut self, pending: PendingConfirmation) {
        if let Some(previous) = &self.pending {
            info!(
                "Replacing pending confirmation '{}' with '{}'",
                previous.intent, pending.intent
            );
        }
        info!("⏸️ Awaiting confirmation for '{}'", pending.intent);
        self.pending = Some(pending);
    }

    /// Take the pending confirmation out of the slot
    pub fn affirm(&mut self) -> Option<PendingConfirmation> {
        match self.pending.take() {
            Some(pending) => {
                info!("✅ User affirmed '{}'", pending.intent);
                Some(pending)
            }
            None => {
                warn!("No pending confirmation to affirm");
                None
            }
        }
    }

    /// Drop the pending confirmation; `true` if there was one
    pub fn deny(&mut self) -> bool {
        match self.pending.take() {
            Some(pending) => {
                info!("❌ User denied '{}'", pending.intent);
                true
            }
            None => {
                warn!("No pending confirmation to deny");
                false
            }
        }
    }

    pub fn clear(&mut self) {
        if let Some(pending) = self.pending.take() {
            info!("Cleared pending confirmation for '{}'", pending.intent);
        }
    }
}

lazy_static! {
    static ref PLACEHOLDER: Regex = Regex::new(r"\{(\w+)\}").unwrap();
    static ref PROMPT_TEMPLATES: HashMap<&'static str, &'static str> = HashMap::from([
        ("search_location", "Did you want to search for {location}?"),
        ("get_directions", "Should I get directions to {destination}?"),
        ("start_navigation", "Should I start navigation?"),
        ("stop_navigation", "Did you want to stop navigation?"),
        ("show_place_details", "Did you want to see the place details?"),
        ("show_reviews", "Should I show the reviews?"),
        ("show_photos", "Did you want to see the photos?"),
        ("get_opening_hours", "Did you want to know the opening hours?"),
        ("zoom_in", "Did you want to zoom in?"),
        ("zoom_out", "Did you want to zoom out?"),
        ("recenter_map", "Did you want to recenter the map?"),
        ("center_location", "Did you want to center the map on {location}?"),
        ("show_traffic", "Did you want to show traffic?"),
        ("hide_traffic", "Did you want to hide traffic?"),
        ("change_map_type", "Did you want to change the map type?"),
        ("get_trip_duration", "Did you want to know how long it takes?"),
        ("get_trip_distance", "Did you want to know the distance?"),
        ("change_transport_mode", "Did you want to change the transport mode?"),
        ("swap_route", "Did you want to reverse the route?"),
        ("select_place", "Did you want to select this place?"),
        ("select_alternative_route", "Did you want to use an alternative route?"),
        ("goodbye", "Did you want to leave?"),
        ("cancel", "Did you want to cancel?"),
        ("greet", "Hello! How can I help?"),
        ("thanks", "You're welcome!"),
        ("help", "Did you want help?"),
    ]);
}

/// Replace '_' with spaces for speaking an intent name
pub fn humanize(intent: &str) -> String {
    intent.replace('_', " ")
}

/// Build the yes/no question for a deferred intent.
///
/// Unknown intents get a generic question. A template whose placeholder has
/// no matching entity is returned unfilled.
pub fn confirmation_prompt(intent: &str, entities: &Entities) -> String {
    let template = match PROMPT_TEMPLATES.get(intent) {
        Some(template) => *template,
        None => return format!("Did you want to {}?", humanize(intent)),
    };

    let lookup = |name: &str| placeholder_value(intent, entities, name);

    let complete = PLACEHOLDER
        .captures_iter(template)
        .all(|caps| lookup(&caps[1]).is_some());
    if !complete {
        return template.to_string();
    }

    PLACEHOLDER
        .replace_all(template, |caps: &Captures| {
            lookup(&caps[1]).unwrap_or_default().to_string()
        })
        .into_owned()
}

fn placeholder_value<'a>(intent: &str, entities: &'a Entities, name: &str) -> Option<&'a str> {
    match entities.get(name) {
        Some(value) => Some(value),
        None if intent == "center_location" && name == "location" => entities.get("destination"),
        None => None,
    }
}
