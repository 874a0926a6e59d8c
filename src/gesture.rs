//! Gesture Normalizer
//!
//! Maps the short semantic codes emitted by the gesture recognizer to
//! canonical intent names. Confirmation gestures map onto the same
//! `affirm`/`deny` intents as spoken confirmations.

use lazy_static::lazy_static;
use std::collections::HashMap;

/// Prefix used for gesture intents, including synthesized ones
pub const GESTURE_PREFIX: &str = "gesture_";

lazy_static! {
    static ref GESTURE_INTENTS: HashMap<&'static str, &'static str> = HashMap::from([
        // Confirmation gestures
        ("thumbsup", "affirm"),
        ("thumbs_up", "affirm"),
        ("thumbup", "affirm"),
        ("yes", "affirm"),
        ("ok", "affirm"),
        ("thumbsdown", "deny"),
        ("thumbs_down", "deny"),
        ("thumbdown", "deny"),
        ("no", "deny"),
        ("cancel", "deny"),
        // Recognizer semantic codes
        ("camera", "gesture_camera"),
        ("downol", "gesture_down_option"),
        ("enters", "gesture_enter_street"),
        ("exits", "gesture_exit_street"),
        ("hotels", "gesture_hotels"),
        ("restaurants", "gesture_restaurants"),
        ("select", "gesture_select"),
        ("swiped", "gesture_swipe_down"),
        ("swipell", "gesture_swipe_left"),
        ("swiperr", "gesture_swipe_right"),
        ("swipeu", "gesture_swipe_up"),
        ("transports", "gesture_transports"),
        ("upor", "gesture_up_option"),
        ("zoomi", "gesture_zoom_in"),
        ("zoomo", "gesture_zoom_out"),
    ]);
}

/// Normalize a raw gesture code into an intent name.
///
/// Unknown codes become `gesture_<code>` so a handler can be registered for
/// them without touching the decoder.
pub fn normalize(code: &str) -> String {
    let code = code.trim().to_lowercase();
    match GESTURE_INTENTS.get(code.as_str()) {
        Some(intent) => intent.to_string(),
        None => format!("{}{}", GESTURE_PREFIX, code),
    }
}

/// Whether the code is in the static table
pub fn is_known(code: &str) -> bool {
    GESTURE_INTENTS.contains_key(code.trim().to_lowercase().as_str())
}

/// All codes in the static table
pub fn known_codes() -> impl Iterator<Item = &'static str> {
    GESTURE_INTENTS.keys().copied()
}
