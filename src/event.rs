//! Recognition Events
//!
//! The single normalized unit of input produced per envelope: one intent,
//! its confidence and the entities extracted alongside it.

use serde_json::Value;
use std::fmt;

/// Source of a recognition event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Modality {
    Speech,
    Gesture,
    /// Server-side combination of speech and gesture
    Fusion,
}

impl Modality {
    /// Wire tag used in the `recognized` list
    pub fn tag(&self) -> &'static str {
        match self {
            Modality::Speech => "SPEECH",
            Modality::Gesture => "GESTURES",
            Modality::Fusion => "FUSION",
        }
    }
}

/// Ordered entity map.
///
/// Keeps insertion order so prompts and logs are deterministic. Inserting an
/// existing key replaces the value in place.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Entities(Vec<(String, String)>);

impl Entities {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    /// Insert or overwrite a value (last write wins, first position kept)
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.0.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = value,
            None => self.0.push((key, value)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Entities {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut entities = Entities::new();
        for (k, v) in iter {
            entities.insert(k, v);
        }
        entities
    }
}

impl fmt::Display for Entities {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.iter().map(|(k, v)| format!("{}={}", k, v)).collect();
        write!(f, "{{{}}}", parts.join(", "))
    }
}

/// One decoded unit of multimodal input
#[derive(Debug, Clone, PartialEq)]
pub struct RecognitionEvent {
    /// Modality of the fragment that supplied the resolved intent
    pub modality: Modality,
    pub intent: String,
    /// Recognizer confidence in [0, 1]
    pub confidence: f32,
    pub entities: Entities,
    /// Transcribed text, empty for pure gestures
    pub raw_text: String,
    /// Raw NLU payload of the SPEECH fragment, kept for multi-valued entities
    pub nlu: Option<Value>,
}

impl RecognitionEvent {
    pub fn new(modality: Modality, intent: impl Into<String>, confidence: f32) -> Self {
        Self {
            modality,
            intent: intent.into(),
            // NaN counts as no confidence at all
            confidence: if confidence.is_nan() {
                0.0
            } else {
                confidence.clamp(0.0, 1.0)
            },
            entities: Entities::new(),
            raw_text: String::new(),
            nlu: None,
        }
    }

    pub fn with_entity(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.entities.insert(key, value);
        self
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.raw_text = text.into();
        self
    }
}
