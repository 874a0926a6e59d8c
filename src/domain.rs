//! Map domain vocabulary
//!
//! Spoken words (English and Portuguese) for transport modes, map views,
//! zoom intensity and ordinals, plus the small map state the assistant
//! keeps between turns.

use crate::event::Entities;
use crate::intent::IntentResponse;
use tracing::debug;

/// Transportation modes for directions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportMode {
    Driving,
    Walking,
    Transit,
    Cycling,
    TwoWheeler,
}

impl TransportMode {
    /// Parse a spoken transport mode ("car", "a pé", "bus", ...)
    pub fn from_phrase(value: &str) -> Option<Self> {
        let mode = match value.trim().to_lowercase().as_str() {
            "driving" | "drive" | "car" | "auto" | "vehicle" | "carro" | "conduzir"
            | "automóvel" | "viatura" => TransportMode::Driving,
            "walking" | "walk" | "on foot" | "foot" | "a pé" | "andar" | "caminhar" => {
                TransportMode::Walking
            }
            "transit" | "public transport" | "public transportation" | "bus" | "train"
            | "metro" | "subway" | "transportes públicos" | "autocarro" | "comboio" | "trem" => {
                TransportMode::Transit
            }
            "cycling" | "bike" | "bicycle" | "biking" | "bicicleta" | "bici" | "ciclismo" => {
                TransportMode::Cycling
            }
            "two-wheeler" | "motorcycle" | "scooter" | "mota" | "motociclo" => {
                TransportMode::TwoWheeler
            }
            _ => return None,
        };
        Some(mode)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TransportMode::Driving => "driving",
            TransportMode::Walking => "walking",
            TransportMode::Transit => "transit",
            TransportMode::Cycling => "cycling",
            TransportMode::TwoWheeler => "two-wheeler",
        }
    }

    /// Phrase used in spoken feedback
    pub fn spoken(&self) -> &'static str {
        match self {
            TransportMode::Driving => "car",
            TransportMode::Walking => "foot",
            TransportMode::Transit => "public transport",
            TransportMode::Cycling => "bike",
            TransportMode::TwoWheeler => "motorcycle",
        }
    }
}

/// Map view types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MapType {
    #[default]
    Default,
    Satellite,
    Terrain,
    Traffic,
}

impl MapType {
    pub fn from_phrase(value: &str) -> Option<Self> {
        let map_type = match value.trim().to_lowercase().as_str() {
            "default" | "map" | "normal" | "standard" | "padrão" | "mapa" => MapType::Default,
            "satellite" | "sat" | "aerial" | "satélite" => MapType::Satellite,
            "terrain" | "topographic" | "topo" | "terreno" | "relevo" => MapType::Terrain,
            "traffic" | "trânsito" | "tráfego" => MapType::Traffic,
            _ => return None,
        };
        Some(map_type)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            MapType::Default => "default",
            MapType::Satellite => "satellite",
            MapType::Terrain => "terrain",
            MapType::Traffic => "traffic",
        }
    }
}

/// Zoom intensity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ZoomLevel {
    Little,
    #[default]
    Normal,
    Lot,
}

impl ZoomLevel {
    /// Unknown phrases fall back to `Normal`
    pub fn from_phrase(value: &str) -> Self {
        match value.trim().to_lowercase().as_str() {
            "a little" | "little" | "slightly" | "bit" | "um pouco" | "pouco"
            | "ligeiramente" => ZoomLevel::Little,
            "a lot" | "lot" | "much" | "very" | "muito" | "bastante" => ZoomLevel::Lot,
            _ => ZoomLevel::Normal,
        }
    }

    /// Number of zoom clicks
    pub fn steps(&self) -> u32 {
        match self {
            ZoomLevel::Little => 1,
            ZoomLevel::Normal => 2,
            ZoomLevel::Lot => 3,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ZoomDirection {
    In,
    Out,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanDirection {
    Left,
    Right,
    Up,
    Down,
}

impl PanDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            PanDirection::Left => "left",
            PanDirection::Right => "right",
            PanDirection::Up => "up",
            PanDirection::Down => "down",
        }
    }
}

/// Place categories exposed as quick filters on the map
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaceCategory {
    Restaurants,
    Hotels,
    GasStations,
    Transit,
}

impl PlaceCategory {
    pub fn label(&self) -> &'static str {
        match self {
            PlaceCategory::Restaurants => "restaurants",
            PlaceCategory::Hotels => "hotels",
            PlaceCategory::GasStations => "gas stations",
            PlaceCategory::Transit => "public transport",
        }
    }
}

/// Parse a 1-based ordinal ("first", "segunda", "3", "3rd")
pub fn parse_ordinal(text: &str) -> Option<usize> {
    let word_map: &[(&str, usize)] = &[
        ("first", 1),
        ("1st", 1),
        ("one", 1),
        ("primeiro", 1),
        ("primeira", 1),
        ("second", 2),
        ("2nd", 2),
        ("two", 2),
        ("segundo", 2),
        ("segunda", 2),
        ("third", 3),
        ("3rd", 3),
        ("three", 3),
        ("terceiro", 3),
        ("terceira", 3),
        ("fourth", 4),
        ("quarto", 4),
        ("quarta", 4),
        ("fifth", 5),
        ("quinto", 5),
        ("quinta", 5),
        ("sixth", 6),
        ("sexto", 6),
        ("sexta", 6),
        ("seventh", 7),
        ("sétimo", 7),
        ("sétima", 7),
        ("eighth", 8),
        ("oitavo", 8),
        ("oitava", 8),
        ("ninth", 9),
        ("nono", 9),
        ("nona", 9),
        ("tenth", 10),
        ("décimo", 10),
        ("décima", 10),
    ];

    let text = text.trim().to_lowercase();
    if let Ok(n) = text.parse::<usize>() {
        return (n > 0).then_some(n);
    }

    word_map
        .iter()
        .find(|(word, _)| text == *word || text.starts_with(&format!("{} ", word)))
        .map(|(_, n)| *n)
}

/// What the assistant knows about the map between turns
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MapState {
    pub map_type: MapType,
    pub traffic_enabled: bool,
    pub navigating: bool,
    pub last_search_query: Option<String>,
}

impl MapState {
    /// Record the effect of a successful response
    pub fn apply(&mut self, intent: &str, entities: &Entities, response: &IntentResponse) {
        if !response.success {
            return;
        }

        match intent {
            "search_location" => {
                self.last_search_query = response
                    .data
                    .as_ref()
                    .and_then(|d| d.get("query"))
                    .and_then(|q| q.as_str())
                    .or_else(|| entities.get("location"))
                    .map(str::to_string);
            }
            "change_map_type" => {
                if let Some(map_type) = entities.get("map_type").and_then(MapType::from_phrase) {
                    self.map_type = map_type;
                }
            }
            "show_traffic" => self.traffic_enabled = true,
            "hide_traffic" => self.traffic_enabled = false,
            "start_navigation" => self.navigating = true,
            "stop_navigation" => self.navigating = false,
            _ => return,
        }

        debug!("Map state updated: {:?}", self);
    }
}
