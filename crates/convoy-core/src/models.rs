//! Core data models for the route planner.

use serde::{Deserialize, Serialize};

/// Stable node identifier, `{label}_{index}` for built graphs.
pub type NodeId = String;

/// Ground classification of a waypoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TerrainClass {
    Plains,
    Mountainous,
    Desert,
    Forest,
    Urban,
    Riverine,
    SnowCovered,
}

impl TerrainClass {
    pub const ALL: [TerrainClass; 7] = [
        TerrainClass::Plains,
        TerrainClass::Mountainous,
        TerrainClass::Desert,
        TerrainClass::Forest,
        TerrainClass::Urban,
        TerrainClass::Riverine,
        TerrainClass::SnowCovered,
    ];
}

/// Prevailing weather at a waypoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WeatherClass {
    Clear,
    Rain,
    HeavyRain,
    Snow,
    Blizzard,
    Fog,
    DustStorm,
    ExtremeHeat,
}

impl WeatherClass {
    pub const ALL: [WeatherClass; 8] = [
        WeatherClass::Clear,
        WeatherClass::Rain,
        WeatherClass::HeavyRain,
        WeatherClass::Snow,
        WeatherClass::Blizzard,
        WeatherClass::Fog,
        WeatherClass::DustStorm,
        WeatherClass::ExtremeHeat,
    ];
}

/// Ordinal threat level. Variant order is the ordering: green is safest,
/// black is critical.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum ThreatLevel {
    #[default]
    Green,
    Yellow,
    Orange,
    Red,
    Black,
}

impl ThreatLevel {
    pub const ALL: [ThreatLevel; 5] = [
        ThreatLevel::Green,
        ThreatLevel::Yellow,
        ThreatLevel::Orange,
        ThreatLevel::Red,
        ThreatLevel::Black,
    ];

    /// The most severe level, applied to nodes inside an obstacle radius.
    pub const CRITICAL: ThreatLevel = ThreatLevel::Black;

    pub fn ordinal(self) -> u8 {
        self as u8
    }
}

/// One waypoint of a candidate route with its environmental attributes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub id: NodeId,
    pub lat: f64,
    pub lon: f64,
    /// Meters above sea level, never negative.
    pub altitude_m: f64,
    pub terrain: TerrainClass,
    pub weather: WeatherClass,
    pub threat: ThreatLevel,
    #[serde(default)]
    pub is_checkpoint: bool,
    #[serde(default)]
    pub is_fuel_point: bool,
}

impl Node {
    /// Create a plains/clear/green node at sea level.
    pub fn new(id: impl Into<NodeId>, lat: f64, lon: f64) -> Self {
        Self {
            id: id.into(),
            lat,
            lon,
            altitude_m: 0.0,
            terrain: TerrainClass::Plains,
            weather: WeatherClass::Clear,
            threat: ThreatLevel::Green,
            is_checkpoint: false,
            is_fuel_point: false,
        }
    }

    pub fn with_altitude(mut self, altitude_m: f64) -> Self {
        self.altitude_m = altitude_m.max(0.0);
        self
    }

    pub fn with_conditions(
        mut self,
        terrain: TerrainClass,
        weather: WeatherClass,
        threat: ThreatLevel,
    ) -> Self {
        self.terrain = terrain;
        self.weather = weather;
        self.threat = threat;
        self
    }

    pub fn coordinate(&self) -> (f64, f64) {
        (self.lat, self.lon)
    }
}

/// Directed connection between two nodes. Immutable once the graph is built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Edge {
    pub from: NodeId,
    pub to: NodeId,
    pub distance_km: f64,
    /// Hours at the graph's reference speed.
    pub base_time_h: f64,
    /// Inherited from the origin node.
    pub terrain: TerrainClass,
    /// In `[0, 1]`, 1.0 is a paved highway.
    pub road_quality: f64,
    /// Worst of the two endpoint threat levels at construction time.
    pub threat: ThreatLevel,
    /// Signed percent, positive is uphill in the direction of travel.
    pub gradient_pct: f64,
}
