//! Cost model: environmental attributes to multiplicative cost factors.
//!
//! All factors are >= 1.0, so under `Balanced` and `SafetyPriority` an edge
//! never costs less than its raw distance.

use crate::models::{Edge, TerrainClass, ThreatLevel, WeatherClass};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// How edge costs trade distance against terrain and threat.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CostMode {
    #[default]
    Balanced,
    SafetyPriority,
    SpeedPriority,
}

impl CostMode {
    pub fn as_str(self) -> &'static str {
        match self {
            CostMode::Balanced => "balanced",
            CostMode::SafetyPriority => "safety_priority",
            CostMode::SpeedPriority => "speed_priority",
        }
    }
}

impl fmt::Display for CostMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CostMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "balanced" => Ok(CostMode::Balanced),
            "safety" | "safety_priority" => Ok(CostMode::SafetyPriority),
            "speed" | "speed_priority" => Ok(CostMode::SpeedPriority),
            other => Err(format!("unknown cost mode '{other}'")),
        }
    }
}

pub fn terrain_factor(terrain: TerrainClass) -> f64 {
    match terrain {
        TerrainClass::Plains => 1.0,
        TerrainClass::Urban => 1.3,
        TerrainClass::Desert => 1.4,
        TerrainClass::Forest => 1.6,
        TerrainClass::Riverine => 1.8,
        TerrainClass::SnowCovered => 2.2,
        TerrainClass::Mountainous => 2.5,
    }
}

pub fn weather_factor(weather: WeatherClass) -> f64 {
    match weather {
        WeatherClass::Clear => 1.0,
        WeatherClass::Rain => 1.2,
        WeatherClass::ExtremeHeat => 1.25,
        WeatherClass::Fog => 1.3,
        WeatherClass::HeavyRain => 1.5,
        WeatherClass::Snow => 1.6,
        WeatherClass::DustStorm => 1.8,
        WeatherClass::Blizzard => 2.5,
    }
}

pub fn threat_factor(threat: ThreatLevel) -> f64 {
    match threat {
        ThreatLevel::Green => 1.0,
        ThreatLevel::Yellow => 1.5,
        ThreatLevel::Orange => 2.5,
        ThreatLevel::Red => 4.0,
        ThreatLevel::Black => 10.0,
    }
}

/// `2.0 - road_quality`, so a perfect road is neutral and a track doubles cost.
pub fn quality_penalty(road_quality: f64) -> f64 {
    2.0 - road_quality.clamp(0.0, 1.0)
}

/// Uphill grades add cost, downhill grades are free.
pub fn gradient_factor(gradient_pct: f64) -> f64 {
    1.0 + (gradient_pct / 100.0).max(0.0)
}

/// Cost of traversing `edge` under `mode`, using the threat captured on the edge.
pub fn edge_cost(edge: &Edge, mode: CostMode) -> f64 {
    edge_cost_with_threat(edge, edge.threat, mode)
}

/// Cost of traversing `edge` under `mode` with an explicit threat level.
///
/// Searches pass the live endpoint threat here so transient node overrides
/// are priced without mutating edges.
pub fn edge_cost_with_threat(edge: &Edge, threat: ThreatLevel, mode: CostMode) -> f64 {
    let distance = edge.distance_km.max(0.0);
    let terrain = terrain_factor(edge.terrain);
    let quality = quality_penalty(edge.road_quality);
    match mode {
        CostMode::SafetyPriority => {
            let threat = threat_factor(threat);
            distance * terrain * threat * threat * quality
        }
        CostMode::SpeedPriority => distance * (terrain * 0.5) * quality,
        CostMode::Balanced => {
            distance
                * terrain
                * threat_factor(threat)
                * quality
                * gradient_factor(edge.gradient_pct)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn edge(terrain: TerrainClass, threat: ThreatLevel, quality: f64, gradient: f64) -> Edge {
        Edge {
            from: "a".into(),
            to: "b".into(),
            distance_km: 12.0,
            base_time_h: 0.3,
            terrain,
            road_quality: quality,
            threat,
            gradient_pct: gradient,
        }
    }

    #[test]
    fn balanced_and_safety_never_undercut_distance() {
        for terrain in TerrainClass::ALL {
            for threat in ThreatLevel::ALL {
                for quality in [0.0, 0.5, 1.0] {
                    for gradient in [-12.0, 0.0, 8.0] {
                        let e = edge(terrain, threat, quality, gradient);
                        assert!(edge_cost(&e, CostMode::Balanced) >= e.distance_km);
                        assert!(edge_cost(&e, CostMode::SafetyPriority) >= e.distance_km);
                    }
                }
            }
        }
    }

    #[test]
    fn safety_squares_threat() {
        let e = edge(TerrainClass::Plains, ThreatLevel::Red, 1.0, 0.0);
        let expected = 12.0 * 4.0 * 4.0;
        assert!((edge_cost(&e, CostMode::SafetyPriority) - expected).abs() < 1e-9);
    }

    #[test]
    fn speed_halves_terrain_and_ignores_threat() {
        let calm = edge(TerrainClass::Mountainous, ThreatLevel::Green, 0.5, 0.0);
        let hot = edge(TerrainClass::Mountainous, ThreatLevel::Black, 0.5, 0.0);
        let cost = edge_cost(&calm, CostMode::SpeedPriority);
        assert!((cost - 12.0 * 1.25 * 1.5).abs() < 1e-9);
        assert_eq!(cost, edge_cost(&hot, CostMode::SpeedPriority));
    }

    #[test]
    fn balanced_penalizes_only_uphill() {
        let flat = edge(TerrainClass::Plains, ThreatLevel::Green, 1.0, 0.0);
        let down = edge(TerrainClass::Plains, ThreatLevel::Green, 1.0, -20.0);
        let up = edge(TerrainClass::Plains, ThreatLevel::Green, 1.0, 10.0);
        assert_eq!(edge_cost(&flat, CostMode::Balanced), 12.0);
        assert_eq!(edge_cost(&down, CostMode::Balanced), 12.0);
        assert!((edge_cost(&up, CostMode::Balanced) - 13.2).abs() < 1e-9);
    }

    #[test]
    fn explicit_threat_overrides_edge_threat() {
        let e = edge(TerrainClass::Plains, ThreatLevel::Green, 1.0, 0.0);
        let live = edge_cost_with_threat(&e, ThreatLevel::Black, CostMode::SafetyPriority);
        assert!((live - 1200.0).abs() < 1e-9);
    }

    #[test]
    fn mode_parses_aliases() {
        assert_eq!("safety".parse::<CostMode>(), Ok(CostMode::SafetyPriority));
        assert_eq!("Speed-Priority".parse::<CostMode>(), Ok(CostMode::SpeedPriority));
        assert!("reckless".parse::<CostMode>().is_err());
        assert_eq!(CostMode::Balanced.to_string(), "balanced");
    }
}
