//! Waypoint classification: altitude, terrain, weather and threat per coordinate.
//!
//! Graph construction only talks to [`WaypointClassifier`], so elevation or
//! weather feeds can replace the synthetic classifier without touching the
//! builder.

use crate::models::{TerrainClass, ThreatLevel, WeatherClass};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Source of environmental attributes for a waypoint.
pub trait WaypointClassifier {
    /// Ground altitude in meters. Negative values are clamped by the builder.
    fn altitude_m(&self, lat: f64, lon: f64) -> f64;

    fn terrain(&self, lat: f64, lon: f64, altitude_m: f64) -> TerrainClass;

    fn weather(&self, lat: f64, lon: f64, altitude_m: f64) -> WeatherClass;

    fn threat(&self, lat: f64, lon: f64) -> ThreatLevel;
}

/// Same attributes for every waypoint.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UniformClassifier {
    pub altitude_m: f64,
    pub terrain: TerrainClass,
    pub weather: WeatherClass,
    pub threat: ThreatLevel,
}

impl Default for UniformClassifier {
    fn default() -> Self {
        Self {
            altitude_m: 0.0,
            terrain: TerrainClass::Plains,
            weather: WeatherClass::Clear,
            threat: ThreatLevel::Green,
        }
    }
}

impl WaypointClassifier for UniformClassifier {
    fn altitude_m(&self, _lat: f64, _lon: f64) -> f64 {
        self.altitude_m
    }

    fn terrain(&self, _lat: f64, _lon: f64, _altitude_m: f64) -> TerrainClass {
        self.terrain
    }

    fn weather(&self, _lat: f64, _lon: f64, _altitude_m: f64) -> WeatherClass {
        self.weather
    }

    fn threat(&self, _lat: f64, _lon: f64) -> ThreatLevel {
        self.threat
    }
}

/// Synthetic classifier: pseudo-random but a pure function of
/// `(seed, lat, lon)`, so rebuilding a graph yields identical nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeededClassifier {
    pub seed: u64,
}

impl Default for SeededClassifier {
    fn default() -> Self {
        Self { seed: 0x5eed_c0ffee }
    }
}

const MAX_SYNTHETIC_ALTITUDE_M: f64 = 3_500.0;
const HIGHLAND_ALTITUDE_M: f64 = 2_000.0;
const SNOWLINE_ALTITUDE_M: f64 = 2_800.0;

impl SeededClassifier {
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }

    fn rng_for(&self, lat: f64, lon: f64, salt: u64) -> StdRng {
        let mut key = splitmix64(self.seed ^ salt);
        key = splitmix64(key ^ lat.to_bits());
        key = splitmix64(key ^ lon.to_bits());
        StdRng::seed_from_u64(key)
    }
}

impl WaypointClassifier for SeededClassifier {
    fn altitude_m(&self, lat: f64, lon: f64) -> f64 {
        let mut rng = self.rng_for(lat, lon, 1);
        // Squared draw skews toward lowland.
        let draw: f64 = rng.random();
        draw * draw * MAX_SYNTHETIC_ALTITUDE_M
    }

    fn terrain(&self, lat: f64, lon: f64, altitude_m: f64) -> TerrainClass {
        let mut rng = self.rng_for(lat, lon, 2);
        if altitude_m >= SNOWLINE_ALTITUDE_M {
            return TerrainClass::SnowCovered;
        }
        if altitude_m >= HIGHLAND_ALTITUDE_M {
            return if rng.random_bool(0.8) {
                TerrainClass::Mountainous
            } else {
                TerrainClass::Forest
            };
        }
        weighted_pick(
            &mut rng,
            &[
                (TerrainClass::Plains, 35),
                (TerrainClass::Desert, 20),
                (TerrainClass::Forest, 15),
                (TerrainClass::Urban, 15),
                (TerrainClass::Riverine, 10),
                (TerrainClass::Mountainous, 5),
            ],
        )
    }

    fn weather(&self, lat: f64, lon: f64, altitude_m: f64) -> WeatherClass {
        let mut rng = self.rng_for(lat, lon, 3);
        let terrain = self.terrain(lat, lon, altitude_m);
        match terrain {
            TerrainClass::SnowCovered | TerrainClass::Mountainous => weighted_pick(
                &mut rng,
                &[
                    (WeatherClass::Clear, 40),
                    (WeatherClass::Snow, 25),
                    (WeatherClass::Fog, 20),
                    (WeatherClass::Blizzard, 15),
                ],
            ),
            TerrainClass::Desert => weighted_pick(
                &mut rng,
                &[
                    (WeatherClass::Clear, 50),
                    (WeatherClass::ExtremeHeat, 30),
                    (WeatherClass::DustStorm, 20),
                ],
            ),
            _ => weighted_pick(
                &mut rng,
                &[
                    (WeatherClass::Clear, 55),
                    (WeatherClass::Rain, 20),
                    (WeatherClass::Fog, 15),
                    (WeatherClass::HeavyRain, 10),
                ],
            ),
        }
    }

    fn threat(&self, lat: f64, lon: f64) -> ThreatLevel {
        let mut rng = self.rng_for(lat, lon, 4);
        weighted_pick(
            &mut rng,
            &[
                (ThreatLevel::Green, 50),
                (ThreatLevel::Yellow, 25),
                (ThreatLevel::Orange, 15),
                (ThreatLevel::Red, 8),
                (ThreatLevel::Black, 2),
            ],
        )
    }
}

fn weighted_pick<T: Copy>(rng: &mut StdRng, table: &[(T, u32)]) -> T {
    let total: u32 = table.iter().map(|(_, weight)| weight).sum();
    let mut roll = rng.random_range(0..total.max(1));
    for (value, weight) in table {
        if roll < *weight {
            return *value;
        }
        roll -= weight;
    }
    table[table.len() - 1].0
}

fn splitmix64(mut x: u64) -> u64 {
    x = x.wrapping_add(0x9e37_79b9_7f4a_7c15);
    x = (x ^ (x >> 30)).wrapping_mul(0xbf58_476d_1ce4_e5b9);
    x = (x ^ (x >> 27)).wrapping_mul(0x94d0_49bb_1331_11eb);
    x ^ (x >> 31)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seeded_classifier_is_stable_per_coordinate() {
        let classifier = SeededClassifier::new(42);
        let a = (
            classifier.altitude_m(34.51, 69.18),
            classifier.threat(34.51, 69.18),
        );
        let b = (
            classifier.altitude_m(34.51, 69.18),
            classifier.threat(34.51, 69.18),
        );
        assert_eq!(a, b);
    }

    #[test]
    fn synthetic_altitude_stays_in_range() {
        let classifier = SeededClassifier::default();
        for i in 0..200 {
            let alt = classifier.altitude_m(30.0 + i as f64 * 0.01, 65.0);
            assert!((0.0..=MAX_SYNTHETIC_ALTITUDE_M).contains(&alt));
        }
    }

    #[test]
    fn high_ground_is_snow_or_mountain() {
        let classifier = SeededClassifier::default();
        assert_eq!(
            classifier.terrain(35.0, 70.0, 3_000.0),
            TerrainClass::SnowCovered
        );
        let highland = classifier.terrain(35.0, 70.0, 2_200.0);
        assert!(matches!(
            highland,
            TerrainClass::Mountainous | TerrainClass::Forest
        ));
    }

    #[test]
    fn uniform_classifier_returns_fixed_values() {
        let classifier = UniformClassifier {
            threat: ThreatLevel::Red,
            ..UniformClassifier::default()
        };
        assert_eq!(classifier.threat(1.0, 2.0), ThreatLevel::Red);
        assert_eq!(classifier.terrain(1.0, 2.0, 0.0), TerrainClass::Plains);
        assert_eq!(classifier.weather(1.0, 2.0, 0.0), WeatherClass::Clear);
    }
}
