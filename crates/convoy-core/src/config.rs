//! Planner configuration.
//!
//! Every struct deserializes with `#[serde(default)]`, so a config file only
//! needs the values it overrides.

use crate::cost::CostMode;
use crate::error::{PlanningError, Result};
use serde::{Deserialize, Serialize};

/// Graph construction parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GraphConfig {
    /// Speed used to derive edge base travel time.
    pub reference_speed_kmh: f64,
    /// Every n-th node (0-based index divisible by n) is a checkpoint.
    pub checkpoint_stride: usize,
    /// Every n-th node is a fuel point.
    pub fuel_point_stride: usize,
    /// Road quality assigned to synthesized edges.
    pub default_road_quality: f64,
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self {
            reference_speed_kmh: 40.0,
            checkpoint_stride: 20,
            fuel_point_stride: 50,
            default_road_quality: 0.8,
        }
    }
}

/// Weights of the overall candidate score. Lower scores rank first.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoreWeights {
    pub distance: f64,
    pub time: f64,
    pub fuel: f64,
    pub risk: f64,
    pub terrain: f64,
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self {
            distance: 0.20,
            time: 0.25,
            fuel: 0.15,
            risk: 0.30,
            terrain: 0.10,
        }
    }
}

impl ScoreWeights {
    fn validate(&self) -> Result<()> {
        let all = [
            ("distance", self.distance),
            ("time", self.time),
            ("fuel", self.fuel),
            ("risk", self.risk),
            ("terrain", self.terrain),
        ];
        for (name, value) in all {
            if !value.is_finite() || value < 0.0 {
                return Err(PlanningError::InvalidConfig(format!(
                    "score weight '{name}' must be a non-negative number, got {value}"
                )));
            }
        }
        Ok(())
    }
}

/// Genetic algorithm parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneticConfig {
    /// Number of random walks attempted for the initial population.
    pub population_size: usize,
    pub generations: usize,
    /// Probability that a seeding walk picks a random neighbor instead of
    /// the one nearest the goal.
    pub exploration_rate: f64,
    pub mutation_rate: f64,
    pub max_walk_steps: usize,
}

impl Default for GeneticConfig {
    fn default() -> Self {
        Self {
            population_size: 50,
            generations: 100,
            exploration_rate: 0.3,
            mutation_rate: 0.1,
            max_walk_steps: 500,
        }
    }
}

/// Ant colony parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AntColonyConfig {
    pub ants: usize,
    pub iterations: usize,
    /// Pheromone exponent.
    pub alpha: f64,
    /// Goal-distance heuristic exponent.
    pub beta: f64,
    pub evaporation_rate: f64,
    pub initial_pheromone: f64,
    pub max_walk_steps: usize,
}

impl Default for AntColonyConfig {
    fn default() -> Self {
        Self {
            ants: 30,
            iterations: 50,
            alpha: 1.0,
            beta: 2.0,
            evaporation_rate: 0.5,
            initial_pheromone: 1.0,
            max_walk_steps: 500,
        }
    }
}

/// Top-level configuration shared by every planning entry point.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PlannerConfig {
    pub graph: GraphConfig,
    pub weights: ScoreWeights,
    pub genetic: GeneticConfig,
    pub ant_colony: AntColonyConfig,
    /// Informed-search modes the portfolio runs before the baselines.
    pub portfolio_modes: Vec<CostMode>,
    /// RNG seed for the metaheuristics. `None` draws a fresh seed per call.
    pub seed: Option<u64>,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            graph: GraphConfig::default(),
            weights: ScoreWeights::default(),
            genetic: GeneticConfig::default(),
            ant_colony: AntColonyConfig::default(),
            portfolio_modes: vec![CostMode::Balanced, CostMode::SafetyPriority],
            seed: None,
        }
    }
}

impl PlannerConfig {
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_weights(mut self, weights: ScoreWeights) -> Self {
        self.weights = weights;
        self
    }

    /// Check every parameter range.
    pub fn validate(&self) -> Result<()> {
        let graph = &self.graph;
        if !(graph.reference_speed_kmh.is_finite() && graph.reference_speed_kmh > 0.0) {
            return Err(invalid("graph.reference_speed_kmh must be positive"));
        }
        if graph.checkpoint_stride == 0 || graph.fuel_point_stride == 0 {
            return Err(invalid("graph strides must be at least 1"));
        }
        check_unit("graph.default_road_quality", graph.default_road_quality)?;

        self.weights.validate()?;

        let genetic = &self.genetic;
        if genetic.population_size == 0 {
            return Err(invalid("genetic.population_size must be at least 1"));
        }
        if genetic.max_walk_steps == 0 {
            return Err(invalid("genetic.max_walk_steps must be at least 1"));
        }
        check_unit("genetic.exploration_rate", genetic.exploration_rate)?;
        check_unit("genetic.mutation_rate", genetic.mutation_rate)?;

        let colony = &self.ant_colony;
        if colony.ants == 0 {
            return Err(invalid("ant_colony.ants must be at least 1"));
        }
        if colony.max_walk_steps == 0 {
            return Err(invalid("ant_colony.max_walk_steps must be at least 1"));
        }
        if !(colony.evaporation_rate > 0.0 && colony.evaporation_rate <= 1.0) {
            return Err(invalid("ant_colony.evaporation_rate must be in (0, 1]"));
        }
        if !(colony.initial_pheromone.is_finite() && colony.initial_pheromone > 0.0) {
            return Err(invalid("ant_colony.initial_pheromone must be positive"));
        }
        if !(colony.alpha.is_finite() && colony.beta.is_finite()) {
            return Err(invalid("ant_colony exponents must be finite"));
        }
        Ok(())
    }
}

fn invalid(message: &str) -> PlanningError {
    PlanningError::InvalidConfig(message.to_string())
}

fn check_unit(name: &str, value: f64) -> Result<()> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(PlanningError::InvalidConfig(format!(
            "{name} must be within [0, 1], got {value}"
        )))
    }
}
