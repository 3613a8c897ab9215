//! Convoy route planning.
//!
//! Builds a weighted graph from ordered waypoints, searches it with several
//! strategies (A*, Dijkstra, genetic, ant colony), scores the resulting
//! routes on a common scale and re-plans around point obstacles.

pub mod classifier;
pub mod config;
pub mod cost;
pub mod error;
pub mod evaluator;
pub mod graph;
pub mod models;
pub mod portfolio;
pub mod replan;
pub mod search;
pub mod spatial;

pub use classifier::{SeededClassifier, UniformClassifier, WaypointClassifier};
pub use config::{AntColonyConfig, GeneticConfig, GraphConfig, PlannerConfig, ScoreWeights};
pub use cost::{edge_cost, edge_cost_with_threat, CostMode};
pub use error::{PlanningError, Result};
pub use evaluator::{Evaluator, RouteCandidate};
pub use graph::{build_route_graph, build_route_graph_with, Graph};
pub use models::{Edge, Node, NodeId, TerrainClass, ThreatLevel, WeatherClass};
pub use portfolio::{find_alternatives, find_alternatives_with_config};
pub use replan::{avoid_obstacle, avoid_obstacle_with_config, ThreatOverride};
pub use search::{search, search_with_config, Algorithm};
pub use spatial::haversine_distance;
