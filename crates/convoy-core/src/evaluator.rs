//! Route candidate scoring.

use crate::config::ScoreWeights;
use crate::cost::{terrain_factor, threat_factor, weather_factor};
use crate::error::{PlanningError, Result};
use crate::graph::Graph;
use crate::models::NodeId;
use serde::{Deserialize, Serialize};

/// Reference convoy fuel efficiency on plains, km per liter.
pub const BASELINE_KM_PER_LITER: f64 = 3.0;

/// Number of leading and trailing nodes that identify a path for dedup.
pub const SIGNATURE_SPAN: usize = 5;

/// A scored route produced by one of the search strategies.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteCandidate {
    pub path: Vec<NodeId>,
    pub total_distance_km: f64,
    pub estimated_time_h: f64,
    pub fuel_consumption_l: f64,
    /// 0-100, lower is safer.
    pub risk_score: f64,
    /// Mean terrain factor over the path's nodes.
    pub terrain_difficulty: f64,
    /// Worst weather factor on the path, >= 1.0.
    pub weather_impact: f64,
    pub checkpoints: Vec<NodeId>,
    pub fuel_stops: Vec<NodeId>,
    pub algorithm: String,
    /// 0-1, how much the producing strategy's result can be trusted.
    pub confidence: f64,
    pub coordinates: Vec<(f64, f64)>,
}

impl RouteCandidate {
    /// Weighted score with the default weights. Lower is better.
    pub fn overall_score(&self) -> f64 {
        self.overall_score_with(&ScoreWeights::default())
    }

    /// Weighted score, lower is better.
    ///
    /// `weights.terrain` multiplies `terrain_difficulty * 100`, not the raw
    /// mean factor, so terrain sits on the same 0-100 order of magnitude as
    /// `risk_score`. With default weights a path across mountainous terrain
    /// (difficulty 2.5) adds 25 points where plains add 10.
    pub fn overall_score_with(&self, weights: &ScoreWeights) -> f64 {
        weights.distance * self.total_distance_km
            + weights.time * self.estimated_time_h
            + weights.fuel * self.fuel_consumption_l
            + weights.risk * self.risk_score
            + weights.terrain * self.terrain_difficulty * 100.0
    }

    /// Dedup key: the first and last few node ids.
    pub fn signature(&self) -> (Vec<NodeId>, Vec<NodeId>) {
        let head = self.path.iter().take(SIGNATURE_SPAN).cloned().collect();
        let tail_start = self.path.len().saturating_sub(SIGNATURE_SPAN);
        let tail = self.path[tail_start..].to_vec();
        (head, tail)
    }

    pub fn start(&self) -> Option<&str> {
        self.path.first().map(String::as_str)
    }

    pub fn goal(&self) -> Option<&str> {
        self.path.last().map(String::as_str)
    }

    pub(crate) fn tagged(mut self, algorithm: impl Into<String>, confidence: f64) -> Self {
        self.algorithm = algorithm.into();
        self.confidence = confidence.clamp(0.0, 1.0);
        self
    }
}

/// Scores node paths over one graph.
#[derive(Debug, Clone, Copy)]
pub struct Evaluator<'g> {
    graph: &'g Graph,
    weights: ScoreWeights,
}

impl<'g> Evaluator<'g> {
    pub fn new(graph: &'g Graph) -> Self {
        Self::with_weights(graph, ScoreWeights::default())
    }

    pub fn with_weights(graph: &'g Graph, weights: ScoreWeights) -> Self {
        Self { graph, weights }
    }

    /// Score a path given as node ids. The candidate is untagged: empty
    /// algorithm name and zero confidence.
    pub fn evaluate<S: AsRef<str>>(&self, path: &[S]) -> Result<RouteCandidate> {
        let indices = path
            .iter()
            .map(|id| self.graph.resolve(id.as_ref()))
            .collect::<Result<Vec<_>>>()?;
        self.evaluate_indices(&indices)
    }

    /// Overall score of a path under this evaluator's weights.
    pub fn score(&self, candidate: &RouteCandidate) -> f64 {
        candidate.overall_score_with(&self.weights)
    }

    pub(crate) fn evaluate_indices(&self, path: &[usize]) -> Result<RouteCandidate> {
        if path.is_empty() {
            return Err(PlanningError::EmptyPath);
        }
        let graph = self.graph;

        let mut total_distance_km = 0.0;
        let mut base_time_h = 0.0;
        for pair in path.windows(2) {
            let edge = graph.edge_at(pair[0], pair[1]).ok_or_else(|| {
                PlanningError::MissingEdge {
                    from: graph.node_at(pair[0]).id.clone(),
                    to: graph.node_at(pair[1]).id.clone(),
                }
            })?;
            total_distance_km += edge.distance_km;
            base_time_h += edge.base_time_h * terrain_factor(edge.terrain);
        }

        let mut terrain_sum = 0.0;
        let mut threat_sum = 0.0;
        let mut weather_impact: f64 = 1.0;
        let mut checkpoints = Vec::new();
        let mut fuel_stops = Vec::new();
        let mut coordinates = Vec::with_capacity(path.len());
        for &idx in path {
            let node = graph.node_at(idx);
            terrain_sum += terrain_factor(node.terrain);
            threat_sum += threat_factor(node.threat);
            weather_impact = weather_impact.max(weather_factor(node.weather));
            if node.is_checkpoint {
                checkpoints.push(node.id.clone());
            }
            if node.is_fuel_point {
                fuel_stops.push(node.id.clone());
            }
            coordinates.push(node.coordinate());
        }

        let count = path.len() as f64;
        let terrain_difficulty = terrain_sum / count;
        let risk_score = (threat_sum / count * 20.0).clamp(0.0, 100.0);

        Ok(RouteCandidate {
            path: graph.ids_of(path),
            total_distance_km,
            estimated_time_h: base_time_h * weather_impact,
            fuel_consumption_l: total_distance_km / BASELINE_KM_PER_LITER * terrain_difficulty,
            risk_score,
            terrain_difficulty,
            weather_impact,
            checkpoints,
            fuel_stops,
            algorithm: String::new(),
            confidence: 0.0,
            coordinates,
        })
    }

    /// Overall score of an index path, `f64::INFINITY` when it is not a walk
    /// in the graph.
    pub(crate) fn score_indices(&self, path: &[usize]) -> f64 {
        self.evaluate_indices(path)
            .map(|candidate| self.score(&candidate))
            .unwrap_or(f64::INFINITY)
    }
}
