//! Informed best-first search with a threat- and terrain-aware heuristic.
//!
//! The heuristic scales straight-line distance by the node's threat and
//! terrain factors, so it can overestimate: this is a weighted best-first
//! search that prefers tactically sensible routes, not a shortest-path
//! guarantee. Use [`super::dijkstra`] for the distance-optimal baseline.

use super::best_first;
use crate::cost::{edge_cost_with_threat, terrain_factor, threat_factor, CostMode};
use crate::graph::Graph;
use crate::spatial::haversine_km;

/// Estimated remaining cost from `node` to `goal`.
pub(crate) fn heuristic(graph: &Graph, node: usize, goal: usize) -> f64 {
    let here = graph.node_at(node);
    let target = graph.node_at(goal);
    let distance = haversine_km(here.lat, here.lon, target.lat, target.lon);
    distance * (threat_factor(here.threat) + terrain_factor(here.terrain)) / 2.0
}

/// Path from `start` to `goal` under `mode`, or `None` when disconnected.
pub(crate) fn find_path(
    graph: &Graph,
    start: usize,
    goal: usize,
    mode: CostMode,
) -> Option<Vec<usize>> {
    best_first(
        graph,
        start,
        goal,
        |from, to| {
            let edge = graph.edge_at(from, to)?;
            let threat = graph.live_threat(from, to, edge);
            Some(edge_cost_with_threat(edge, threat, mode))
        },
        |node| heuristic(graph, node, goal),
    )
}
