//! Route graph: one node per waypoint, bidirectional edges between neighbors.
//!
//! Nodes live in a `Vec` and are addressed internally by index; adjacency
//! lists keep insertion order so every search over the same graph visits
//! neighbors in the same order.

use crate::classifier::{SeededClassifier, WaypointClassifier};
use crate::config::GraphConfig;
use crate::error::{PlanningError, Result};
use crate::models::{Edge, Node, NodeId, ThreatLevel};
use crate::spatial::{gradient_percent, haversine_km};
use std::collections::HashMap;

/// Owns every node and edge of one planning request.
#[derive(Debug, Clone)]
pub struct Graph {
    label: String,
    reference_speed_kmh: f64,
    nodes: Vec<Node>,
    index: HashMap<NodeId, usize>,
    edges: HashMap<(usize, usize), Edge>,
    adjacency: Vec<Vec<usize>>,
}

impl Graph {
    /// Empty graph. `build_route_graph` is the usual way in.
    pub fn new(label: impl Into<String>, reference_speed_kmh: f64) -> Self {
        Self {
            label: label.into(),
            reference_speed_kmh,
            nodes: Vec::new(),
            index: HashMap::new(),
            edges: HashMap::new(),
            adjacency: Vec::new(),
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn reference_speed_kmh(&self) -> f64 {
        self.reference_speed_kmh
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Number of directed edges (two per adjacency).
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.iter()
    }

    pub fn node(&self, id: &str) -> Option<&Node> {
        self.index.get(id).map(|&idx| &self.nodes[idx])
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    pub fn edge(&self, from: &str, to: &str) -> Option<&Edge> {
        let from = *self.index.get(from)?;
        let to = *self.index.get(to)?;
        self.edges.get(&(from, to))
    }

    /// Ids of the nodes reachable in one hop from `id`, in insertion order.
    pub fn neighbors(&self, id: &str) -> Result<Vec<&str>> {
        let idx = self.resolve(id)?;
        Ok(self.adjacency[idx]
            .iter()
            .map(|&next| self.nodes[next].id.as_str())
            .collect())
    }

    /// Add a node. Ids must be unique and altitude is clamped to zero.
    pub fn add_node(&mut self, mut node: Node) -> Result<()> {
        if self.index.contains_key(&node.id) {
            return Err(PlanningError::InvalidInput(format!(
                "duplicate node id '{}'",
                node.id
            )));
        }
        validate_coordinate(node.lat, node.lon)?;
        node.altitude_m = node.altitude_m.max(0.0);
        self.index.insert(node.id.clone(), self.nodes.len());
        self.nodes.push(node);
        self.adjacency.push(Vec::new());
        Ok(())
    }

    /// Join two existing nodes with a pair of directed edges.
    ///
    /// Distance is the haversine distance; gradient comes from the altitude
    /// delta and flips sign for the return direction. Re-connecting an
    /// existing pair replaces its edges.
    pub fn connect(&mut self, a: &str, b: &str, road_quality: f64) -> Result<()> {
        let from = self.resolve(a)?;
        let to = self.resolve(b)?;
        if from == to {
            return Err(PlanningError::InvalidInput(format!(
                "cannot connect node '{a}' to itself"
            )));
        }
        validate_road_quality(road_quality)?;
        self.connect_indices(from, to, road_quality);
        Ok(())
    }

    /// Overwrite a node's threat level, returning the previous value.
    pub fn set_threat(&mut self, id: &str, threat: ThreatLevel) -> Result<ThreatLevel> {
        let idx = self.resolve(id)?;
        Ok(self.set_threat_at(idx, threat))
    }

    pub(crate) fn connect_indices(&mut self, from: usize, to: usize, road_quality: f64) {
        let quality = road_quality.clamp(0.0, 1.0);
        let forward = self.synthesize_edge(from, to, quality);
        let backward = self.synthesize_edge(to, from, quality);
        if self.edges.insert((from, to), forward).is_none() {
            self.adjacency[from].push(to);
        }
        if self.edges.insert((to, from), backward).is_none() {
            self.adjacency[to].push(from);
        }
    }

    fn synthesize_edge(&self, from: usize, to: usize, road_quality: f64) -> Edge {
        let origin = &self.nodes[from];
        let target = &self.nodes[to];
        let distance_km = haversine_km(origin.lat, origin.lon, target.lat, target.lon);
        Edge {
            from: origin.id.clone(),
            to: target.id.clone(),
            distance_km,
            base_time_h: distance_km / self.reference_speed_kmh,
            terrain: origin.terrain,
            road_quality,
            threat: origin.threat.max(target.threat),
            gradient_pct: gradient_percent(target.altitude_m - origin.altitude_m, distance_km),
        }
    }

    pub(crate) fn resolve(&self, id: &str) -> Result<usize> {
        self.index
            .get(id)
            .copied()
            .ok_or_else(|| PlanningError::UnknownNode(id.to_string()))
    }

    pub(crate) fn node_at(&self, idx: usize) -> &Node {
        &self.nodes[idx]
    }

    pub(crate) fn neighbors_of(&self, idx: usize) -> &[usize] {
        &self.adjacency[idx]
    }

    pub(crate) fn edge_at(&self, from: usize, to: usize) -> Option<&Edge> {
        self.edges.get(&(from, to))
    }

    /// Worst of the edge's captured threat and the current endpoint threats.
    pub(crate) fn live_threat(&self, from: usize, to: usize, edge: &Edge) -> ThreatLevel {
        edge.threat
            .max(self.nodes[from].threat)
            .max(self.nodes[to].threat)
    }

    pub(crate) fn set_threat_at(&mut self, idx: usize, threat: ThreatLevel) -> ThreatLevel {
        std::mem::replace(&mut self.nodes[idx].threat, threat)
    }

    /// Indices of nodes within `radius_km` of `(lat, lon)`.
    pub(crate) fn nodes_within(&self, lat: f64, lon: f64, radius_km: f64) -> Vec<usize> {
        self.nodes
            .iter()
            .enumerate()
            .filter(|(_, node)| haversine_km(node.lat, node.lon, lat, lon) <= radius_km)
            .map(|(idx, _)| idx)
            .collect()
    }

    pub(crate) fn ids_of(&self, path: &[usize]) -> Vec<NodeId> {
        path.iter().map(|&idx| self.nodes[idx].id.clone()).collect()
    }
}

/// Build a graph from an ordered waypoint list with the default synthetic
/// classifier and graph settings.
pub fn build_route_graph(waypoints: &[(f64, f64)], label: &str) -> Result<Graph> {
    build_route_graph_with(
        waypoints,
        label,
        &SeededClassifier::default(),
        &GraphConfig::default(),
    )
}

/// Build a graph, classifying each waypoint with `classifier`.
///
/// Node `i` gets id `{label}_{i}`; consecutive waypoints are joined by a
/// pair of directed edges.
pub fn build_route_graph_with<C>(
    waypoints: &[(f64, f64)],
    label: &str,
    classifier: &C,
    config: &GraphConfig,
) -> Result<Graph>
where
    C: WaypointClassifier + ?Sized,
{
    if waypoints.len() < 2 {
        return Err(PlanningError::InvalidInput(format!(
            "need at least 2 waypoints, got {}",
            waypoints.len()
        )));
    }
    if !(config.reference_speed_kmh.is_finite() && config.reference_speed_kmh > 0.0) {
        return Err(PlanningError::InvalidInput(
            "reference speed must be positive".to_string(),
        ));
    }
    validate_road_quality(config.default_road_quality)?;
    let checkpoint_stride = config.checkpoint_stride.max(1);
    let fuel_point_stride = config.fuel_point_stride.max(1);

    let mut graph = Graph::new(label, config.reference_speed_kmh);
    graph.nodes.reserve(waypoints.len());

    for (i, &(lat, lon)) in waypoints.iter().enumerate() {
        validate_coordinate(lat, lon)?;
        let altitude_m = classifier.altitude_m(lat, lon).max(0.0);
        let node = Node {
            id: format!("{label}_{i}"),
            lat,
            lon,
            altitude_m,
            terrain: classifier.terrain(lat, lon, altitude_m),
            weather: classifier.weather(lat, lon, altitude_m),
            threat: classifier.threat(lat, lon),
            is_checkpoint: i % checkpoint_stride == 0,
            is_fuel_point: i % fuel_point_stride == 0,
        };
        graph.add_node(node)?;
    }

    for i in 0..waypoints.len() - 1 {
        graph.connect_indices(i, i + 1, config.default_road_quality);
    }

    tracing::debug!(
        label,
        nodes = graph.node_count(),
        edges = graph.edge_count(),
        "route graph built"
    );
    Ok(graph)
}

fn validate_road_quality(road_quality: f64) -> Result<()> {
    if !road_quality.is_finite() {
        return Err(PlanningError::InvalidInput(format!(
            "road quality must be a finite number, got {road_quality}"
        )));
    }
    Ok(())
}

fn validate_coordinate(lat: f64, lon: f64) -> Result<()> {
    if !lat.is_finite() || !lon.is_finite() || lat.abs() > 90.0 || lon.abs() > 180.0 {
        return Err(PlanningError::InvalidInput(format!(
            "invalid coordinate ({lat}, {lon})"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::UniformClassifier;
    use crate::models::TerrainClass;

    struct RampClassifier;

    impl WaypointClassifier for RampClassifier {
        fn altitude_m(&self, lat: f64, _lon: f64) -> f64 {
            lat * 10_000.0
        }
        fn terrain(&self, _lat: f64, _lon: f64, _alt: f64) -> TerrainClass {
            TerrainClass::Desert
        }
        fn weather(&self, _lat: f64, _lon: f64, _alt: f64) -> crate::models::WeatherClass {
            crate::models::WeatherClass::Clear
        }
        fn threat(&self, lat: f64, _lon: f64) -> ThreatLevel {
            if lat > 0.015 {
                ThreatLevel::Red
            } else {
                ThreatLevel::Green
            }
        }
    }

    fn line(n: usize) -> Vec<(f64, f64)> {
        (0..n).map(|i| (i as f64 * 0.01, 0.0)).collect()
    }

    #[test]
    fn rejects_fewer_than_two_waypoints() {
        assert!(matches!(
            build_route_graph(&[], "wp"),
            Err(PlanningError::InvalidInput(_))
        ));
        assert!(matches!(
            build_route_graph(&[(0.0, 0.0)], "wp"),
            Err(PlanningError::InvalidInput(_))
        ));
    }

    #[test]
    fn rejects_non_finite_coordinates() {
        let result = build_route_graph(&[(0.0, 0.0), (f64::NAN, 1.0)], "wp");
        assert!(matches!(result, Err(PlanningError::InvalidInput(_))));
    }

    #[test]
    fn builds_one_node_per_waypoint_and_paired_edges() {
        let graph = build_route_graph(&line(5), "wp").unwrap();
        assert_eq!(graph.node_count(), 5);
        assert_eq!(graph.edge_count(), 8);
        assert!(graph.contains("wp_0"));
        assert!(graph.contains("wp_4"));
        assert_eq!(graph.neighbors("wp_2").unwrap(), vec!["wp_1", "wp_3"]);
        assert!(graph.edge("wp_0", "wp_2").is_none());
    }

    #[test]
    fn reverse_edges_share_distance_and_invert_gradient() {
        let graph = build_route_graph_with(
            &line(3),
            "ramp",
            &RampClassifier,
            &GraphConfig::default(),
        )
        .unwrap();
        let up = graph.edge("ramp_0", "ramp_1").unwrap();
        let down = graph.edge("ramp_1", "ramp_0").unwrap();
        assert_eq!(up.distance_km, down.distance_km);
        assert!(up.gradient_pct > 0.0);
        assert!((up.gradient_pct + down.gradient_pct).abs() < 1e-9);
        assert!((up.base_time_h - up.distance_km / 40.0).abs() < 1e-12);
        assert_eq!(up.terrain, TerrainClass::Desert);
    }

    #[test]
    fn edge_threat_is_worst_endpoint() {
        let graph = build_route_graph_with(
            &line(3),
            "ramp",
            &RampClassifier,
            &GraphConfig::default(),
        )
        .unwrap();
        assert_eq!(graph.node("ramp_2").unwrap().threat, ThreatLevel::Red);
        assert_eq!(graph.edge("ramp_1", "ramp_2").unwrap().threat, ThreatLevel::Red);
        assert_eq!(graph.edge("ramp_2", "ramp_1").unwrap().threat, ThreatLevel::Red);
        assert_eq!(graph.edge("ramp_0", "ramp_1").unwrap().threat, ThreatLevel::Green);
    }

    #[test]
    fn marks_checkpoints_and_fuel_points_by_stride() {
        let config = GraphConfig {
            checkpoint_stride: 2,
            fuel_point_stride: 3,
            ..GraphConfig::default()
        };
        let graph =
            build_route_graph_with(&line(7), "wp", &UniformClassifier::default(), &config)
                .unwrap();
        let checkpoints: Vec<_> = graph
            .nodes()
            .filter(|n| n.is_checkpoint)
            .map(|n| n.id.as_str())
            .collect();
        let fuel: Vec<_> = graph
            .nodes()
            .filter(|n| n.is_fuel_point)
            .map(|n| n.id.as_str())
            .collect();
        assert_eq!(checkpoints, vec!["wp_0", "wp_2", "wp_4", "wp_6"]);
        assert_eq!(fuel, vec!["wp_0", "wp_3", "wp_6"]);
    }

    #[test]
    fn connect_adds_bypass_and_rejects_unknown_nodes() {
        let mut graph = build_route_graph(&line(4), "wp").unwrap();
        graph.connect("wp_0", "wp_2", 0.5).unwrap();
        assert_eq!(graph.edge_count(), 8);
        assert_eq!(graph.neighbors("wp_0").unwrap(), vec!["wp_1", "wp_2"]);
        assert!(matches!(
            graph.connect("wp_0", "nowhere", 0.5),
            Err(PlanningError::UnknownNode(_))
        ));
        assert!(graph.connect("wp_1", "wp_1", 0.5).is_err());
    }

    #[test]
    fn set_threat_returns_previous_level() {
        let mut graph = build_route_graph_with(
            &line(2),
            "wp",
            &UniformClassifier::default(),
            &GraphConfig::default(),
        )
        .unwrap();
        let previous = graph.set_threat("wp_1", ThreatLevel::Orange).unwrap();
        assert_eq!(previous, ThreatLevel::Green);
        assert_eq!(graph.node("wp_1").unwrap().threat, ThreatLevel::Orange);
    }

    #[test]
    fn duplicate_node_ids_are_rejected() {
        let mut graph = Graph::new("manual", 40.0);
        graph.add_node(Node::new("a", 0.0, 0.0)).unwrap();
        assert!(graph.add_node(Node::new("a", 1.0, 0.0)).is_err());
    }

    #[test]
    fn non_finite_road_quality_is_rejected() {
        let mut graph = build_route_graph(&line(4), "wp").unwrap();
        assert!(matches!(
            graph.connect("wp_1", "wp_3", f64::NAN),
            Err(PlanningError::InvalidInput(_))
        ));
        assert!(graph.connect("wp_1", "wp_3", f64::INFINITY).is_err());
        assert!(graph.edge("wp_1", "wp_3").is_none());
        assert_eq!(graph.edge_count(), 6);

        graph.connect("wp_1", "wp_3", 1.7).unwrap();
        assert_eq!(graph.edge("wp_1", "wp_3").unwrap().road_quality, 1.0);

        let config = GraphConfig {
            default_road_quality: f64::NAN,
            ..GraphConfig::default()
        };
        assert!(matches!(
            build_route_graph_with(&line(3), "wp", &UniformClassifier::default(), &config),
            Err(PlanningError::InvalidInput(_))
        ));
    }
}
