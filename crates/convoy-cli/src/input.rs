//! Reading planner inputs from disk and the command line.

use anyhow::{bail, Context, Result};
use convoy_core::{build_route_graph_with, Graph, NodeId, PlannerConfig, SeededClassifier};
use serde::Deserialize;
use std::path::Path;

/// A waypoint as written in a waypoint file: either `[lat, lon]` or
/// `{"lat": .., "lon": ..}`.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(untagged)]
enum WaypointEntry {
    Pair(f64, f64),
    Named { lat: f64, lon: f64 },
}

impl WaypointEntry {
    fn coordinate(self) -> (f64, f64) {
        match self {
            WaypointEntry::Pair(lat, lon) | WaypointEntry::Named { lat, lon } => (lat, lon),
        }
    }
}

/// Parse a JSON array of waypoints.
pub fn parse_waypoints(json: &str) -> Result<Vec<(f64, f64)>> {
    let entries: Vec<WaypointEntry> =
        serde_json::from_str(json).context("waypoints must be a JSON array of [lat, lon] pairs")?;
    Ok(entries.into_iter().map(WaypointEntry::coordinate).collect())
}

pub fn load_waypoints(path: &Path) -> Result<Vec<(f64, f64)>> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read waypoint file {}", path.display()))?;
    parse_waypoints(&raw).with_context(|| format!("invalid waypoint file {}", path.display()))
}

/// Load a planner config file (or the defaults) and apply a seed override.
pub fn load_config(path: Option<&Path>, seed: Option<u64>) -> Result<PlannerConfig> {
    let mut config = match path {
        Some(path) => {
            let raw = std::fs::read_to_string(path)
                .with_context(|| format!("failed to read config file {}", path.display()))?;
            serde_json::from_str::<PlannerConfig>(&raw)
                .with_context(|| format!("invalid config file {}", path.display()))?
        }
        None => PlannerConfig::default(),
    };
    if seed.is_some() {
        config.seed = seed;
    }
    config.validate()?;
    Ok(config)
}

/// Parse a `a:b` bypass link between 0-based waypoint indices.
pub fn parse_link(value: &str) -> std::result::Result<(usize, usize), String> {
    let (a, b) = value
        .split_once(':')
        .ok_or_else(|| format!("expected <from>:<to>, got '{value}'"))?;
    let parse = |part: &str| {
        part.trim()
            .parse::<usize>()
            .map_err(|_| format!("'{part}' is not a waypoint index"))
    };
    Ok((parse(a)?, parse(b)?))
}

/// Ids the graph builder assigns to `count` waypoints.
pub fn waypoint_ids(label: &str, count: usize) -> Vec<NodeId> {
    (0..count).map(|i| format!("{label}_{i}")).collect()
}

/// Build the route graph and add the requested bypass links.
pub fn build_graph(
    waypoints: &[(f64, f64)],
    links: &[(usize, usize)],
    label: &str,
    config: &PlannerConfig,
) -> Result<Graph> {
    let mut graph =
        build_route_graph_with(waypoints, label, &SeededClassifier::default(), &config.graph)?;
    let ids = waypoint_ids(label, waypoints.len());
    for &(a, b) in links {
        let (Some(from), Some(to)) = (ids.get(a), ids.get(b)) else {
            bail!(
                "link {a}:{b} is out of range for {} waypoints",
                waypoints.len()
            );
        };
        graph
            .connect(from, to, config.graph.default_road_quality)
            .with_context(|| format!("failed to add link {a}:{b}"))?;
        tracing::debug!(from = %from, to = %to, "bypass link added");
    }
    Ok(graph)
}
