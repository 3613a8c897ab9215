//! Obstacle re-planning.
//!
//! Nodes near a point hazard are raised to critical threat for the duration
//! of one safety-priority search. The raise is held by [`ThreatOverride`],
//! which restores the original levels when dropped, including during a panic
//! unwind.

use crate::config::PlannerConfig;
use crate::cost::CostMode;
use crate::error::{PlanningError, Result};
use crate::evaluator::RouteCandidate;
use crate::graph::Graph;
use crate::models::ThreatLevel;
use crate::search::{search_with_config, Algorithm};
use std::ops::Deref;

/// Scoped threat escalation over a graph.
///
/// Dereferences to the graph so searches can run while the override is
/// held; every touched node gets its previous level back on drop.
#[derive(Debug)]
pub struct ThreatOverride<'g> {
    graph: &'g mut Graph,
    saved: Vec<(usize, ThreatLevel)>,
}

impl<'g> ThreatOverride<'g> {
    /// Raise every node within `radius_km` of `center` to `level`.
    pub fn around(
        graph: &'g mut Graph,
        center: (f64, f64),
        radius_km: f64,
        level: ThreatLevel,
    ) -> Self {
        let affected = graph.nodes_within(center.0, center.1, radius_km);
        let saved = affected
            .into_iter()
            .map(|idx| (idx, graph.set_threat_at(idx, level)))
            .collect();
        Self { graph, saved }
    }

    /// Number of nodes currently overridden.
    pub fn affected(&self) -> usize {
        self.saved.len()
    }
}

impl Deref for ThreatOverride<'_> {
    type Target = Graph;

    fn deref(&self) -> &Graph {
        self.graph
    }
}

impl Drop for ThreatOverride<'_> {
    fn drop(&mut self) {
        for &(idx, level) in self.saved.iter().rev() {
            self.graph.set_threat_at(idx, level);
        }
    }
}

/// Detour around a circular obstacle, default configuration.
pub fn avoid_obstacle<S: AsRef<str>>(
    graph: &mut Graph,
    path: &[S],
    center: (f64, f64),
    radius_km: f64,
) -> Result<Option<RouteCandidate>> {
    avoid_obstacle_with_config(graph, path, center, radius_km, &PlannerConfig::default())
}

/// Re-plan between the first and last node of `path` with every node inside
/// the obstacle treated as critical. `Ok(None)` when no detour exists.
///
/// The graph is left exactly as it was on every exit.
pub fn avoid_obstacle_with_config<S: AsRef<str>>(
    graph: &mut Graph,
    path: &[S],
    center: (f64, f64),
    radius_km: f64,
    config: &PlannerConfig,
) -> Result<Option<RouteCandidate>> {
    let (Some(first), Some(last)) = (path.first(), path.last()) else {
        return Err(PlanningError::InvalidInput(
            "cannot re-plan an empty path".to_string(),
        ));
    };
    if !(radius_km.is_finite() && radius_km >= 0.0) {
        return Err(PlanningError::InvalidInput(format!(
            "obstacle radius must be a non-negative number, got {radius_km}"
        )));
    }
    let (start, goal) = (first.as_ref(), last.as_ref());
    graph.resolve(start)?;
    graph.resolve(goal)?;

    let blocked = ThreatOverride::around(graph, center, radius_km, ThreatLevel::CRITICAL);
    tracing::info!(
        graph = blocked.label(),
        affected = blocked.affected(),
        radius_km,
        "re-planning around obstacle"
    );
    let detour = search_with_config(
        &blocked,
        start,
        goal,
        Algorithm::AStar,
        CostMode::SafetyPriority,
        config,
    );
    drop(blocked);

    let detour = detour?;
    if detour.is_none() {
        tracing::info!(start, goal, "no detour around obstacle");
    }
    Ok(detour.map(|candidate| {
        let name = format!("{}:obstacle_detour", candidate.algorithm);
        let confidence = candidate.confidence;
        candidate.tagged(name, confidence)
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::test_support::{corridor, ladder};

    fn threats(graph: &Graph) -> Vec<ThreatLevel> {
        graph.nodes().map(|node| node.threat).collect()
    }

    #[test]
    fn override_restores_on_drop() {
        let mut graph = corridor(5, 10.0);
        graph.set_threat("wp_3", ThreatLevel::Yellow).unwrap();
        let before = threats(&graph);
        let center = graph.node("wp_2").unwrap().coordinate();
        {
            let held = ThreatOverride::around(&mut graph, center, 11.0, ThreatLevel::Black);
            assert_eq!(held.affected(), 3);
            assert_eq!(held.node("wp_3").unwrap().threat, ThreatLevel::Black);
            assert_eq!(held.node("wp_0").unwrap().threat, ThreatLevel::Green);
        }
        assert_eq!(threats(&graph), before);
    }

    #[test]
    fn override_restores_during_unwind() {
        let mut graph = corridor(4, 10.0);
        let before = threats(&graph);
        let center = graph.node("wp_1").unwrap().coordinate();
        let outcome = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            let _held = ThreatOverride::around(&mut graph, center, 1.0, ThreatLevel::Black);
            panic!("search blew up");
        }));
        assert!(outcome.is_err());
        assert_eq!(threats(&graph), before);
    }

    #[test]
    fn detours_through_parallel_lane() {
        let mut graph = ladder();
        let before = threats(&graph);
        let path = ["wp_0", "wp_1", "wp_2", "wp_3", "wp_4"];
        let center = graph.node("wp_2").unwrap().coordinate();
        let detour = avoid_obstacle_with_config(
            &mut graph,
            &path,
            center,
            2.0,
            &PlannerConfig::default(),
        )
        .unwrap()
        .unwrap();
        assert!(!detour.path.contains(&"wp_2".to_string()));
        assert_eq!(detour.start(), Some("wp_0"));
        assert_eq!(detour.goal(), Some("wp_4"));
        assert!(detour.algorithm.ends_with("obstacle_detour"));
        assert_eq!(threats(&graph), before);
    }

    #[test]
    fn no_detour_leaves_graph_untouched() {
        let mut graph = corridor(3, 10.0);
        let before = threats(&graph);
        let path = vec!["wp_0".to_string(), "wp_2".to_string()];
        let center = graph.node("wp_1").unwrap().coordinate();
        // single lane: the only route crosses the obstacle, priced high but still found
        let detour = avoid_obstacle(&mut graph, &path, center, 1.0).unwrap().unwrap();
        assert_eq!(detour.path, vec!["wp_0", "wp_1", "wp_2"]);
        assert_eq!(detour.risk_score, (1.0 + 10.0 + 1.0) / 3.0 * 20.0);
        assert_eq!(threats(&graph), before);

        graph
            .add_node(crate::models::Node::new("island", 5.0, 5.0))
            .unwrap();
        let stranded = vec!["wp_0".to_string(), "island".to_string()];
        assert!(avoid_obstacle(&mut graph, &stranded, center, 1.0)
            .unwrap()
            .is_none());
        assert_eq!(threats(&graph)[..3], before[..]);
    }

    #[test]
    fn rejects_empty_path_and_unknown_nodes() {
        let mut graph = corridor(3, 10.0);
        let empty: Vec<String> = Vec::new();
        assert!(matches!(
            avoid_obstacle(&mut graph, &empty, (0.0, 0.0), 1.0),
            Err(PlanningError::InvalidInput(_))
        ));
        let unknown = vec!["wp_0".to_string(), "ghost".to_string()];
        assert!(matches!(
            avoid_obstacle(&mut graph, &unknown, (0.0, 0.0), 1.0),
            Err(PlanningError::UnknownNode(_))
        ));
    }
}
