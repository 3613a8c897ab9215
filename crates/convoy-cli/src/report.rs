//! JSON report printed by `convoy-plan`.

use chrono::{DateTime, Utc};
use convoy_core::{RouteCandidate, ScoreWeights};
use serde::Serialize;

/// A candidate with its overall score under the run's weights.
#[derive(Debug, Clone, Serialize)]
pub struct ScoredCandidate {
    #[serde(flatten)]
    pub candidate: RouteCandidate,
    pub overall_score: f64,
}

impl ScoredCandidate {
    pub fn new(candidate: RouteCandidate, weights: &ScoreWeights) -> Self {
        let overall_score = candidate.overall_score_with(weights);
        Self {
            candidate,
            overall_score,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct PlanReport {
    pub generated_at: DateTime<Utc>,
    pub command: String,
    pub graph: String,
    pub start: String,
    pub goal: String,
    pub candidates: Vec<ScoredCandidate>,
}

impl PlanReport {
    pub fn new(
        command: &str,
        graph: &str,
        start: &str,
        goal: &str,
        candidates: Vec<RouteCandidate>,
        weights: &ScoreWeights,
    ) -> Self {
        Self {
            generated_at: Utc::now(),
            command: command.to_string(),
            graph: graph.to_string(),
            start: start.to_string(),
            goal: goal.to_string(),
            candidates: candidates
                .into_iter()
                .map(|candidate| ScoredCandidate::new(candidate, weights))
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use convoy_core::{search, Algorithm, CostMode, GraphConfig, UniformClassifier};

    #[test]
    fn test_report_flattens_candidates() {
        let graph = convoy_core::build_route_graph_with(
            &[(0.0, 0.0), (0.05, 0.0), (0.1, 0.0)],
            "wp",
            &UniformClassifier::default(),
            &GraphConfig::default(),
        )
        .unwrap();
        let route = search(&graph, "wp_0", "wp_2", Algorithm::Dijkstra, CostMode::Balanced)
            .unwrap()
            .unwrap();
        let expected_score = route.overall_score();
        let report = PlanReport::new(
            "search",
            graph.label(),
            "wp_0",
            "wp_2",
            vec![route],
            &ScoreWeights::default(),
        );

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["command"], "search");
        assert!(json["generated_at"].is_string());
        let first = &json["candidates"][0];
        assert_eq!(first["algorithm"], "dijkstra");
        assert_eq!(first["path"][2], "wp_2");
        assert_eq!(first["overall_score"].as_f64().unwrap(), expected_score);
    }
}
