//! Uniform-cost search over raw edge distance: the physically shortest route.

use super::best_first;
use crate::graph::Graph;

pub(crate) fn find_path(graph: &Graph, start: usize, goal: usize) -> Option<Vec<usize>> {
    best_first(
        graph,
        start,
        goal,
        |from, to| graph.edge_at(from, to).map(|edge| edge.distance_km),
        |_| 0.0,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ThreatLevel;
    use crate::search::test_support::{corridor, ladder};

    #[test]
    fn corridor_distance_is_sum_of_legs() {
        let graph = corridor(5, 10.0);
        let start = graph.resolve("wp_0").unwrap();
        let goal = graph.resolve("wp_4").unwrap();
        let path = find_path(&graph, start, goal).unwrap();
        assert_eq!(path, vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn ignores_threat() {
        let mut graph = ladder();
        graph.set_threat("wp_2", ThreatLevel::Black).unwrap();
        let start = graph.resolve("wp_0").unwrap();
        let goal = graph.resolve("wp_4").unwrap();
        let path = find_path(&graph, start, goal).unwrap();
        assert!(path.contains(&graph.resolve("wp_2").unwrap()));
    }

    #[test]
    fn collinear_shortcut_keeps_endpoints() {
        let mut graph = corridor(5, 10.0);
        graph.connect("wp_1", "wp_3", 0.2).unwrap();
        let start = graph.resolve("wp_0").unwrap();
        let goal = graph.resolve("wp_4").unwrap();
        let path = find_path(&graph, start, goal).unwrap();
        // collinear shortcut ties the two-leg route; the first-found path wins
        assert_eq!(path.first(), Some(&start));
        assert_eq!(path.last(), Some(&goal));
    }
}
