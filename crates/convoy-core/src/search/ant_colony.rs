//! Ant colony search.
//!
//! Ants walk from start toward goal choosing unvisited neighbors with
//! probability proportional to `pheromone^alpha * (1 / (d_goal + 1))^beta`.
//! After every iteration trails evaporate and each successful ant deposits
//! `1 / (score + 0.1)` on the directed edges it used.

use crate::config::AntColonyConfig;
use crate::evaluator::Evaluator;
use crate::graph::Graph;
use crate::spatial::haversine_km;
use rand::rngs::StdRng;
use rand::Rng;
use std::collections::HashMap;

type Trails = HashMap<(usize, usize), f64>;

/// Best route found by the colony, or `None` if no ant ever reached the goal.
pub(crate) fn forage(
    graph: &Graph,
    start: usize,
    goal: usize,
    evaluator: &Evaluator<'_>,
    config: &AntColonyConfig,
    rng: &mut StdRng,
) -> Option<Vec<usize>> {
    let mut trails = initial_trails(graph, config.initial_pheromone);
    let goal_distance: Vec<f64> = (0..graph.node_count())
        .map(|idx| {
            let node = graph.node_at(idx);
            let target = graph.node_at(goal);
            haversine_km(node.lat, node.lon, target.lat, target.lon)
        })
        .collect();

    let mut best: Option<(Vec<usize>, f64)> = None;
    let mut successful_walks = 0usize;

    for _ in 0..config.iterations {
        let mut arrivals: Vec<(Vec<usize>, f64)> = Vec::new();
        for _ in 0..config.ants {
            let Some(path) = walk(graph, start, goal, &trails, &goal_distance, config, rng) else {
                continue;
            };
            let score = evaluator.score_indices(&path);
            if !score.is_finite() {
                continue;
            }
            let improved = match &best {
                Some((_, best_score)) => score < *best_score,
                None => true,
            };
            if improved {
                best = Some((path.clone(), score));
            }
            arrivals.push((path, score));
        }
        successful_walks += arrivals.len();

        let retain = 1.0 - config.evaporation_rate;
        for level in trails.values_mut() {
            *level *= retain;
        }
        for (path, score) in &arrivals {
            let deposit = 1.0 / (score + 0.1);
            for pair in path.windows(2) {
                *trails.entry((pair[0], pair[1])).or_insert(0.0) += deposit;
            }
        }
    }

    match &best {
        Some((path, score)) => tracing::debug!(
            iterations = config.iterations,
            successful_walks,
            best_score = *score,
            hops = path.len().saturating_sub(1),
            "ant colony finished"
        ),
        None => tracing::warn!(
            iterations = config.iterations,
            ants = config.ants,
            "no ant reached the goal"
        ),
    }
    best.map(|(path, _)| path)
}

fn initial_trails(graph: &Graph, level: f64) -> Trails {
    let mut trails = HashMap::new();
    for from in 0..graph.node_count() {
        for &to in graph.neighbors_of(from) {
            trails.insert((from, to), level);
        }
    }
    trails
}

fn walk(
    graph: &Graph,
    start: usize,
    goal: usize,
    trails: &Trails,
    goal_distance: &[f64],
    config: &AntColonyConfig,
    rng: &mut StdRng,
) -> Option<Vec<usize>> {
    let mut visited = vec![false; graph.node_count()];
    let mut path = vec![start];
    visited[start] = true;
    let mut current = start;

    for _ in 0..config.max_walk_steps {
        if current == goal {
            return Some(path);
        }
        let options: Vec<(usize, f64)> = graph
            .neighbors_of(current)
            .iter()
            .copied()
            .filter(|&next| !visited[next])
            .map(|next| {
                let pheromone = trails.get(&(current, next)).copied().unwrap_or(0.0);
                let closeness = 1.0 / (goal_distance[next] + 1.0);
                let weight = pheromone.powf(config.alpha) * closeness.powf(config.beta);
                (next, weight)
            })
            .collect();
        let next = choose_weighted(&options, rng)?;
        visited[next] = true;
        path.push(next);
        current = next;
    }

    (current == goal).then_some(path)
}

/// Roulette-wheel pick; uniform when every weight has decayed to zero.
fn choose_weighted(options: &[(usize, f64)], rng: &mut StdRng) -> Option<usize> {
    if options.is_empty() {
        return None;
    }
    let total: f64 = options
        .iter()
        .map(|(_, weight)| weight)
        .filter(|w| w.is_finite())
        .sum();
    if !(total > 0.0 && total.is_finite()) {
        return Some(options[rng.random_range(0..options.len())].0);
    }
    let mut threshold = rng.random_range(0.0..total);
    for &(node, weight) in options {
        if !weight.is_finite() {
            continue;
        }
        if threshold < weight {
            return Some(node);
        }
        threshold -= weight;
    }
    options.last().map(|(node, _)| *node)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PlannerConfig;
    use crate::models::ThreatLevel;
    use crate::search::test_support::ladder;
    use rand::SeedableRng;

    #[test]
    fn roulette_respects_zero_weights() {
        let mut rng = StdRng::seed_from_u64(1);
        for _ in 0..50 {
            let pick = choose_weighted(&[(3, 0.0), (4, 1.0), (5, 0.0)], &mut rng);
            assert_eq!(pick, Some(4));
        }
        assert_eq!(choose_weighted(&[], &mut rng), None);
        let uniform = choose_weighted(&[(8, 0.0), (9, 0.0)], &mut rng).unwrap();
        assert!(uniform == 8 || uniform == 9);
    }

    #[test]
    fn colony_avoids_high_risk_lane() {
        let mut graph = ladder();
        graph.set_threat("wp_2", ThreatLevel::Black).unwrap();
        let evaluator = Evaluator::new(&graph);
        let config = PlannerConfig::default();
        let mut rng = StdRng::seed_from_u64(99);
        let start = graph.resolve("wp_0").unwrap();
        let goal = graph.resolve("wp_4").unwrap();
        let path = forage(&graph, start, goal, &evaluator, &config.ant_colony, &mut rng).unwrap();
        assert!(!path.contains(&graph.resolve("wp_2").unwrap()));
    }

    #[test]
    fn seeded_colony_is_reproducible() {
        let graph = ladder();
        let evaluator = Evaluator::new(&graph);
        let config = PlannerConfig::default();
        let start = graph.resolve("wp_0").unwrap();
        let goal = graph.resolve("wp_4").unwrap();
        let run = |seed| {
            let mut rng = StdRng::seed_from_u64(seed);
            forage(&graph, start, goal, &evaluator, &config.ant_colony, &mut rng)
        };
        assert_eq!(run(5), run(5));
    }

    #[test]
    fn step_cap_discards_long_walks() {
        let graph = ladder();
        let evaluator = Evaluator::new(&graph);
        let config = AntColonyConfig {
            max_walk_steps: 2,
            iterations: 3,
            ..AntColonyConfig::default()
        };
        let mut rng = StdRng::seed_from_u64(5);
        let start = graph.resolve("wp_0").unwrap();
        let goal = graph.resolve("wp_4").unwrap();
        assert!(forage(&graph, start, goal, &evaluator, &config, &mut rng).is_none());
    }
}
