//! Search strategies over a [`Graph`].
//!
//! Every strategy works on node indices internally and hands its path to the
//! [`Evaluator`]; the dispatcher here tags the candidate with the strategy's
//! name and confidence.

pub mod ant_colony;
pub mod astar;
pub mod dijkstra;
pub mod genetic;

use crate::config::PlannerConfig;
use crate::cost::CostMode;
use crate::error::Result;
use crate::evaluator::{Evaluator, RouteCandidate};
use crate::graph::Graph;
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;
use std::fmt;
use std::str::FromStr;

pub const ASTAR_CONFIDENCE: f64 = 0.90;
pub const DIJKSTRA_CONFIDENCE: f64 = 0.95;
pub const GENETIC_CONFIDENCE: f64 = 0.85;
pub const ANT_COLONY_CONFIDENCE: f64 = 0.82;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Algorithm {
    AStar,
    Dijkstra,
    Genetic,
    AntColony,
}

impl Algorithm {
    pub const ALL: [Algorithm; 4] = [
        Algorithm::AStar,
        Algorithm::Dijkstra,
        Algorithm::Genetic,
        Algorithm::AntColony,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Algorithm::AStar => "astar",
            Algorithm::Dijkstra => "dijkstra",
            Algorithm::Genetic => "genetic",
            Algorithm::AntColony => "ant_colony",
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Algorithm {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "astar" | "a_star" | "a*" => Ok(Algorithm::AStar),
            "dijkstra" | "ucs" => Ok(Algorithm::Dijkstra),
            "genetic" | "ga" => Ok(Algorithm::Genetic),
            "ant_colony" | "aco" | "ants" => Ok(Algorithm::AntColony),
            other => Err(format!("unknown algorithm '{other}'")),
        }
    }
}

/// Run one strategy with the default configuration.
///
/// `Ok(None)` means start and goal are not connected (or the colony never
/// reached the goal); unknown node ids are an error.
pub fn search(
    graph: &Graph,
    start: &str,
    goal: &str,
    algorithm: Algorithm,
    mode: CostMode,
) -> Result<Option<RouteCandidate>> {
    search_with_config(graph, start, goal, algorithm, mode, &PlannerConfig::default())
}

/// Run one strategy. `mode` only affects the informed search; the
/// metaheuristics optimize the overall score and Dijkstra raw distance.
pub fn search_with_config(
    graph: &Graph,
    start: &str,
    goal: &str,
    algorithm: Algorithm,
    mode: CostMode,
    config: &PlannerConfig,
) -> Result<Option<RouteCandidate>> {
    config.validate()?;
    let start = graph.resolve(start)?;
    let goal = graph.resolve(goal)?;
    let evaluator = Evaluator::with_weights(graph, config.weights);

    if start == goal {
        let candidate = evaluator.evaluate_indices(&[start])?;
        return Ok(Some(candidate.tagged(label(algorithm, mode), 1.0)));
    }

    let found = match algorithm {
        Algorithm::AStar => astar::find_path(graph, start, goal, mode)
            .map(|path| (path, label(algorithm, mode), ASTAR_CONFIDENCE)),
        Algorithm::Dijkstra => dijkstra::find_path(graph, start, goal)
            .map(|path| (path, algorithm.to_string(), DIJKSTRA_CONFIDENCE)),
        Algorithm::Genetic => {
            let mut rng = seeded_rng(config.seed);
            match genetic::evolve(graph, start, goal, &evaluator, &config.genetic, &mut rng) {
                Some(path) => Some((path, algorithm.to_string(), GENETIC_CONFIDENCE)),
                None => {
                    tracing::warn!(
                        graph = graph.label(),
                        "genetic search seeded no route to goal, falling back to dijkstra"
                    );
                    dijkstra::find_path(graph, start, goal).map(|path| {
                        (path, "genetic:dijkstra_fallback".to_string(), DIJKSTRA_CONFIDENCE)
                    })
                }
            }
        }
        Algorithm::AntColony => {
            let mut rng = seeded_rng(config.seed);
            ant_colony::forage(graph, start, goal, &evaluator, &config.ant_colony, &mut rng)
                .map(|path| (path, algorithm.to_string(), ANT_COLONY_CONFIDENCE))
        }
    };

    let Some((path, name, confidence)) = found else {
        tracing::debug!(graph = graph.label(), %algorithm, "no path found");
        return Ok(None);
    };
    let candidate = evaluator.evaluate_indices(&path)?.tagged(name, confidence);
    Ok(Some(candidate))
}

fn label(algorithm: Algorithm, mode: CostMode) -> String {
    match algorithm {
        Algorithm::AStar => format!("{algorithm}:{mode}"),
        _ => algorithm.to_string(),
    }
}

pub(crate) fn seeded_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    }
}

#[derive(Debug, Clone, Copy)]
struct FloatOrd(f64);

impl PartialEq for FloatOrd {
    fn eq(&self, other: &Self) -> bool {
        self.0.to_bits() == other.0.to_bits()
    }
}

impl Eq for FloatOrd {}

impl PartialOrd for FloatOrd {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for FloatOrd {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

/// Open-set entry. Equal f-scores pop in insertion order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct OpenEntry {
    f_score: FloatOrd,
    seq: u64,
    node: usize,
    g_score: FloatOrd,
}

impl PartialOrd for OpenEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for OpenEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        self.f_score
            .cmp(&other.f_score)
            .then_with(|| self.seq.cmp(&other.seq))
    }
}

/// Best-first search shared by the informed and uniform-cost strategies.
///
/// `step_cost(from, to)` prices an edge, `heuristic(node)` estimates the
/// remaining cost. Closed nodes are never reopened, so with an inconsistent
/// heuristic the result is a good path rather than a provably optimal one.
fn best_first<C, H>(
    graph: &Graph,
    start: usize,
    goal: usize,
    step_cost: C,
    heuristic: H,
) -> Option<Vec<usize>>
where
    C: Fn(usize, usize) -> Option<f64>,
    H: Fn(usize) -> f64,
{
    let n = graph.node_count();
    let mut best_g = vec![f64::INFINITY; n];
    let mut came_from: Vec<Option<usize>> = vec![None; n];
    let mut closed = vec![false; n];
    let mut open_set: BinaryHeap<Reverse<OpenEntry>> = BinaryHeap::new();
    let mut seq = 0u64;
    let mut nodes_expanded = 0usize;

    best_g[start] = 0.0;
    open_set.push(Reverse(OpenEntry {
        f_score: FloatOrd(heuristic(start)),
        seq,
        node: start,
        g_score: FloatOrd(0.0),
    }));

    while let Some(Reverse(current)) = open_set.pop() {
        let node = current.node;
        if closed[node] || current.g_score.0 > best_g[node] + 1e-9 {
            continue;
        }
        if node == goal {
            tracing::debug!(nodes_expanded, cost = best_g[goal], "best-first reached goal");
            return Some(reconstruct(&came_from, goal));
        }
        closed[node] = true;
        nodes_expanded += 1;

        for &next in graph.neighbors_of(node) {
            if closed[next] {
                continue;
            }
            let Some(cost) = step_cost(node, next) else {
                continue;
            };
            let tentative_g = best_g[node] + cost;
            if tentative_g < best_g[next] {
                best_g[next] = tentative_g;
                came_from[next] = Some(node);
                seq += 1;
                open_set.push(Reverse(OpenEntry {
                    f_score: FloatOrd(tentative_g + heuristic(next)),
                    seq,
                    node: next,
                    g_score: FloatOrd(tentative_g),
                }));
            }
        }
    }

    tracing::debug!(nodes_expanded, "best-first exhausted open set");
    None
}

fn reconstruct(came_from: &[Option<usize>], goal: usize) -> Vec<usize> {
    let mut path = vec![goal];
    let mut current = goal;
    while let Some(prev) = came_from[current] {
        path.push(prev);
        current = prev;
    }
    path.reverse();
    path
}
