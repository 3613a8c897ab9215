//! Genetic search over graph walks.
//!
//! Individuals are simple paths from start to goal. Each generation keeps the
//! better half by overall score and refills the population with spliced,
//! occasionally mutated offspring. Every operator preserves adjacency, so
//! offspring are always walkable.

use crate::config::GeneticConfig;
use crate::evaluator::Evaluator;
use crate::graph::Graph;
use crate::spatial::haversine_km;
use rand::rngs::StdRng;
use rand::seq::IndexedRandom;
use rand::Rng;
use std::collections::HashMap;

#[derive(Debug, Clone)]
struct Individual {
    path: Vec<usize>,
    score: f64,
}

/// Evolve a route from `start` to `goal`. Returns `None` only when no
/// seeding walk reached the goal; the caller decides the fallback.
pub(crate) fn evolve(
    graph: &Graph,
    start: usize,
    goal: usize,
    evaluator: &Evaluator<'_>,
    config: &GeneticConfig,
    rng: &mut StdRng,
) -> Option<Vec<usize>> {
    let mut population: Vec<Individual> = (0..config.population_size)
        .filter_map(|_| {
            random_walk(
                graph,
                start,
                goal,
                config.exploration_rate,
                config.max_walk_steps,
                rng,
            )
        })
        .map(|path| score(evaluator, path))
        .collect();

    if population.is_empty() {
        return None;
    }
    tracing::debug!(
        seeded = population.len(),
        attempted = config.population_size,
        "genetic population seeded"
    );

    let mut best = fittest(&population).clone();
    for _ in 0..config.generations {
        population.sort_by(|a, b| a.score.total_cmp(&b.score));
        population.truncate((population.len() / 2).max(1));

        let survivors = population.len();
        while population.len() < config.population_size {
            let first = &population[rng.random_range(0..survivors)];
            let second = &population[rng.random_range(0..survivors)];
            let mut child = crossover(&first.path, &second.path, rng);
            if rng.random_bool(config.mutation_rate) {
                mutate(graph, &mut child, rng);
            }
            population.push(score(evaluator, child));
        }

        let leader = fittest(&population);
        if leader.score < best.score {
            best = leader.clone();
        }
    }

    tracing::debug!(
        generations = config.generations,
        best_score = best.score,
        hops = best.path.len().saturating_sub(1),
        "genetic search finished"
    );
    Some(best.path)
}

fn score(evaluator: &Evaluator<'_>, path: Vec<usize>) -> Individual {
    let score = evaluator.score_indices(&path);
    Individual { path, score }
}

fn fittest(population: &[Individual]) -> &Individual {
    population
        .iter()
        .min_by(|a, b| a.score.total_cmp(&b.score))
        .unwrap_or(&population[0])
}

/// Goal-biased walk without revisits, `None` if it dead-ends or runs out of
/// steps.
pub(crate) fn random_walk(
    graph: &Graph,
    start: usize,
    goal: usize,
    exploration_rate: f64,
    max_steps: usize,
    rng: &mut StdRng,
) -> Option<Vec<usize>> {
    let target = graph.node_at(goal);
    let mut visited = vec![false; graph.node_count()];
    let mut path = vec![start];
    visited[start] = true;
    let mut current = start;

    for _ in 0..max_steps {
        if current == goal {
            return Some(path);
        }
        let candidates: Vec<usize> = graph
            .neighbors_of(current)
            .iter()
            .copied()
            .filter(|&next| !visited[next])
            .collect();
        if candidates.is_empty() {
            return None;
        }

        let next = if rng.random_bool(exploration_rate) {
            *candidates.choose(rng)?
        } else {
            *candidates.iter().min_by(|&&a, &&b| {
                let da = graph.node_at(a);
                let db = graph.node_at(b);
                haversine_km(da.lat, da.lon, target.lat, target.lon)
                    .total_cmp(&haversine_km(db.lat, db.lon, target.lat, target.lon))
            })?
        };
        visited[next] = true;
        path.push(next);
        current = next;
    }

    (current == goal).then_some(path)
}

/// Splice `first`'s prefix onto `second`'s suffix at a shared interior node.
/// Without a shared interior node the child is a copy of `first`.
pub(crate) fn crossover(first: &[usize], second: &[usize], rng: &mut StdRng) -> Vec<usize> {
    if first.len() < 3 || second.len() < 3 {
        return first.to_vec();
    }
    let second_interior = &second[1..second.len() - 1];
    let common: Vec<(usize, usize)> = first[1..first.len() - 1]
        .iter()
        .enumerate()
        .filter_map(|(i, node)| {
            second_interior
                .iter()
                .position(|other| other == node)
                .map(|j| (i + 1, j + 1))
        })
        .collect();

    let Some(&(i, j)) = common.choose(rng) else {
        return first.to_vec();
    };
    let mut child = first[..=i].to_vec();
    child.extend_from_slice(&second[j + 1..]);
    remove_loops(child)
}

/// Replace one interior node with an unused neighbor of its predecessor that
/// also reaches its successor.
pub(crate) fn mutate(graph: &Graph, path: &mut [usize], rng: &mut StdRng) {
    if path.len() < 3 {
        return;
    }
    let i = rng.random_range(1..path.len() - 1);
    let prev = path[i - 1];
    let next = path[i + 1];
    let options: Vec<usize> = graph
        .neighbors_of(prev)
        .iter()
        .copied()
        .filter(|candidate| !path.contains(candidate))
        .filter(|&candidate| graph.edge_at(candidate, next).is_some())
        .collect();
    if let Some(&replacement) = options.choose(rng) {
        path[i] = replacement;
    }
}

/// Cut out cycles so every node appears once. Adjacency is preserved since
/// a cycle starts and ends on the same node.
fn remove_loops(path: Vec<usize>) -> Vec<usize> {
    let mut out: Vec<usize> = Vec::with_capacity(path.len());
    let mut position: HashMap<usize, usize> = HashMap::new();
    for node in path {
        if let Some(&at) = position.get(&node) {
            for dropped in out.drain(at + 1..) {
                position.remove(&dropped);
            }
            continue;
        }
        position.insert(node, out.len());
        out.push(node);
    }
    out
}
