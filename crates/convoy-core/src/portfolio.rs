//! Route portfolio: several strategies, deduplicated and ranked.

use crate::config::PlannerConfig;
use crate::cost::CostMode;
use crate::error::Result;
use crate::evaluator::RouteCandidate;
use crate::graph::Graph;
use crate::models::NodeId;
use crate::search::{search_with_config, Algorithm};
use std::collections::HashSet;

/// Up to `count` distinct candidates from `start` to `goal`, best first.
pub fn find_alternatives(
    graph: &Graph,
    start: &str,
    goal: &str,
    count: usize,
) -> Result<Vec<RouteCandidate>> {
    find_alternatives_with_config(graph, start, goal, count, &PlannerConfig::default())
}

/// Portfolio run with an explicit configuration.
///
/// Informed search runs once per `config.portfolio_modes` entry, then the
/// uniform-cost baseline. The genetic and ant colony strategies only run
/// while fewer than `count` distinct routes have been found.
pub fn find_alternatives_with_config(
    graph: &Graph,
    start: &str,
    goal: &str,
    count: usize,
    config: &PlannerConfig,
) -> Result<Vec<RouteCandidate>> {
    config.validate()?;
    graph.resolve(start)?;
    graph.resolve(goal)?;
    if count == 0 {
        return Ok(Vec::new());
    }

    let mut portfolio = Portfolio::new(start, goal);
    for &mode in &config.portfolio_modes {
        portfolio.offer(search_with_config(
            graph,
            start,
            goal,
            Algorithm::AStar,
            mode,
            config,
        )?);
    }
    portfolio.offer(search_with_config(
        graph,
        start,
        goal,
        Algorithm::Dijkstra,
        CostMode::Balanced,
        config,
    )?);
    for algorithm in [Algorithm::Genetic, Algorithm::AntColony] {
        if portfolio.len() >= count {
            break;
        }
        portfolio.offer(search_with_config(
            graph,
            start,
            goal,
            algorithm,
            CostMode::Balanced,
            config,
        )?);
    }

    let ranked = portfolio.ranked(config, count);
    tracing::info!(
        graph = graph.label(),
        start,
        goal,
        requested = count,
        returned = ranked.len(),
        "route portfolio assembled"
    );
    Ok(ranked)
}

struct Portfolio<'a> {
    start: &'a str,
    goal: &'a str,
    seen: HashSet<(Vec<NodeId>, Vec<NodeId>)>,
    candidates: Vec<RouteCandidate>,
}

impl<'a> Portfolio<'a> {
    fn new(start: &'a str, goal: &'a str) -> Self {
        Self {
            start,
            goal,
            seen: HashSet::new(),
            candidates: Vec::new(),
        }
    }

    fn len(&self) -> usize {
        self.candidates.len()
    }

    /// Keep the candidate if it connects the endpoints and its signature is new.
    fn offer(&mut self, candidate: Option<RouteCandidate>) {
        let Some(candidate) = candidate else {
            return;
        };
        if candidate.start() != Some(self.start) || candidate.goal() != Some(self.goal) {
            return;
        }
        if self.seen.insert(candidate.signature()) {
            self.candidates.push(candidate);
        } else {
            tracing::debug!(algorithm = %candidate.algorithm, "duplicate route dropped");
        }
    }

    fn ranked(mut self, config: &PlannerConfig, count: usize) -> Vec<RouteCandidate> {
        let weights = config.weights;
        self.candidates.sort_by(|a, b| {
            a.overall_score_with(&weights)
                .total_cmp(&b.overall_score_with(&weights))
        });
        self.candidates.truncate(count);
        self.candidates
    }
}
