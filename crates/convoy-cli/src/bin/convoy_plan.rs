//! Plan convoy routes from a waypoint file.
//!
//! Results are printed as a JSON report on stdout; logs go to stderr
//! (`RUST_LOG` overrides the default `convoy_core=info`).

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use convoy_cli::{build_graph, load_config, load_waypoints, parse_link, waypoint_ids, PlanReport};
use convoy_core::{
    avoid_obstacle_with_config, find_alternatives_with_config, search_with_config, Algorithm,
    CostMode, Graph, NodeId, PlannerConfig,
};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Convoy route planner
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Ranked portfolio of alternative routes
    Plan {
        #[command(flatten)]
        input: InputArgs,

        /// Maximum number of routes to return
        #[arg(long, default_value_t = 3)]
        count: usize,
    },
    /// Single route from one strategy
    Search {
        #[command(flatten)]
        input: InputArgs,

        /// astar, dijkstra, genetic or ant_colony
        #[arg(long, default_value = "astar", value_parser = str::parse::<Algorithm>)]
        algorithm: Algorithm,

        /// balanced, safety_priority or speed_priority
        #[arg(long, default_value = "balanced", value_parser = str::parse::<CostMode>)]
        mode: CostMode,
    },
    /// Detour around a circular obstacle
    Avoid {
        #[command(flatten)]
        input: InputArgs,

        /// Obstacle center latitude
        #[arg(long, allow_negative_numbers = true)]
        lat: f64,

        /// Obstacle center longitude
        #[arg(long, allow_negative_numbers = true)]
        lon: f64,

        /// Obstacle radius in kilometers
        #[arg(long, default_value_t = 1.0)]
        radius_km: f64,
    },
}

#[derive(Args, Debug)]
struct InputArgs {
    /// JSON array of [lat, lon] waypoints, in travel order
    #[arg(long)]
    waypoints: PathBuf,

    /// Extra bypass between two 0-based waypoint indices, e.g. 1:3
    #[arg(long = "link", value_parser = parse_link)]
    links: Vec<(usize, usize)>,

    /// Planner config file (JSON)
    #[arg(long)]
    config: Option<PathBuf>,

    /// RNG seed for the metaheuristics
    #[arg(long)]
    seed: Option<u64>,

    /// Node id prefix
    #[arg(long, default_value = "wp")]
    label: String,
}

/// Graph and endpoints resolved from the input arguments.
struct Prepared {
    graph: Graph,
    config: PlannerConfig,
    route: Vec<NodeId>,
}

impl Prepared {
    fn load(input: &InputArgs) -> Result<Self> {
        let config = load_config(input.config.as_deref(), input.seed)?;
        let waypoints = load_waypoints(&input.waypoints)?;
        let graph = build_graph(&waypoints, &input.links, &input.label, &config)?;
        let route = waypoint_ids(&input.label, waypoints.len());
        Ok(Self {
            graph,
            config,
            route,
        })
    }

    fn start(&self) -> &str {
        self.route.first().map(String::as_str).unwrap_or_default()
    }

    fn goal(&self) -> &str {
        self.route.last().map(String::as_str).unwrap_or_default()
    }

    fn report(&self, command: &str, candidates: Vec<convoy_core::RouteCandidate>) -> PlanReport {
        PlanReport::new(
            command,
            self.graph.label(),
            self.start(),
            self.goal(),
            candidates,
            &self.config.weights,
        )
    }
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .or_else(|_| tracing_subscriber::EnvFilter::try_new("convoy_core=info"))?,
        )
        .init();

    let cli = Cli::parse();
    let report = match cli.command {
        Command::Plan { input, count } => {
            let prepared = Prepared::load(&input)?;
            let routes = find_alternatives_with_config(
                &prepared.graph,
                prepared.start(),
                prepared.goal(),
                count,
                &prepared.config,
            )?;
            prepared.report("plan", routes)
        }
        Command::Search {
            input,
            algorithm,
            mode,
        } => {
            let prepared = Prepared::load(&input)?;
            let route = search_with_config(
                &prepared.graph,
                prepared.start(),
                prepared.goal(),
                algorithm,
                mode,
                &prepared.config,
            )?;
            if route.is_none() {
                tracing::warn!(%algorithm, "no route between first and last waypoint");
            }
            prepared.report("search", route.into_iter().collect())
        }
        Command::Avoid {
            input,
            lat,
            lon,
            radius_km,
        } => {
            let mut prepared = Prepared::load(&input)?;
            let detour = avoid_obstacle_with_config(
                &mut prepared.graph,
                &prepared.route,
                (lat, lon),
                radius_km,
                &prepared.config,
            )?;
            if detour.is_none() {
                tracing::warn!(lat, lon, radius_km, "no detour around obstacle");
            }
            prepared.report("avoid", detour.into_iter().collect())
        }
    };

    let json = serde_json::to_string_pretty(&report).context("failed to serialize report")?;
    println!("{json}");
    Ok(())
}
