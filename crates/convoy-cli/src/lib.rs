//! Convoy CLI - command line host for the convoy route planner.
//!
//! This crate provides the `convoy-plan` binary and the input/report
//! plumbing it shares with tests:
//! - input: waypoint files, bypass links, config files
//! - report: JSON report envelope printed on stdout

pub mod input;
pub mod report;

pub use input::{build_graph, load_config, load_waypoints, parse_link, waypoint_ids};
pub use report::{PlanReport, ScoredCandidate};
