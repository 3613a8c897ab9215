//! Error taxonomy for the planning engine.
//!
//! "No route exists" is not an error: searches report it as `Ok(None)` and the
//! portfolio as an empty list. Everything here is broken input.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum PlanningError {
    /// Malformed construction input (too few waypoints, bad coordinates, ...).
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// A node id that the graph does not contain.
    #[error("unknown node: {0}")]
    UnknownNode(String),

    #[error("path is empty")]
    EmptyPath,

    /// Two consecutive path nodes that are not adjacent in the graph.
    #[error("no edge between {from} and {to}")]
    MissingEdge { from: String, to: String },

    #[error("invalid planner config: {0}")]
    InvalidConfig(String),
}

pub type Result<T> = std::result::Result<T, PlanningError>;
