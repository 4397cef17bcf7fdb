use std::path::PathBuf;

use thiserror::Error;

/// Errors surfaced by a solve.
#[derive(Debug, Error)]
pub enum MdpError {
    #[error("invalid result: got {got}, expected {expected} (diff: {diff}, max diff: {max_diff})")]
    ResultMismatch {
        got: f64,
        expected: f64,
        diff: f64,
        max_diff: f64,
    },

    #[error("invalid tolerance: {0}")]
    InvalidTolerance(f64),

    #[error("root interval still {width} wide after {sweeps} sweeps")]
    NonConvergence { sweeps: u64, width: f64 },

    #[error(transparent)]
    Scenario(#[from] ScenarioError),
}

/// Errors from loading or validating a scenario.
#[derive(Debug, Error)]
pub enum ScenarioError {
    #[error("failed to read scenario {0}: {1}")]
    Io(PathBuf, #[source] std::io::Error),

    #[error("failed to parse scenario: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("unknown move: {0}")]
    UnknownMove(String),

    #[error("unknown badge: {0}")]
    UnknownBadge(String),

    #[error("invalid combatant {name}: {reason}")]
    InvalidCombatant { name: String, reason: String },

    #[error("{0} has no actions")]
    EmptyMenu(&'static str),

    #[error("invalid weight {weight} for {action}")]
    InvalidWeight { action: String, weight: f64 },
}
