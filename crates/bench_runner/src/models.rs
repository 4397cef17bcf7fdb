use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Default, Clone, Debug)]
pub struct RunSummary {
    pub timestamp: String,
    pub timestamp_human: String,
    pub status: String,
    /// Scenario file, or "reference"
    pub scenario: String,
    pub config: RunConfig,
    pub timing: Timing,
    pub result: ResultCheck,
    pub graph: GraphInfo,
}

#[derive(Serialize, Deserialize, Default, Clone, Debug)]
pub struct RunConfig {
    pub loops: u64,
    pub tolerance: f64,
    pub parallel: bool,
}

#[derive(Serialize, Deserialize, Default, Clone, Debug)]
pub struct Timing {
    pub total_seconds: f64,
    pub per_solve_seconds: f64,
}

#[derive(Serialize, Deserialize, Default, Clone, Debug)]
pub struct ResultCheck {
    pub value: f64,
    pub expected: f64,
    pub diff: f64,
    pub max_diff: f64,
    /// Every loop returned the same bits
    pub deterministic: bool,
}

#[derive(Serialize, Deserialize, Default, Clone, Debug)]
pub struct GraphInfo {
    pub nodes: usize,
    pub sweeps: u64,
    pub lower: f64,
    pub upper: f64,
}
