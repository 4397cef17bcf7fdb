//! Interval value iteration.
//!
//! Every vertex carries a `[lo, hi]` bound on its win probability, starting
//! at `[0, 1]` (terminals start at their exact value). Each sweep recomputes
//! the bounds in elimination order:
//!
//! - **Choice**: `lo = max(lo[j])`, `hi = max(hi[j])` over the options.
//! - **Chance**: `lo = sum(p * lo[j])`, `hi = sum(p * hi[j])` over outcomes.
//!
//! Once a vertex's bounds meet or cross, both collapse to their midpoint and
//! the vertex is frozen; it is never updated again. Iteration stops when the
//! root's interval is no wider than the tolerance, and the root's midpoint is
//! the answer.

use tracing::{debug, trace};

use crate::compact::{CompactGraph, Node, NodeId};
use crate::error::MdpError;

/// Stopping rules for [`solve_interval`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SolveOptions {
    /// Stop once the root interval is no wider than this
    pub tolerance: f64,
    /// Give up after this many sweeps. `None` sweeps until the tolerance is
    /// met, which never happens if rounding keeps the root interval open.
    pub max_sweeps: Option<u64>,
}

impl SolveOptions {
    pub const fn new(tolerance: f64) -> Self {
        Self {
            tolerance,
            max_sweeps: None,
        }
    }

    /// Cap the number of sweeps.
    pub fn max_sweeps(mut self, sweeps: u64) -> Self {
        self.max_sweeps = Some(sweeps);
        self
    }
}

/// Result of a solve.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Solution {
    /// Midpoint of the root interval
    pub value: f64,
    pub lower: f64,
    pub upper: f64,
    pub sweeps: u64,
}

impl Solution {
    #[inline]
    pub fn width(&self) -> f64 {
        self.upper - self.lower
    }
}

/// Per-vertex bounds over a compacted graph.
///
/// Exposed so the bounds can be observed between sweeps.
#[derive(Debug, Clone)]
pub struct IntervalState<'g> {
    graph: &'g CompactGraph,
    order: &'g [NodeId],
    lo: Vec<f64>,
    hi: Vec<f64>,
    frozen: Vec<bool>,
    sweeps: u64,
}

impl<'g> IntervalState<'g> {
    /// Fresh `[0, 1]` bounds with terminals seeded and frozen.
    pub fn new(graph: &'g CompactGraph, order: &'g [NodeId]) -> Self {
        let n = graph.len();
        let mut lo = vec![0.0; n];
        let mut hi = vec![1.0; n];
        let mut frozen = vec![false; n];

        for (i, node) in graph.nodes().iter().enumerate() {
            if let Node::Terminal { value } = *node {
                lo[i] = value;
                hi[i] = value;
                frozen[i] = true;
            }
        }

        Self {
            graph,
            order,
            lo,
            hi,
            frozen,
            sweeps: 0,
        }
    }

    /// One pass over the elimination order.
    pub fn sweep(&mut self) {
        let Self {
            graph,
            order,
            lo,
            hi,
            frozen,
            sweeps,
        } = self;

        for &id in order.iter() {
            let i = id.index();
            if frozen[i] {
                continue;
            }

            match graph.node(id) {
                Node::Choice { options } => {
                    lo[i] = options
                        .iter()
                        .map(|j| lo[j.index()])
                        .fold(f64::NEG_INFINITY, f64::max);
                    hi[i] = options
                        .iter()
                        .map(|j| hi[j.index()])
                        .fold(f64::NEG_INFINITY, f64::max);
                }
                Node::Chance { outcomes, .. } => {
                    let mut sum_lo = 0.0;
                    let mut sum_hi = 0.0;
                    for &(j, p) in outcomes {
                        sum_lo += lo[j.index()] * p;
                        sum_hi += hi[j.index()] * p;
                    }
                    lo[i] = sum_lo;
                    hi[i] = sum_hi;
                }
                Node::Terminal { .. } => continue,
            }

            // Collapse on overshoot
            if lo[i] >= hi[i] {
                let mid = 0.5 * (lo[i] + hi[i]);
                lo[i] = mid;
                hi[i] = mid;
                frozen[i] = true;
            }
        }

        *sweeps += 1;
    }

    #[inline]
    pub fn bounds(&self, id: NodeId) -> (f64, f64) {
        (self.lo[id.index()], self.hi[id.index()])
    }

    #[inline]
    pub fn is_frozen(&self, id: NodeId) -> bool {
        self.frozen[id.index()]
    }

    /// Width of the root interval.
    #[inline]
    pub fn root_width(&self) -> f64 {
        let (lo, hi) = self.bounds(self.graph.root());
        hi - lo
    }

    #[inline]
    pub const fn sweeps(&self) -> u64 {
        self.sweeps
    }

    /// Current answer: the midpoint of the root interval.
    pub fn solution(&self) -> Solution {
        let (lower, upper) = self.bounds(self.graph.root());
        Solution {
            value: 0.5 * (upper + lower),
            lower,
            upper,
            sweeps: self.sweeps,
        }
    }
}

/// Sweep until the root interval is within `options.tolerance`.
///
/// A non-positive tolerance requires the root interval to close exactly.
/// A root that is already exact (e.g. a terminal) returns without sweeping.
pub fn solve_interval(
    graph: &CompactGraph,
    order: &[NodeId],
    options: SolveOptions,
) -> Result<Solution, MdpError> {
    if options.tolerance.is_nan() {
        return Err(MdpError::InvalidTolerance(options.tolerance));
    }

    let mut state = IntervalState::new(graph, order);
    while state.root_width() > options.tolerance {
        if let Some(max) = options.max_sweeps {
            if state.sweeps() >= max {
                return Err(MdpError::NonConvergence {
                    sweeps: state.sweeps(),
                    width: state.root_width(),
                });
            }
        }
        state.sweep();
        trace!(sweep = state.sweeps(), width = state.root_width(), "sweep done");
    }

    let solution = state.solution();
    debug!(
        sweeps = solution.sweeps,
        value = solution.value,
        width = solution.width(),
        "interval iteration converged"
    );
    Ok(solution)
}

/// Compare a result against a known reference value.
///
/// NaN results always mismatch.
pub fn verify_result(got: f64, expected: f64, max_diff: f64) -> Result<f64, MdpError> {
    let diff = got - expected;
    if diff.abs() <= max_diff {
        Ok(got)
    } else {
        Err(MdpError::ResultMismatch {
            got,
            expected,
            diff,
            max_diff,
        })
    }
}
