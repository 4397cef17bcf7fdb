//! battle_mdp - Bounded interval value iteration for a two-combatant battle
//!
//! The proposer's win probability is computed over a state graph that is
//! discovered lazily from the starting position, compacted into a dense
//! array, and solved by sweeping `[lo, hi]` bounds until the root interval
//! is narrow enough.
//!
//! ```no_run
//! use battle_mdp::{solve, Scenario};
//!
//! let value = solve(&Scenario::reference(), 0.192)?;
//! # Ok::<(), battle_mdp::MdpError>(())
//! ```

/// Battle state value types
pub mod state;

/// Move identifiers and the static move table
pub mod moves;

/// Damage rolls and memoized damage distributions
pub mod damage;

/// Single-action state transitions
pub mod transition;

/// Lazily discovered state graph
pub mod graph;

/// Dense graph form
pub mod compact;

/// Sweep order for the solver
pub mod order;

/// Interval value iteration
pub mod solver;

/// Contest setup and JSON loading
pub mod scenario;

pub mod error;

use tracing::debug;

// Re-export commonly used types
pub use compact::{compact, CompactGraph, Node, NodeId};
pub use damage::{CacheStats, DamageCache};
pub use error::{MdpError, ScenarioError};
pub use graph::{Key, LazyGraph, Successors};
pub use moves::MoveId;
pub use order::elimination_order;
pub use scenario::{Scenario, ScenarioConfig};
pub use solver::{solve_interval, verify_result, Solution, SolveOptions};
pub use state::{Badges, FixedData, GameState, HalfState, Side, Stats};

/// One solve's worth of memo tables for a scenario.
///
/// Successor lists and damage distributions are memoized for the lifetime
/// of the `Battle`, so repeated evaluations only redo the sweeps.
#[derive(Debug)]
pub struct Battle<'s> {
    graph: LazyGraph<'s>,
}

impl<'s> Battle<'s> {
    pub fn new(scenario: &'s Scenario) -> Self {
        Self {
            graph: LazyGraph::new(scenario),
        }
    }

    /// Discover, compact and order the whole graph reachable from the
    /// starting position.
    pub fn build(&mut self) -> (CompactGraph, Vec<NodeId>) {
        let root = self.graph.root();
        let graph = compact(&mut self.graph, root);
        let order = elimination_order(&graph);
        debug!(
            nodes = graph.len(),
            order = order.len(),
            "built elimination order"
        );
        (graph, order)
    }

    /// Win probability to within `tolerance`.
    pub fn evaluate(&mut self, tolerance: f64) -> Result<f64, MdpError> {
        self.evaluate_with(SolveOptions::new(tolerance))
            .map(|solution| solution.value)
    }

    pub fn evaluate_with(&mut self, options: SolveOptions) -> Result<Solution, MdpError> {
        let (graph, order) = self.build();
        let solution = solve_interval(&graph, &order, options)?;
        let stats = self.graph.damage_cache().dist_stats();
        debug!(
            value = solution.value,
            sweeps = solution.sweeps,
            damage_hits = stats.hits,
            damage_misses = stats.misses,
            "battle evaluated"
        );
        Ok(solution)
    }

    /// The underlying lazy graph.
    pub fn graph(&self) -> &LazyGraph<'s> {
        &self.graph
    }
}

/// Proposer's win probability from the scenario's starting position.
///
/// Every call builds its own memo tables, so concurrent calls share nothing.
pub fn solve(scenario: &Scenario, tolerance: f64) -> Result<f64, MdpError> {
    Battle::new(scenario).evaluate(tolerance)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reference_value() {
        let value = solve(&Scenario::reference(), 0.192).unwrap();
        assert!(verify_result(value, 0.89873589887, 1e-6).is_ok());
    }

    #[test]
    fn test_battle_reuses_memo() {
        let scenario = Scenario::reference();
        let mut battle = Battle::new(&scenario);
        let first = battle.evaluate_with(SolveOptions::new(0.192)).unwrap();
        let expanded = battle.graph().len();
        let misses = battle.graph().damage_cache().dist_stats().misses;

        let second = battle.evaluate_with(SolveOptions::new(0.192)).unwrap();
        assert_eq!(first.value.to_bits(), second.value.to_bits());
        assert_eq!(first.sweeps, 111);
        assert_eq!(battle.graph().len(), expanded);
        assert_eq!(battle.graph().damage_cache().dist_stats().misses, misses);
    }

    #[test]
    fn test_battle_is_send() {
        fn assert_send<T: Send>() {}
        assert_send::<Battle<'static>>();
        assert_send::<DamageCache>();
    }
}
