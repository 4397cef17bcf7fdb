//! Lazily discovered battle state graph.
//!
//! A turn is split into three kinds of vertices:
//!
//! 1. **Propose** - the proposer picks an action from its menu (a choice).
//! 2. **Resolve** - the opponent's response and initiative are drawn (chance).
//! 3. **Outcome** - the second action of the turn lands (chance).
//!
//! plus the two absorbing terminal vertices. Successors are computed on first
//! request and memoized, so every distinct key is expanded at most once.
//!
//! The graph is cyclic: healing can return a combatant to an HP total it has
//! already been at, which leads back to an earlier Propose key.

use std::cmp::Ordering;

use rustc_hash::FxHashMap;
use tracing::trace;

use crate::damage::DamageCache;
use crate::moves::MoveId;
use crate::scenario::Scenario;
use crate::state::{GameState, Side};
use crate::transition::apply_action;

/// Initiative bonus for a healing action, enough to always act first.
pub const HEAL_PRIORITY_BONUS: u32 = 10_000;

/// Graph vertex identity.
///
/// The derived ordering (variant first, then fields) is the tie-breaker for
/// equally likely outcomes. Loss sorts before win.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Key<'s> {
    Propose(GameState<'s>),
    Resolve(GameState<'s>, MoveId),
    Outcome(GameState<'s>, Side, MoveId),
    /// `true` is the win vertex, `false` the loss vertex
    Terminal(bool),
}

impl Key<'static> {
    pub const WIN: Self = Key::Terminal(true);
    pub const LOSS: Self = Key::Terminal(false);
}

impl<'s> Key<'s> {
    /// Classify a state reached mid-turn. The proposer fainting takes
    /// precedence over the opponent fainting.
    fn classify(state: GameState<'s>, otherwise: impl FnOnce(GameState<'s>) -> Key<'s>) -> Self {
        if state.me.is_fainted() {
            Key::Terminal(false)
        } else if state.them.is_fainted() {
            Key::Terminal(true)
        } else {
            otherwise(state)
        }
    }
}

/// The successor shape of one key.
#[derive(Debug, Clone, PartialEq)]
pub enum Successors<'s> {
    /// Proposer's menu, one Resolve key per action
    Choice(Vec<Key<'s>>),
    /// Outcomes sorted by descending probability, then ascending key
    Chance {
        action: MoveId,
        outcomes: Vec<(Key<'s>, f64)>,
    },
    Terminal(f64),
}

impl<'s> Successors<'s> {
    /// Successor keys in stored order.
    pub fn keys(&self) -> Vec<Key<'s>> {
        match self {
            Successors::Choice(options) => options.clone(),
            Successors::Chance { outcomes, .. } => outcomes.iter().map(|(k, _)| *k).collect(),
            Successors::Terminal(_) => Vec::new(),
        }
    }
}

/// Memoizing successor generator for one scenario.
#[derive(Debug)]
pub struct LazyGraph<'s> {
    scenario: &'s Scenario,
    memo: FxHashMap<Key<'s>, Successors<'s>>,
    cache: DamageCache,
}

impl<'s> LazyGraph<'s> {
    pub fn new(scenario: &'s Scenario) -> Self {
        Self {
            scenario,
            memo: FxHashMap::default(),
            cache: DamageCache::new(),
        }
    }

    /// Key of the scenario's starting position.
    pub fn root(&self) -> Key<'s> {
        Key::Propose(self.scenario.initial_state())
    }

    /// Successors of `key`, expanding it on first request.
    pub fn successors(&mut self, key: Key<'s>) -> &Successors<'s> {
        if !self.memo.contains_key(&key) {
            let expanded = self.expand(key);
            self.memo.insert(key, expanded);
        }
        &self.memo[&key]
    }

    /// Number of keys expanded so far.
    pub fn len(&self) -> usize {
        self.memo.len()
    }

    pub fn is_empty(&self) -> bool {
        self.memo.is_empty()
    }

    pub fn damage_cache(&self) -> &DamageCache {
        &self.cache
    }

    fn expand(&mut self, key: Key<'s>) -> Successors<'s> {
        trace!(?key, "expanding");
        match key {
            Key::Propose(state) => Successors::Choice(
                self.scenario
                    .menu
                    .iter()
                    .map(|&action| Key::Resolve(state, action))
                    .collect(),
            ),
            Key::Resolve(state, action) => Successors::Chance {
                action,
                outcomes: self.resolve(state, action),
            },
            Key::Outcome(state, side, action) => Successors::Chance {
                action,
                outcomes: self.outcome(state, side, action),
            },
            Key::Terminal(win) => Successors::Terminal(if win { 1.0 } else { 0.0 }),
        }
    }

    /// Draw the opponent's response and the turn order.
    fn resolve(&mut self, state: GameState<'s>, action: MoveId) -> Vec<(Key<'s>, f64)> {
        let scenario = self.scenario;
        let mut dist = FxHashMap::default();

        for &(response, p) in &scenario.responses {
            let bonus = if action.data().is_heal() {
                HEAL_PRIORITY_BONUS
            } else {
                0
            };
            let proposer_priority = u32::from(state.me.stats.speed) + bonus;
            let opponent_priority = u32::from(state.them.stats.speed);

            let proposer_first = (Side::Proposer, action, Side::Opponent, response);
            let opponent_first = (Side::Opponent, response, Side::Proposer, action);
            match proposer_priority.cmp(&opponent_priority) {
                Ordering::Greater => self.apply_first_action(state, proposer_first, p, &mut dist),
                Ordering::Less => self.apply_first_action(state, opponent_first, p, &mut dist),
                Ordering::Equal => {
                    self.apply_first_action(state, proposer_first, p * 0.5, &mut dist);
                    self.apply_first_action(state, opponent_first, p * 0.5, &mut dist);
                }
            }
        }

        sorted_outcomes(dist)
    }

    /// Apply the first action of a turn; surviving states wait on the second.
    fn apply_first_action(
        &mut self,
        state: GameState<'s>,
        (first_side, first, second_side, second): (Side, MoveId, Side, MoveId),
        weight: f64,
        dist: &mut FxHashMap<Key<'s>, f64>,
    ) {
        for (next, p) in apply_action(state, first_side, first, &mut self.cache) {
            let key = Key::classify(next, |s| Key::Outcome(s, second_side, second));
            *dist.entry(key).or_insert(0.0) += p * weight;
        }
    }

    /// Apply the second action of a turn; surviving states start a new turn.
    fn outcome(&mut self, state: GameState<'s>, side: Side, action: MoveId) -> Vec<(Key<'s>, f64)> {
        let mut dist = FxHashMap::default();
        for (next, p) in apply_action(state, side, action, &mut self.cache) {
            let key = Key::classify(next, Key::Propose);
            *dist.entry(key).or_insert(0.0) += p;
        }
        sorted_outcomes(dist)
    }
}

fn sorted_outcomes<'s>(dist: FxHashMap<Key<'s>, f64>) -> Vec<(Key<'s>, f64)> {
    let mut outcomes: Vec<(Key<'s>, f64)> = dist.into_iter().collect();
    outcomes.sort_by(|a, b| b.1.total_cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    outcomes
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chance_total(successors: &Successors<'_>) -> f64 {
        match successors {
            Successors::Chance { outcomes, .. } => outcomes.iter().map(|(_, p)| p).sum(),
            _ => panic!("expected a chance vertex"),
        }
    }

    #[test]
    fn test_propose_offers_menu() {
        let scenario = Scenario::reference();
        let mut graph = LazyGraph::new(&scenario);
        let root = graph.root();
        let Key::Propose(state) = root else {
            panic!("root should be a propose key");
        };
        assert_eq!(
            graph.successors(root),
            &Successors::Choice(vec![
                Key::Resolve(state, MoveId::Dig),
                Key::Resolve(state, MoveId::SuperPotion),
            ])
        );
    }

    #[test]
    fn test_resolve_is_sorted_and_conserves_probability() {
        let scenario = Scenario::reference();
        let mut graph = LazyGraph::new(&scenario);
        let state = scenario.initial_state();
        let successors = graph.successors(Key::Resolve(state, MoveId::Dig)).clone();

        assert!((chance_total(&successors) - 1.0).abs() < 1e-9);
        let Successors::Chance { action, outcomes } = successors else {
            panic!("expected a chance vertex");
        };
        assert_eq!(action, MoveId::Dig);
        assert_eq!(outcomes.len(), 22);
        assert!((outcomes[0].1 - 0.10766765285996058).abs() < 1e-15);
        for pair in outcomes.windows(2) {
            let ((ka, pa), (kb, pb)) = (pair[0], pair[1]);
            assert!(pa > pb || (pa == pb && ka < kb));
        }
    }

    #[test]
    fn test_heal_moves_first() {
        let scenario = Scenario::reference();
        let mut graph = LazyGraph::new(&scenario);
        let state = scenario.initial_state();
        // The slower proposer still acts first when healing, so the pending
        // second action always belongs to the opponent.
        let keys = graph.successors(Key::Resolve(state, MoveId::SuperPotion)).keys();
        assert!(!keys.is_empty());
        for key in keys {
            match key {
                Key::Outcome(_, side, _) => assert_eq!(side, Side::Opponent),
                Key::Terminal(_) => {}
                other => panic!("unexpected successor {:?}", other),
            }
        }
    }

    #[test]
    fn test_outcome_leads_to_new_turn() {
        let scenario = Scenario::reference();
        let mut graph = LazyGraph::new(&scenario);
        let state = scenario.initial_state();
        let successors = graph
            .successors(Key::Outcome(state, Side::Opponent, MoveId::WaterGun))
            .clone();
        assert!((chance_total(&successors) - 1.0).abs() < 1e-9);
        for key in successors.keys() {
            assert!(matches!(key, Key::Propose(_) | Key::Terminal(_)));
        }
    }

    #[test]
    fn test_expanded_once() {
        let scenario = Scenario::reference();
        let mut graph = LazyGraph::new(&scenario);
        let root = graph.root();
        let first = graph.successors(root).clone();
        let expanded = graph.len();
        let second = graph.successors(root).clone();
        assert_eq!(first, second);
        assert_eq!(graph.len(), expanded);
        assert_eq!(expanded, 1);
    }

    #[test]
    fn test_terminal_values() {
        let scenario = Scenario::reference();
        let mut graph = LazyGraph::new(&scenario);
        assert_eq!(graph.successors(Key::WIN), &Successors::Terminal(1.0));
        assert_eq!(graph.successors(Key::LOSS), &Successors::Terminal(0.0));
        assert!(Key::LOSS < Key::WIN);
    }
}
