//! State transitions for a single action.
//!
//! All logic is written from the proposer's point of view. An action by the
//! opponent is resolved by swapping the two combatants, applying the action
//! as the proposer, and swapping every successor back.

use crate::damage::{CritInput, DamageCache};
use crate::moves::{MoveFlags, MoveId};
use crate::state::{GameState, Side};

/// Probability-weighted successor states, in first-seen order.
pub type StateDist<'s> = Vec<(GameState<'s>, f64)>;

/// Apply `action` by `side` to `state`.
///
/// The returned weights sum to 1.0. Healing moves produce a single certain
/// successor; attacks produce one successor per distinct remaining HP of the
/// defender.
pub fn apply_action<'s>(
    state: GameState<'s>,
    side: Side,
    action: MoveId,
    cache: &mut DamageCache,
) -> StateDist<'s> {
    match side {
        Side::Proposer => apply_as_proposer(state, action, cache),
        Side::Opponent => {
            let mut dist = apply_as_proposer(state.swapped(), action, cache);
            for (successor, _) in &mut dist {
                *successor = successor.swapped();
            }
            dist
        }
    }
}

fn apply_as_proposer<'s>(
    state: GameState<'s>,
    action: MoveId,
    cache: &mut DamageCache,
) -> StateDist<'s> {
    let data = action.data();
    let GameState { me, them, extra } = state;

    if data.is_heal() {
        let healed = GameState {
            me: me.with_hp_change(i32::from(data.heal)),
            them,
            extra,
        };
        return vec![(healed, 1.0)];
    }

    // Special moves read the Special stat on both sides
    let (attack, crit_attack, defense, crit_defense) = if data.flags.contains(MoveFlags::SPECIAL)
    {
        (me.stats.spec, me.fixed.stats.spec, them.stats.spec, them.fixed.stats.spec)
    } else {
        (me.stats.atk, me.fixed.stats.atk, them.stats.df, them.fixed.stats.df)
    };

    let damage = cache.crit_distribution(&CritInput {
        level: u32::from(me.fixed.level),
        crit_chance: f64::from(me.fixed.base_speed) / data.crit_divisor(),
        attack: u32::from(attack),
        crit_attack: u32::from(crit_attack),
        defense: u32::from(defense),
        crit_defense: u32::from(crit_defense),
        base_power: u32::from(data.power),
        stab: data.is_stab(),
        effectiveness: data.effectiveness,
    });

    let mut dist: StateDist<'s> = Vec::with_capacity(damage.len());
    for &(amount, p) in damage.iter() {
        let successor = GameState {
            me,
            them: them.with_hp_change(-(amount as i32)),
            extra,
        };
        // Damage values that clamp to the same HP merge
        match dist.iter_mut().find(|(s, _)| *s == successor) {
            Some((_, prob)) => *prob += p,
            None => dist.push((successor, p)),
        }
    }
    dist
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::{Badges, FixedData, HalfState, Stats};

    fn charmander() -> FixedData {
        FixedData {
            max_hp: 63,
            stats: Stats::new(39, 34, 46, 38),
            level: 26,
            badges: Badges::ATTACK,
            base_speed: 65,
        }
    }

    fn starmie() -> FixedData {
        FixedData {
            max_hp: 59,
            stats: Stats::new(40, 44, 56, 50),
            level: 11,
            badges: Badges::empty(),
            base_speed: 115,
        }
    }

    fn total(dist: &StateDist<'_>) -> f64 {
        dist.iter().map(|(_, p)| p).sum()
    }

    #[test]
    fn test_heal_is_certain() {
        let (a, b) = (charmander(), starmie());
        let state = GameState::new(HalfState::new(&a, 10), HalfState::new(&b, 59));
        let mut cache = DamageCache::new();

        let dist = apply_action(state, Side::Proposer, MoveId::SuperPotion, &mut cache);
        assert_eq!(dist.len(), 1);
        assert_eq!(dist[0].0.me.hp, 60);
        assert_eq!(dist[0].1, 1.0);

        // Clamped at max HP
        let state = GameState::new(HalfState::new(&a, 40), HalfState::new(&b, 59));
        let dist = apply_action(state, Side::Proposer, MoveId::SuperPotion, &mut cache);
        assert_eq!(dist[0].0.me.hp, 63);
        assert!(cache.is_empty());
    }

    #[test]
    fn test_attack_sums_to_one() {
        let (a, b) = (charmander(), starmie());
        let state = GameState::new(HalfState::new(&a, 63), HalfState::new(&b, 59));
        let mut cache = DamageCache::new();

        let dist = apply_action(state, Side::Proposer, MoveId::Dig, &mut cache);
        assert_eq!(dist.len(), 13);
        assert!((total(&dist) - 1.0).abs() < 1e-9);
        assert!(dist.iter().all(|(s, _)| s.me == state.me));
        assert!(dist.iter().all(|(s, _)| s.them.hp < 59));
    }

    #[test]
    fn test_lethal_damage_merges() {
        let (a, b) = (charmander(), starmie());
        // Every Dig roll exceeds 20 HP, so all outcomes clamp to 0
        let state = GameState::new(HalfState::new(&a, 63), HalfState::new(&b, 20));
        let mut cache = DamageCache::new();

        let dist = apply_action(state, Side::Proposer, MoveId::Dig, &mut cache);
        assert_eq!(dist.len(), 1);
        assert_eq!(dist[0].0.them.hp, 0);
        assert!((dist[0].1 - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_opponent_side_via_swap() {
        let (a, b) = (charmander(), starmie());
        let state = GameState::new(HalfState::new(&a, 63), HalfState::new(&b, 59));
        let mut cache = DamageCache::new();

        let direct = apply_action(state, Side::Opponent, MoveId::WaterGun, &mut cache);
        let swapped = apply_action(state.swapped(), Side::Proposer, MoveId::WaterGun, &mut cache);

        assert_eq!(direct.len(), swapped.len());
        for ((d, dp), (s, sp)) in direct.iter().zip(swapped.iter()) {
            assert_eq!(*d, s.swapped());
            assert_eq!(dp, sp);
        }
        // Opponent attacks only touch the proposer's HP
        assert!(direct.iter().all(|(s, _)| s.them == state.them && s.me.hp < 63));
        assert!((total(&direct) - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_opponent_heal() {
        let (a, b) = (charmander(), starmie());
        let state = GameState::new(HalfState::new(&a, 63), HalfState::new(&b, 5));
        let mut cache = DamageCache::new();

        let dist = apply_action(state, Side::Opponent, MoveId::SuperPotion, &mut cache);
        assert_eq!(dist, vec![(GameState::new(state.me, state.them.with_hp_change(50)), 1.0)]);
        assert_eq!(dist[0].0.them.hp, 55);
    }
}
