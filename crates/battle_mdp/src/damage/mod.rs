//! Damage distributions.
//!
//! This module turns the integer damage formula into probability
//! distributions over damage values, blending normal and critical hits.
//!
//! # Memoization
//!
//! The same (level, stat, move) combinations recur constantly while the state
//! graph is discovered, so both [`DamageCache::damages`] and
//! [`DamageCache::crit_distribution`] are memoized on their exact argument
//! tuples. The cache is an explicit value owned by whoever drives a solve
//! (see [`crate::Battle`]); there is no process-wide state.
//!
//! ```ignore
//! let mut cache = DamageCache::new();
//! let dist = cache.crit_distribution(&CritInput { level: 26, .. });
//! // dist holds (damage, probability) pairs in first-seen order
//! ```

mod formula;

pub use formula::{damage_rolls, get_base_damage, ROLL_COUNT, ROLL_MAX, ROLL_MIN};

use std::sync::Arc;

use rustc_hash::FxHashMap;

/// Probability mass over damage values, in first-seen order.
///
/// Normal-hit values come first in roll order, followed by any critical-hit
/// values that no normal roll produced.
pub type DamageDist = Arc<[(u32, f64)]>;

/// Arguments of a single damage calculation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DamageInput {
    pub level: u32,
    pub attack: u32,
    pub defense: u32,
    pub base_power: u32,
    pub stab: bool,
    pub effectiveness: f64,
}

/// Arguments of a crit-blended damage distribution.
///
/// Normal hits use the effective stats; critical hits use double the level
/// and the unboosted stats.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CritInput {
    pub level: u32,
    pub crit_chance: f64,
    pub attack: u32,
    pub crit_attack: u32,
    pub defense: u32,
    pub crit_defense: u32,
    pub base_power: u32,
    pub stab: bool,
    pub effectiveness: f64,
}

// Floats are keyed by bit pattern so lookups are exact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct DamageKey(u32, u32, u32, u32, bool, u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct CritKey(u32, u64, u32, u32, u32, u32, u32, bool, u64);

impl From<&DamageInput> for DamageKey {
    fn from(input: &DamageInput) -> Self {
        DamageKey(
            input.level,
            input.attack,
            input.defense,
            input.base_power,
            input.stab,
            input.effectiveness.to_bits(),
        )
    }
}

impl From<&CritInput> for CritKey {
    fn from(input: &CritInput) -> Self {
        CritKey(
            input.level,
            input.crit_chance.to_bits(),
            input.attack,
            input.crit_attack,
            input.defense,
            input.crit_defense,
            input.base_power,
            input.stab,
            input.effectiveness.to_bits(),
        )
    }
}

/// Hit/miss counters for one memo table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
}

impl CacheStats {
    /// Number of times the underlying function actually ran.
    #[inline]
    pub const fn computed(&self) -> u64 {
        self.misses
    }
}

/// Memo tables for damage rolls and crit-blended distributions.
#[derive(Debug, Default)]
pub struct DamageCache {
    rolls: FxHashMap<DamageKey, Arc<[u32; ROLL_COUNT]>>,
    dists: FxHashMap<CritKey, DamageDist>,
    roll_stats: CacheStats,
    dist_stats: CacheStats,
}

impl DamageCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Memoized [`damage_rolls`].
    pub fn damages(&mut self, input: &DamageInput) -> Arc<[u32; ROLL_COUNT]> {
        let key = DamageKey::from(input);
        if let Some(rolls) = self.rolls.get(&key) {
            self.roll_stats.hits += 1;
            return Arc::clone(rolls);
        }
        self.roll_stats.misses += 1;
        let rolls = Arc::new(damage_rolls(
            input.level,
            input.attack,
            input.defense,
            input.base_power,
            input.stab,
            input.effectiveness,
        ));
        self.rolls.insert(key, Arc::clone(&rolls));
        rolls
    }

    /// Memoized blend of normal and critical hit rolls.
    ///
    /// Every normal roll carries `(1 - p) / ROLL_COUNT` and every critical
    /// roll carries `p / ROLL_COUNT`, where `p = min(crit_chance, 1.0)`.
    /// Coinciding damage values accumulate.
    pub fn crit_distribution(&mut self, input: &CritInput) -> DamageDist {
        let key = CritKey::from(input);
        if let Some(dist) = self.dists.get(&key) {
            self.dist_stats.hits += 1;
            return Arc::clone(dist);
        }
        self.dist_stats.misses += 1;

        let p = input.crit_chance.min(1.0);
        let normal = self.damages(&DamageInput {
            level: input.level,
            attack: input.attack,
            defense: input.defense,
            base_power: input.base_power,
            stab: input.stab,
            effectiveness: input.effectiveness,
        });
        let crit = self.damages(&DamageInput {
            level: input.level * 2,
            attack: input.crit_attack,
            defense: input.crit_defense,
            base_power: input.base_power,
            stab: input.stab,
            effectiveness: input.effectiveness,
        });

        let mult_normal = (1.0 - p) / normal.len() as f64;
        let mult_crit = p / crit.len() as f64;

        let mut dist: Vec<(u32, f64)> = Vec::with_capacity(ROLL_COUNT);
        let weighted = normal
            .iter()
            .map(|&d| (d, mult_normal))
            .chain(crit.iter().map(|&d| (d, mult_crit)));
        for (damage, weight) in weighted {
            match dist.iter_mut().find(|(d, _)| *d == damage) {
                Some((_, prob)) => *prob += weight,
                None => dist.push((damage, weight)),
            }
        }

        let dist: DamageDist = dist.into();
        self.dists.insert(key, Arc::clone(&dist));
        dist
    }

    pub fn roll_stats(&self) -> CacheStats {
        self.roll_stats
    }

    pub fn dist_stats(&self) -> CacheStats {
        self.dist_stats
    }

    /// Number of distinct distributions held.
    pub fn len(&self) -> usize {
        self.dists.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dists.is_empty()
    }
}
