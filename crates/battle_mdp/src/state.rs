//! Battle state value types.
//!
//! Every type here is an immutable value: transitions build new states
//! instead of mutating old ones, and equality, hashing and ordering are all
//! structural. The memo tables in [`crate::graph`] and the tie-breaking in
//! successor lists depend on that.

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

// ============================================================================
// Stats & Badges
// ============================================================================

/// The four battle stats. Field order defines the structural ordering.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct Stats {
    pub atk: u16,
    pub df: u16,
    pub speed: u16,
    pub spec: u16,
}

/// No stat modifications.
pub const NOMODS: Stats = Stats::new(0, 0, 0, 0);

impl Stats {
    pub const fn new(atk: u16, df: u16, speed: u16, spec: u16) -> Self {
        Self { atk, df, speed, spec }
    }

    /// Apply the badge boost (`x + x / 8`) to every stat whose badge is set.
    pub fn with_badge_boosts(self, badges: Badges) -> Self {
        let boost = |value: u16, badge: Badges| {
            if badges.contains(badge) {
                plus_one_eighth(value)
            } else {
                value
            }
        };
        Self {
            atk: boost(self.atk, Badges::ATTACK),
            df: boost(self.df, Badges::DEFENSE),
            speed: boost(self.speed, Badges::SPEED),
            spec: boost(self.spec, Badges::SPECIAL),
        }
    }
}

#[inline]
const fn plus_one_eighth(value: u16) -> u16 {
    value + value / 8
}

bitflags! {
    /// Gym badges held by a combatant. Each one boosts a single stat.
    #[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
    pub struct Badges: u8 {
        const ATTACK  = 1 << 0;
        const DEFENSE = 1 << 1;
        const SPEED   = 1 << 2;
        const SPECIAL = 1 << 3;
    }
}

impl Badges {
    /// Look up a badge by the name of the stat it boosts.
    pub fn from_stat_name(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "atk" | "attack" => Some(Self::ATTACK),
            "df" | "def" | "defense" => Some(Self::DEFENSE),
            "speed" | "spe" => Some(Self::SPEED),
            "spec" | "special" => Some(Self::SPECIAL),
            _ => None,
        }
    }
}

// ============================================================================
// Combatants
// ============================================================================

/// Per-combatant data that never changes during a contest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FixedData {
    pub max_hp: u16,
    /// Unboosted stats (critical hits read these)
    pub stats: Stats,
    pub level: u8,
    pub badges: Badges,
    /// Species base speed (drives the critical hit rate)
    pub base_speed: u16,
}

/// One combatant's situation at a point in the contest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct HalfState<'s> {
    pub fixed: &'s FixedData,
    pub hp: u16,
    pub status: u8,
    pub statmods: Stats,
    /// Effective stats (badge boosts applied)
    pub stats: Stats,
}

impl<'s> HalfState<'s> {
    /// Fresh combatant with the given starting HP and badge-boosted stats.
    pub fn new(fixed: &'s FixedData, hp: u16) -> Self {
        Self {
            fixed,
            hp: hp.min(fixed.max_hp),
            status: 0,
            statmods: NOMODS,
            stats: fixed.stats.with_badge_boosts(fixed.badges),
        }
    }

    /// New state with HP shifted by `change`, clamped to `[0, max_hp]`.
    #[must_use]
    pub fn with_hp_change(self, change: i32) -> Self {
        let hp = (i32::from(self.hp) + change).clamp(0, i32::from(self.fixed.max_hp));
        Self {
            hp: hp as u16,
            ..self
        }
    }

    #[inline]
    pub const fn is_fainted(&self) -> bool {
        self.hp == 0
    }
}

// ============================================================================
// Game State
// ============================================================================

/// Which combatant a transition applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Side {
    /// The proposing combatant (`me`)
    Proposer = 0,
    /// The responding combatant (`them`)
    Opponent = 1,
}

impl Side {
    #[inline]
    pub const fn other(self) -> Self {
        match self {
            Side::Proposer => Side::Opponent,
            Side::Opponent => Side::Proposer,
        }
    }
}

/// Full contest state: (proposer, opponent, extra info).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct GameState<'s> {
    pub me: HalfState<'s>,
    pub them: HalfState<'s>,
    pub extra: i32,
}

impl<'s> GameState<'s> {
    pub const fn new(me: HalfState<'s>, them: HalfState<'s>) -> Self {
        Self { me, them, extra: 0 }
    }

    /// Exchange the two combatants. Applying this twice is the identity.
    #[inline]
    #[must_use]
    pub const fn swapped(self) -> Self {
        Self {
            me: self.them,
            them: self.me,
            extra: self.extra,
        }
    }
}
