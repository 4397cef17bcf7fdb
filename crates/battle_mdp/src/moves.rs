//! Move identifiers and the static move table.

use bitflags::bitflags;
use phf::phf_map;

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct MoveFlags: u8 {
        /// Uses the Special stat on both sides
        const SPECIAL   = 1 << 0;
        /// Same-type attack bonus applies
        const STAB      = 1 << 1;
        /// Critical hit rate is `base_speed / 64` instead of `/ 512`
        const HIGH_CRIT = 1 << 2;
        /// Restores HP instead of dealing damage
        const HEAL      = 1 << 3;
    }
}

/// Move identifier.
///
/// Variants are declared in the lexicographic order of their display names,
/// so the derived `Ord` sorts moves by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum MoveId {
    Bubblebeam,
    Dig,
    Ember,
    Slash,
    SuperPotion,
    WaterGun,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MoveData {
    pub name: &'static str,
    pub power: u16,
    /// Type effectiveness multiplier against the opponent
    pub effectiveness: f64,
    /// HP restored by a healing move
    pub heal: u16,
    pub flags: MoveFlags,
}

impl MoveData {
    #[inline]
    pub const fn is_heal(&self) -> bool {
        self.flags.contains(MoveFlags::HEAL)
    }

    #[inline]
    pub const fn is_stab(&self) -> bool {
        self.flags.contains(MoveFlags::STAB)
    }

    /// Divisor applied to base speed to get the critical hit probability.
    #[inline]
    pub const fn crit_divisor(&self) -> f64 {
        if self.flags.contains(MoveFlags::HIGH_CRIT) {
            64.0
        } else {
            512.0
        }
    }
}

static MOVE_DATA: [MoveData; 6] = [
    MoveData {
        name: "Bubblebeam",
        power: 65,
        effectiveness: 2.0,
        heal: 0,
        flags: MoveFlags::SPECIAL.union(MoveFlags::STAB),
    },
    MoveData {
        name: "Dig",
        power: 100,
        effectiveness: 1.0,
        heal: 0,
        flags: MoveFlags::empty(),
    },
    MoveData {
        name: "Ember",
        power: 40,
        effectiveness: 0.5,
        heal: 0,
        flags: MoveFlags::SPECIAL.union(MoveFlags::STAB),
    },
    MoveData {
        name: "Slash",
        power: 70,
        effectiveness: 1.0,
        heal: 0,
        flags: MoveFlags::HIGH_CRIT,
    },
    MoveData {
        name: "Super Potion",
        power: 0,
        effectiveness: 1.0,
        heal: 50,
        flags: MoveFlags::HEAL,
    },
    MoveData {
        name: "Water Gun",
        power: 40,
        effectiveness: 2.0,
        heal: 0,
        flags: MoveFlags::SPECIAL.union(MoveFlags::STAB),
    },
];

/// Normalized name lookup (lowercase, no spaces or dashes).
static MOVE_LOOKUP: phf::Map<&'static str, MoveId> = phf_map! {
    "bubblebeam" => MoveId::Bubblebeam,
    "dig" => MoveId::Dig,
    "ember" => MoveId::Ember,
    "slash" => MoveId::Slash,
    "superpotion" => MoveId::SuperPotion,
    "watergun" => MoveId::WaterGun,
};

impl MoveId {
    pub const ALL: [MoveId; 6] = [
        MoveId::Bubblebeam,
        MoveId::Dig,
        MoveId::Ember,
        MoveId::Slash,
        MoveId::SuperPotion,
        MoveId::WaterGun,
    ];

    #[inline]
    pub fn data(self) -> &'static MoveData {
        &MOVE_DATA[self as usize]
    }

    #[inline]
    pub fn name(self) -> &'static str {
        self.data().name
    }

    /// Look up a move by name. Case, spaces and dashes are ignored.
    pub fn from_str(name: &str) -> Option<Self> {
        let normalized: String = name
            .chars()
            .filter(|c| !matches!(c, ' ' | '-' | '_'))
            .flat_map(char::to_lowercase)
            .collect();
        MOVE_LOOKUP.get(normalized.as_str()).copied()
    }
}

impl std::fmt::Display for MoveId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
