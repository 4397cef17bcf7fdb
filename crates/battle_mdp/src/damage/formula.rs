//! Core damage formula.
//!
//! Integer arithmetic with truncation at each step, followed by the
//! 217..=255 random roll scaled over 255.

/// Lowest random roll (inclusive).
pub const ROLL_MIN: u32 = 217;

/// Highest random roll (inclusive).
pub const ROLL_MAX: u32 = 255;

/// Number of equally likely damage rolls.
pub const ROLL_COUNT: usize = (ROLL_MAX - ROLL_MIN + 1) as usize;

/// Calculate damage before the random roll.
///
/// Formula: `floor(floor(floor(2 * L / 5) + 2) * A * B / (D * 50)) + 2`,
/// then `+50%` for same-type attacks, then scaled by type effectiveness and
/// truncated.
pub fn get_base_damage(
    level: u32,
    attack: u32,
    defense: u32,
    base_power: u32,
    stab: bool,
    effectiveness: f64,
) -> u32 {
    let level_factor = 2 * level / 5 + 2;
    let mut damage = (level_factor * attack * base_power) / (defense * 50) + 2;
    if stab {
        damage += damage / 2;
    }
    (f64::from(damage) * effectiveness) as u32
}

/// Get every possible damage value, one per random roll, in roll order.
///
/// The result is non-decreasing.
pub fn damage_rolls(
    level: u32,
    attack: u32,
    defense: u32,
    base_power: u32,
    stab: bool,
    effectiveness: f64,
) -> [u32; ROLL_COUNT] {
    let base = get_base_damage(level, attack, defense, base_power, stab, effectiveness);
    let mut rolls = [0u32; ROLL_COUNT];
    for (roll, z) in rolls.iter_mut().zip(ROLL_MIN..=ROLL_MAX) {
        // Never exceeds `base`, so the narrowing is lossless
        *roll = (u64::from(base) * u64::from(z) / 255) as u32;
    }
    rolls
}
