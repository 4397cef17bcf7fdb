//! Contest setup.
//!
//! A [`Scenario`] fixes everything that stays constant during a solve: both
//! combatants, the proposer's action menu, and the opponent's weighted
//! responses. Scenarios are built in code ([`Scenario::reference`]) or loaded
//! from JSON via [`ScenarioConfig`].

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ScenarioError;
use crate::moves::MoveId;
use crate::state::{Badges, FixedData, GameState, HalfState, Stats};

// ============================================================================
// Scenario
// ============================================================================

/// One side of the contest.
#[derive(Debug, Clone, PartialEq)]
pub struct Combatant {
    pub name: String,
    pub fixed: FixedData,
    /// Starting HP
    pub hp: u16,
}

impl Combatant {
    /// Combatant at full HP.
    pub fn new(name: impl Into<String>, fixed: FixedData) -> Self {
        Self {
            name: name.into(),
            hp: fixed.max_hp,
            fixed,
        }
    }

    pub fn half_state(&self) -> HalfState<'_> {
        HalfState::new(&self.fixed, self.hp)
    }
}

/// Fully resolved contest setup.
#[derive(Debug, Clone, PartialEq)]
pub struct Scenario {
    pub proposer: Combatant,
    pub opponent: Combatant,
    /// Actions the proposer chooses between each turn
    pub menu: Vec<MoveId>,
    /// Opponent actions with probabilities summing to 1
    pub responses: Vec<(MoveId, f64)>,
}

impl Scenario {
    /// The fixed two-combatant benchmark setup.
    ///
    /// A level 26 fire starter holding the attack badge (Dig or Super Potion)
    /// against a level 11 water starter (Water Gun 64/130, Bubblebeam 66/130).
    pub fn reference() -> Self {
        let proposer = Combatant::new(
            "Charmander",
            FixedData {
                max_hp: 63,
                stats: Stats::new(39, 34, 46, 38),
                level: 26,
                badges: Badges::ATTACK,
                base_speed: 65,
            },
        );
        let opponent = Combatant::new(
            "Starmie",
            FixedData {
                max_hp: 59,
                stats: Stats::new(40, 44, 56, 50),
                level: 11,
                badges: Badges::empty(),
                base_speed: 115,
            },
        );
        let total = 64.0 + 66.0;
        Self {
            proposer,
            opponent,
            menu: vec![MoveId::Dig, MoveId::SuperPotion],
            responses: vec![
                (MoveId::WaterGun, 64.0 / total),
                (MoveId::Bubblebeam, 66.0 / total),
            ],
        }
    }

    /// The starting position.
    pub fn initial_state(&self) -> GameState<'_> {
        GameState::new(self.proposer.half_state(), self.opponent.half_state())
    }

    /// Load and validate a JSON scenario file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ScenarioError> {
        let path = path.as_ref();
        let content =
            std::fs::read_to_string(path).map_err(|e| ScenarioError::Io(path.to_path_buf(), e))?;
        Self::from_json(&content)
    }

    /// Parse and validate a JSON scenario.
    pub fn from_json(json: &str) -> Result<Self, ScenarioError> {
        let config: ScenarioConfig = serde_json::from_str(json)?;
        Self::from_config(&config)
    }

    pub fn from_config(config: &ScenarioConfig) -> Result<Self, ScenarioError> {
        let proposer = config.proposer.resolve()?;
        let opponent = config.opponent.resolve()?;

        if config.menu.is_empty() {
            return Err(ScenarioError::EmptyMenu("proposer"));
        }
        let menu = config
            .menu
            .iter()
            .map(|name| parse_move(name))
            .collect::<Result<Vec<_>, _>>()?;

        if config.responses.is_empty() {
            return Err(ScenarioError::EmptyMenu("opponent"));
        }
        let mut weighted = Vec::with_capacity(config.responses.len());
        for response in &config.responses {
            let action = parse_move(&response.name)?;
            if !(response.weight.is_finite() && response.weight > 0.0) {
                return Err(ScenarioError::InvalidWeight {
                    action: response.name.clone(),
                    weight: response.weight,
                });
            }
            weighted.push((action, response.weight));
        }
        let total: f64 = weighted.iter().map(|(_, w)| w).sum();
        let responses = weighted.into_iter().map(|(a, w)| (a, w / total)).collect();

        Ok(Self {
            proposer,
            opponent,
            menu,
            responses,
        })
    }
}

fn parse_move(name: &str) -> Result<MoveId, ScenarioError> {
    MoveId::from_str(name).ok_or_else(|| ScenarioError::UnknownMove(name.to_string()))
}

// ============================================================================
// JSON Form
// ============================================================================

/// Serialized scenario.
///
/// ```json
/// {
///   "proposer": { "name": "Charmander", "max_hp": 63, "level": 26,
///                 "stats": { "atk": 39, "df": 34, "speed": 46, "spec": 38 },
///                 "badges": ["attack"], "base_speed": 65 },
///   "opponent": { ... },
///   "menu": ["Dig", "Super Potion"],
///   "responses": [{ "move": "Water Gun", "weight": 64 }]
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioConfig {
    pub proposer: CombatantConfig,
    pub opponent: CombatantConfig,
    pub menu: Vec<String>,
    pub responses: Vec<ResponseConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CombatantConfig {
    pub name: String,
    pub max_hp: u16,
    /// Starting HP (defaults to `max_hp`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hp: Option<u16>,
    pub stats: Stats,
    pub level: u8,
    /// Stat names whose badge is held
    #[serde(default)]
    pub badges: Vec<String>,
    pub base_speed: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResponseConfig {
    #[serde(rename = "move")]
    pub name: String,
    pub weight: f64,
}

/// Highest level a combatant can have.
const MAX_LEVEL: u8 = 100;

/// Cap on max HP and each stat, before badge boosts.
const MAX_STAT: u16 = 999;

const MAX_BASE_SPEED: u16 = 255;

impl CombatantConfig {
    fn resolve(&self) -> Result<Combatant, ScenarioError> {
        let invalid = |reason: &str| ScenarioError::InvalidCombatant {
            name: self.name.clone(),
            reason: reason.to_string(),
        };

        if self.max_hp == 0 || self.max_hp > MAX_STAT {
            return Err(invalid("max_hp must be within 1..=999"));
        }
        if self.level == 0 || self.level > MAX_LEVEL {
            return Err(invalid("level must be within 1..=100"));
        }
        // Both are used as divisors by the damage formula
        if self.stats.df == 0 || self.stats.spec == 0 {
            return Err(invalid("defense and special must be positive"));
        }
        let Stats { atk, df, speed, spec } = self.stats;
        if [atk, df, speed, spec].iter().any(|&stat| stat > MAX_STAT) {
            return Err(invalid("stats must not exceed 999"));
        }
        if self.base_speed > MAX_BASE_SPEED {
            return Err(invalid("base_speed must not exceed 255"));
        }
        let hp = self.hp.unwrap_or(self.max_hp);
        if hp == 0 || hp > self.max_hp {
            return Err(invalid("hp must be within 1..=max_hp"));
        }

        let mut badges = Badges::empty();
        for name in &self.badges {
            badges |= Badges::from_stat_name(name)
                .ok_or_else(|| ScenarioError::UnknownBadge(name.clone()))?;
        }

        Ok(Combatant {
            name: self.name.clone(),
            fixed: FixedData {
                max_hp: self.max_hp,
                stats: self.stats,
                level: self.level,
                badges,
                base_speed: self.base_speed,
            },
            hp,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const REFERENCE_JSON: &str = r#"{
        "proposer": {
            "name": "Charmander", "max_hp": 63, "level": 26, "base_speed": 65,
            "stats": { "atk": 39, "df": 34, "speed": 46, "spec": 38 },
            "badges": ["attack"]
        },
        "opponent": {
            "name": "Starmie", "max_hp": 59, "level": 11, "base_speed": 115,
            "stats": { "atk": 40, "df": 44, "speed": 56, "spec": 50 }
        },
        "menu": ["Dig", "Super Potion"],
        "responses": [
            { "move": "Water Gun", "weight": 64 },
            { "move": "Bubblebeam", "weight": 66 }
        ]
    }"#;

    #[test]
    fn test_json_matches_reference() {
        let scenario = Scenario::from_json(REFERENCE_JSON).unwrap();
        assert_eq!(scenario, Scenario::reference());
    }

    #[test]
    fn test_initial_state_boosted() {
        let scenario = Scenario::reference();
        let state = scenario.initial_state();
        assert_eq!(state.me.stats, Stats::new(43, 34, 46, 38));
        assert_eq!(state.them.stats, Stats::new(40, 44, 56, 50));
        assert_eq!(state.me.hp, 63);
        assert_eq!(state.them.hp, 59);
        assert_eq!(state.extra, 0);
    }

    #[test]
    fn test_response_weights_normalized() {
        let scenario = Scenario::reference();
        let total: f64 = scenario.responses.iter().map(|(_, p)| p).sum();
        assert!((total - 1.0).abs() < 1e-12);
        assert_eq!(scenario.responses[0].1, 64.0 / 130.0);
    }

    #[test]
    fn test_unknown_move_rejected() {
        let json = REFERENCE_JSON.replace("\"Dig\"", "\"Hyper Beam\"");
        let err = Scenario::from_json(&json).unwrap_err();
        assert!(matches!(err, ScenarioError::UnknownMove(name) if name == "Hyper Beam"));
    }

    #[test]
    fn test_invalid_hp_rejected() {
        let json = REFERENCE_JSON.replace("\"max_hp\": 63", "\"max_hp\": 63, \"hp\": 70");
        let err = Scenario::from_json(&json).unwrap_err();
        assert!(matches!(err, ScenarioError::InvalidCombatant { .. }));
    }

    #[test]
    fn test_out_of_range_stats_rejected() {
        // A boosted 60000 would overflow u16
        let json = REFERENCE_JSON.replace("\"atk\": 39", "\"atk\": 60000");
        let err = Scenario::from_json(&json).unwrap_err();
        assert!(matches!(err, ScenarioError::InvalidCombatant { name, .. } if name == "Charmander"));

        let json = REFERENCE_JSON.replace("\"level\": 11", "\"level\": 255");
        let err = Scenario::from_json(&json).unwrap_err();
        assert!(matches!(err, ScenarioError::InvalidCombatant { name, .. } if name == "Starmie"));

        let json = REFERENCE_JSON.replace("\"max_hp\": 59", "\"max_hp\": 1000");
        assert!(Scenario::from_json(&json).is_err());

        let json = REFERENCE_JSON.replace("\"base_speed\": 115", "\"base_speed\": 256");
        assert!(Scenario::from_json(&json).is_err());
    }

    #[test]
    fn test_stat_caps_accepted() {
        let json = REFERENCE_JSON
            .replace("\"atk\": 39", "\"atk\": 999")
            .replace("\"level\": 26", "\"level\": 100")
            .replace("\"df\": 44", "\"df\": 1");
        let scenario = Scenario::from_json(&json).unwrap();
        // 999 + 999 / 8 with the attack badge
        assert_eq!(scenario.initial_state().me.stats.atk, 1123);
    }

    #[test]
    fn test_bad_weight_rejected() {
        let json = REFERENCE_JSON.replace("\"weight\": 64", "\"weight\": -1");
        let err = Scenario::from_json(&json).unwrap_err();
        assert!(matches!(err, ScenarioError::InvalidWeight { .. }));
    }

    #[test]
    fn test_empty_menu_rejected() {
        let json = REFERENCE_JSON.replace("[\"Dig\", \"Super Potion\"]", "[]");
        let err = Scenario::from_json(&json).unwrap_err();
        assert!(matches!(err, ScenarioError::EmptyMenu("proposer")));
    }

    #[test]
    fn test_malformed_json() {
        let err = Scenario::from_json("{ \"proposer\": 1 }").unwrap_err();
        assert!(matches!(err, ScenarioError::Parse(_)));
    }
}
