//! Rules configuration with documented constants
//!
//! Every tunable number of the combat rules lives here. Content (abilities,
//! enemies, battlefields) is loaded separately by `battle::scenario`.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::core::error::{Result, SkirmishError};
use crate::dice::notation::{MAX_DICE_PER_ROLL, MAX_DIE_SIDES};
use crate::dice::DiceNotation;

/// Built-in rules shipped with the crate
pub const BUILTIN_RULES: &str = include_str!("../../data/rules.toml");

/// Configuration for the combat rules
///
/// Loaded from `data/rules.toml`; missing keys fall back to the defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RulesConfig {
    // === MOVEMENT ===
    /// Movement points spent per hex step before the terrain multiplier
    ///
    /// With a speed of 30 and a base cost of 5 a combatant walks 6 hexes
    /// per turn on neutral terrain.
    pub base_movement_cost: u32,

    // === ATTACKS ===
    /// Die drawn for every hit check
    pub hit_die: DiceNotation,

    /// Minimum hit-die total that lands an attack (inclusive)
    ///
    /// A natural maximum face always hits and is flagged critical,
    /// whatever this threshold says.
    pub hit_threshold: i32,

    // === RESOURCES ===
    /// Mana restored to each side at the end of its own turn
    ///
    /// Capped at the combatant's maximum mana.
    pub mana_regen_per_turn: u32,

    // === ENEMY ===
    /// Hex steps the enemy takes toward the player when it cannot attack
    ///
    /// Further capped by the enemy's movement budget.
    pub enemy_steps_per_turn: u32,
}

impl Default for RulesConfig {
    fn default() -> Self {
        Self {
            base_movement_cost: 5,
            hit_die: DiceNotation::new(1, 20, 0),
            hit_threshold: 11,
            mana_regen_per_turn: 5,
            enemy_steps_per_turn: 1,
        }
    }
}

impl RulesConfig {
    /// Create a new config with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// The rules shipped in `data/rules.toml`
    pub fn builtin() -> Result<Self> {
        Self::from_toml_str(BUILTIN_RULES)
    }

    /// Parse and validate rules from TOML text
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        let config: RulesConfig = toml::from_str(contents)?;
        config.validate().map_err(SkirmishError::ConfigError)?;
        Ok(config)
    }

    /// Load rules from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    /// Validate configuration for internal consistency
    pub fn validate(&self) -> std::result::Result<(), String> {
        if self.base_movement_cost == 0 {
            return Err("base_movement_cost must be positive".into());
        }

        if self.hit_die.sides == 0 || self.hit_die.count == 0 {
            return Err(format!("hit_die ({}) must roll at least one die", self.hit_die));
        }
        if self.hit_die.count > MAX_DICE_PER_ROLL || self.hit_die.sides > MAX_DIE_SIDES {
            return Err(format!(
                "hit_die ({}) is larger than {}d{}",
                self.hit_die, MAX_DICE_PER_ROLL, MAX_DIE_SIDES
            ));
        }

        // A threshold above the maximum total would make non-critical hits impossible
        if self.hit_threshold > self.hit_die.max_total() {
            return Err(format!(
                "hit_threshold ({}) exceeds the maximum roll of {} ({})",
                self.hit_threshold,
                self.hit_die,
                self.hit_die.max_total()
            ));
        }

        Ok(())
    }
}
