//! Battle content loaded from TOML
//!
//! The player loadout, the race and class tables, the enemy roster and the
//! battlefields ship embedded in the binary and can be replaced file by
//! file from a data directory.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use crate::battle::actions::Action;
use crate::battle::combatant::Combatant;
use crate::battle::constants::{
    CHARACTER_BASE_MANA, DEFAULT_CLASS, DEFAULT_GRID_COLS, DEFAULT_GRID_ROWS, DEFAULT_HEX_SIZE,
    DEFAULT_RACE, PLAYER_HP, PLAYER_MANA, PLAYER_SPEED,
};
use crate::battle::execution::BattleState;
use crate::battle::hex::{Cell, GridBounds};
use crate::battle::terrain::{Terrain, TerrainProfile};
use crate::core::config::{RulesConfig, BUILTIN_RULES};
use crate::core::error::{Result, SkirmishError};
use crate::core::types::Side;

const BUILTIN_ABILITIES: &str = include_str!("../../data/abilities.toml");
const BUILTIN_CHARACTERS: &str = include_str!("../../data/characters.toml");
const BUILTIN_ENEMIES: &str = include_str!("../../data/enemies.toml");
const BUILTIN_BATTLEFIELDS: &str = include_str!("../../data/battlefields.toml");

/// Player stat block
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerProfile {
    pub name: String,
    pub hp: u32,
    /// Movement budget per turn
    pub speed: u32,
    pub mana: u32,
}

impl Default for PlayerProfile {
    fn default() -> Self {
        Self {
            name: "Wizard".to_string(),
            hp: PLAYER_HP,
            speed: PLAYER_SPEED,
            mana: PLAYER_MANA,
        }
    }
}

impl PlayerProfile {
    /// Stat block of a race and class pairing
    pub fn from_character(race: &RaceProfile, class: &ClassProfile) -> Self {
        Self {
            name: format!("{} {}", race.name, class.name),
            hp: race.base_hp + class.hp_bonus,
            speed: PLAYER_SPEED,
            mana: CHARACTER_BASE_MANA + 2 * race.intelligence + race.wisdom,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RaceProfile {
    pub name: String,
    pub base_hp: u32,
    #[serde(default)]
    pub intelligence: u32,
    #[serde(default)]
    pub wisdom: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassProfile {
    pub name: String,
    #[serde(default)]
    pub hp_bonus: u32,
}

/// Contents of `characters.toml`
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CharacterTables {
    #[serde(rename = "race", default)]
    pub races: BTreeMap<String, RaceProfile>,
    #[serde(rename = "class", default)]
    pub classes: BTreeMap<String, ClassProfile>,
}

/// Contents of `abilities.toml`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerLoadout {
    #[serde(default)]
    pub player: PlayerProfile,
    #[serde(rename = "ability", default)]
    pub abilities: Vec<Action>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnemyProfile {
    pub name: String,
    pub hp: u32,
    pub speed: u32,
    #[serde(default)]
    pub mana: u32,
    /// Tried in this order
    pub abilities: Vec<Action>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
}

impl Difficulty {
    /// Enemy ids this difficulty draws from
    pub fn candidates(&self) -> &'static [&'static str] {
        match self {
            Difficulty::Easy => &["goblin"],
            Difficulty::Medium => &["goblin", "orc"],
            Difficulty::Hard => &["orc"],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BattlefieldConfig {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default = "default_cols")]
    pub cols: u32,
    #[serde(default = "default_rows")]
    pub rows: u32,
    /// Pixels; rendering only
    #[serde(default = "default_hex_size")]
    pub hex_size: u32,
    #[serde(default)]
    pub terrain: Terrain,
    #[serde(default)]
    pub movement_multiplier: Option<f32>,
    pub player_start: Cell,
    pub enemy_start: Cell,
    #[serde(default)]
    pub difficulty: Difficulty,
}

fn default_cols() -> u32 {
    DEFAULT_GRID_COLS
}

fn default_rows() -> u32 {
    DEFAULT_GRID_ROWS
}

fn default_hex_size() -> u32 {
    DEFAULT_HEX_SIZE
}

impl BattlefieldConfig {
    pub fn bounds(&self) -> GridBounds {
        GridBounds::new(self.cols, self.rows)
    }

    /// Terrain profile, honoring an explicit multiplier override
    pub fn terrain_profile(&self) -> Result<TerrainProfile> {
        match self.movement_multiplier {
            None => Ok(self.terrain.profile()),
            Some(m) => TerrainProfile::new(m).ok_or_else(|| {
                SkirmishError::ConfigError(format!("{}: invalid movement multiplier {}", self.name, m))
            }),
        }
    }

    fn validate(&self, id: &str) -> std::result::Result<(), String> {
        let bounds = self.bounds();
        if bounds.cell_count() == 0 {
            return Err(format!("battlefield {}: empty grid", id));
        }
        for (label, cell) in [("player_start", self.player_start), ("enemy_start", self.enemy_start)] {
            if !bounds.contains(cell) {
                return Err(format!("battlefield {}: {} {} is off the grid", id, label, cell));
            }
        }
        if self.player_start == self.enemy_start {
            return Err(format!("battlefield {}: both sides start on {}", id, self.player_start));
        }
        Ok(())
    }
}

/// Everything needed to set up a battle
#[derive(Debug, Clone, PartialEq)]
pub struct ContentLibrary {
    pub rules: RulesConfig,
    pub loadout: PlayerLoadout,
    pub characters: CharacterTables,
    pub enemies: BTreeMap<String, EnemyProfile>,
    pub battlefields: BTreeMap<String, BattlefieldConfig>,
}

impl ContentLibrary {
    /// Content embedded at build time
    pub fn builtin() -> Result<Self> {
        Self::from_toml_strs(
            BUILTIN_RULES,
            BUILTIN_ABILITIES,
            BUILTIN_CHARACTERS,
            BUILTIN_ENEMIES,
            BUILTIN_BATTLEFIELDS,
        )
    }

    /// Load from `dir`; files that are absent fall back to the built-in ones
    pub fn load_dir(dir: &Path) -> Result<Self> {
        let read = |file: &str, builtin: &str| -> Result<String> {
            let path = dir.join(file);
            if path.exists() {
                tracing::debug!("Loading {}", path.display());
                Ok(fs::read_to_string(&path)?)
            } else {
                Ok(builtin.to_string())
            }
        };
        Self::from_toml_strs(
            &read("rules.toml", BUILTIN_RULES)?,
            &read("abilities.toml", BUILTIN_ABILITIES)?,
            &read("characters.toml", BUILTIN_CHARACTERS)?,
            &read("enemies.toml", BUILTIN_ENEMIES)?,
            &read("battlefields.toml", BUILTIN_BATTLEFIELDS)?,
        )
    }

    pub fn from_toml_strs(
        rules: &str,
        abilities: &str,
        characters: &str,
        enemies: &str,
        battlefields: &str,
    ) -> Result<Self> {
        let library = Self {
            rules: RulesConfig::from_toml_str(rules)?,
            loadout: toml::from_str(abilities)?,
            characters: toml::from_str(characters)?,
            enemies: toml::from_str(enemies)?,
            battlefields: toml::from_str(battlefields)?,
        };
        library.validate().map_err(SkirmishError::ConfigError)?;
        Ok(library)
    }

    fn validate(&self) -> std::result::Result<(), String> {
        for (id, field) in &self.battlefields {
            field.validate(id)?;
        }
        for (id, enemy) in &self.enemies {
            if enemy.abilities.is_empty() {
                return Err(format!("enemy {}: no abilities", id));
            }
        }
        for (id, race) in &self.characters.races {
            if race.base_hp == 0 {
                return Err(format!("race {}: base_hp must be positive", id));
            }
        }
        Ok(())
    }

    pub fn battlefield(&self, id: &str) -> Result<&BattlefieldConfig> {
        self.battlefields
            .get(id)
            .ok_or_else(|| SkirmishError::ConfigError(format!("unknown battlefield {:?}", id)))
    }

    pub fn enemy(&self, id: &str) -> Result<&EnemyProfile> {
        self.enemies
            .get(id)
            .ok_or_else(|| SkirmishError::ConfigError(format!("unknown enemy {:?}", id)))
    }

    /// Enemy id for a difficulty; medium draws from the seed
    pub fn enemy_for_difficulty(&self, difficulty: Difficulty, seed: u64) -> Result<&str> {
        let candidates: Vec<&str> = difficulty
            .candidates()
            .iter()
            .copied()
            .filter(|id| self.enemies.contains_key(*id))
            .collect();
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let chosen = candidates
            .choose(&mut rng)
            .ok_or_else(|| SkirmishError::ConfigError(format!("no enemy available for {:?}", difficulty)))?;
        let (id, _) = self
            .enemies
            .get_key_value(*chosen)
            .ok_or_else(|| SkirmishError::ConfigError(format!("unknown enemy {:?}", chosen)))?;
        Ok(id.as_str())
    }

    /// Player stat block for a race and class
    ///
    /// Ids are case-insensitive. With neither given the loadout's `[player]`
    /// block is used; with only one the other defaults to human or warrior.
    pub fn player_profile(&self, race_id: Option<&str>, class_id: Option<&str>) -> Result<PlayerProfile> {
        if race_id.is_none() && class_id.is_none() {
            return Ok(self.loadout.player.clone());
        }
        let race_id = race_id.unwrap_or(DEFAULT_RACE).to_lowercase();
        let class_id = class_id.unwrap_or(DEFAULT_CLASS).to_lowercase();
        let race = self
            .characters
            .races
            .get(&race_id)
            .ok_or_else(|| SkirmishError::ConfigError(format!("unknown race {:?}", race_id)))?;
        let class = self
            .characters
            .classes
            .get(&class_id)
            .ok_or_else(|| SkirmishError::ConfigError(format!("unknown class {:?}", class_id)))?;
        Ok(PlayerProfile::from_character(race, class))
    }

    /// Set up a fresh battle on `battlefield_id` with the loadout's player
    ///
    /// `enemy_id` overrides the difficulty-based choice.
    pub fn build_battle(&self, battlefield_id: &str, enemy_id: Option<&str>, seed: u64) -> Result<BattleState> {
        self.build_battle_as(battlefield_id, &self.loadout.player, enemy_id, seed)
    }

    /// Set up a fresh battle with an explicit player stat block
    pub fn build_battle_as(
        &self,
        battlefield_id: &str,
        player_profile: &PlayerProfile,
        enemy_id: Option<&str>,
        seed: u64,
    ) -> Result<BattleState> {
        let field = self.battlefield(battlefield_id)?;
        let enemy_id = match enemy_id {
            Some(id) => id,
            None => self.enemy_for_difficulty(field.difficulty, seed)?,
        };
        let profile = self.enemy(enemy_id)?;

        let player = Combatant::new(
            player_profile.name.clone(),
            Side::Player,
            field.player_start,
            player_profile.hp,
            player_profile.speed,
            player_profile.mana,
        )
        .with_abilities(self.loadout.abilities.clone());

        let enemy = Combatant::new(
            profile.name.clone(),
            Side::Enemy,
            field.enemy_start,
            profile.hp,
            profile.speed,
            profile.mana,
        )
        .with_abilities(profile.abilities.clone());

        tracing::info!(
            battlefield = battlefield_id,
            enemy = enemy_id,
            player = %player_profile.name,
            terrain = field.terrain.name(),
            "Battle set up"
        );
        Ok(BattleState::new(
            field.bounds(),
            field.terrain_profile()?,
            self.rules.clone(),
            player,
            enemy,
        ))
    }
}
