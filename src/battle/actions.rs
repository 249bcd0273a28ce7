//! Attacks and spells a combatant can use
//!
//! Special effects are variants, not names: the resolver dispatches on
//! `SpellEffect` and never compares ability names.

use serde::{Deserialize, Serialize};

use crate::dice::DiceNotation;

/// A selectable ability, immutable once chosen for a turn
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Action {
    Attack(AttackProfile),
    Spell(SpellProfile),
}

/// Weapon attack; never costs mana
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttackProfile {
    pub name: String,
    pub damage: DiceNotation,
    /// Range in hex steps
    pub range: u32,
    #[serde(default)]
    pub aoe_radius: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpellProfile {
    pub name: String,
    pub effect: SpellEffect,
    pub range: u32,
    #[serde(default)]
    pub aoe_radius: u32,
    pub mana_cost: u32,
    /// Spell level, display only
    #[serde(default = "default_spell_level")]
    pub level: u32,
}

fn default_spell_level() -> u32 {
    1
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SpellEffect {
    /// Damage the opponent if it stands in the area
    Damage { dice: DiceNotation },
    /// Restore the caster's hp
    Healing { dice: DiceNotation },
    /// Teleport the caster to a free cell, no hit roll
    Reposition { max_range: u32 },
    /// Opponent loses its next turns if hit
    Disable { turns: u32 },
}

impl Action {
    pub fn name(&self) -> &str {
        match self {
            Action::Attack(a) => &a.name,
            Action::Spell(s) => &s.name,
        }
    }

    /// Effective targeting range
    pub fn range(&self) -> u32 {
        match self {
            Action::Attack(a) => a.range,
            Action::Spell(s) => match s.effect {
                SpellEffect::Reposition { max_range } => s.range.min(max_range),
                _ => s.range,
            },
        }
    }

    pub fn aoe_radius(&self) -> u32 {
        match self {
            Action::Attack(a) => a.aoe_radius,
            Action::Spell(s) => s.aoe_radius,
        }
    }

    pub fn mana_cost(&self) -> u32 {
        match self {
            Action::Attack(_) => 0,
            Action::Spell(s) => s.mana_cost,
        }
    }

    /// What the action does when it lands; attacks are plain damage
    pub fn effect(&self) -> SpellEffect {
        match self {
            Action::Attack(a) => SpellEffect::Damage { dice: a.damage },
            Action::Spell(s) => s.effect,
        }
    }

    pub fn is_spell(&self) -> bool {
        matches!(self, Action::Spell(_))
    }

    /// Does the action need a hit check before its effect applies?
    pub fn rolls_to_hit(&self) -> bool {
        !matches!(self.effect(), SpellEffect::Reposition { .. })
    }

    /// One-line catalog entry, e.g. "Ice Knife (spell, 1d6+2, range 2, aoe 1, 5 mana)"
    pub fn summary(&self) -> String {
        let effect = match self.effect() {
            SpellEffect::Damage { dice } => dice.to_string(),
            SpellEffect::Healing { dice } => format!("heal {}", dice),
            SpellEffect::Reposition { .. } => "teleport".to_string(),
            SpellEffect::Disable { turns } => format!("disable {} turn(s)", turns),
        };
        let mut line = format!(
            "{} ({}, {}, range {}",
            self.name(),
            if self.is_spell() { "spell" } else { "attack" },
            effect,
            self.range()
        );
        if self.aoe_radius() > 0 {
            line.push_str(&format!(", aoe {}", self.aoe_radius()));
        }
        if self.mana_cost() > 0 {
            line.push_str(&format!(", {} mana", self.mana_cost()));
        }
        line.push(')');
        line
    }
}

impl AttackProfile {
    pub fn new(name: impl Into<String>, damage: DiceNotation, range: u32) -> Self {
        Self {
            name: name.into(),
            damage,
            range,
            aoe_radius: 0,
        }
    }

    pub fn with_aoe(mut self, radius: u32) -> Self {
        self.aoe_radius = radius;
        self
    }
}

impl SpellProfile {
    pub fn new(name: impl Into<String>, effect: SpellEffect, range: u32, mana_cost: u32) -> Self {
        Self {
            name: name.into(),
            effect,
            range,
            aoe_radius: 0,
            mana_cost,
            level: 1,
        }
    }

    pub fn with_aoe(mut self, radius: u32) -> Self {
        self.aoe_radius = radius;
        self
    }
}

impl From<AttackProfile> for Action {
    fn from(profile: AttackProfile) -> Self {
        Action::Attack(profile)
    }
}

impl From<SpellProfile> for Action {
    fn from(profile: SpellProfile) -> Self {
        Action::Spell(profile)
    }
}
