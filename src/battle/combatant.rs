//! The two fighters of a battle
//!
//! Only the combat resolver mutates a `Combatant`; the methods here are the
//! bookkeeping primitives it uses.

use serde::{Deserialize, Serialize};

use crate::battle::actions::Action;
use crate::battle::hex::Cell;
use crate::core::types::Side;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Combatant {
    pub name: String,
    pub side: Side,
    pub position: Cell,
    pub hp: u32,
    pub max_hp: u32,
    /// Movement points left this turn
    pub movement_budget: u32,
    pub movement_budget_max: u32,
    pub mana: u32,
    pub max_mana: u32,
    pub has_acted_this_turn: bool,
    /// Turns this combatant still has to skip
    pub disabled_turns: u32,
    /// Abilities in declared order
    pub abilities: Vec<Action>,
}

impl Combatant {
    pub fn new(name: impl Into<String>, side: Side, position: Cell, max_hp: u32, speed: u32, max_mana: u32) -> Self {
        Self {
            name: name.into(),
            side,
            position,
            hp: max_hp,
            max_hp,
            movement_budget: speed,
            movement_budget_max: speed,
            mana: max_mana,
            max_mana,
            has_acted_this_turn: false,
            disabled_turns: 0,
            abilities: Vec::new(),
        }
    }

    pub fn with_abilities(mut self, abilities: Vec<Action>) -> Self {
        self.abilities = abilities;
        self
    }

    pub fn ability(&self, name: &str) -> Option<&Action> {
        self.abilities.iter().find(|a| a.name().eq_ignore_ascii_case(name))
    }

    pub fn is_defeated(&self) -> bool {
        self.hp == 0
    }

    pub fn is_disabled(&self) -> bool {
        self.disabled_turns > 0
    }

    /// Subtract damage, floored at zero; returns hp actually lost
    pub fn take_damage(&mut self, amount: u32) -> u32 {
        let lost = amount.min(self.hp);
        self.hp -= lost;
        lost
    }

    /// Add hp, capped at max; returns hp actually restored
    pub fn heal(&mut self, amount: u32) -> u32 {
        let restored = amount.min(self.max_hp - self.hp);
        self.hp += restored;
        restored
    }

    /// Restore mana, capped at max; returns mana actually restored
    pub fn regenerate_mana(&mut self, amount: u32) -> u32 {
        let restored = amount.min(self.max_mana.saturating_sub(self.mana));
        self.mana += restored;
        restored
    }

    /// Fresh movement budget and action for a new turn
    pub fn reset_turn(&mut self) {
        self.movement_budget = self.movement_budget_max;
        self.has_acted_this_turn = false;
    }

    pub fn hp_percent(&self) -> u32 {
        if self.max_hp == 0 {
            return 0;
        }
        self.hp * 100 / self.max_hp
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fighter() -> Combatant {
        Combatant::new("Wizard", Side::Player, Cell::new(2, 5), 100, 30, 30)
    }

    #[test]
    fn test_damage_floors_at_zero() {
        let mut c = fighter();
        assert_eq!(c.take_damage(30), 30);
        assert_eq!(c.take_damage(500), 70);
        assert_eq!(c.hp, 0);
        assert!(c.is_defeated());
    }

    #[test]
    fn test_heal_caps_at_max() {
        let mut c = fighter();
        c.take_damage(4);
        assert_eq!(c.heal(10), 4);
        assert_eq!(c.hp, 100);
    }

    #[test]
    fn test_mana_regen_caps() {
        let mut c = fighter();
        c.mana = 27;
        assert_eq!(c.regenerate_mana(5), 3);
        assert_eq!(c.mana, 30);
    }

    #[test]
    fn test_reset_turn() {
        let mut c = fighter();
        c.movement_budget = 5;
        c.has_acted_this_turn = true;
        c.reset_turn();
        assert_eq!(c.movement_budget, 30);
        assert!(!c.has_acted_this_turn);
    }
}
