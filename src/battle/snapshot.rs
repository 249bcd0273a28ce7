//! Read-only views handed to the presentation layer

use serde::Serialize;

use crate::battle::execution::{BattleState, TurnState};
use crate::battle::hex::Cell;
use crate::battle::path::Path;
use crate::core::types::{Side, Turn};

/// Battle state after a committed operation
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BattleSnapshot {
    pub player_pos: Cell,
    pub enemy_pos: Cell,
    pub player_hp: u32,
    pub player_max_hp: u32,
    pub enemy_hp: u32,
    pub enemy_max_hp: u32,
    pub movement_budget: u32,
    pub movement_budget_max: u32,
    pub player_mana: u32,
    pub player_max_mana: u32,
    pub enemy_mana: u32,
    pub has_acted_this_turn: bool,
    pub turn: Turn,
    pub turn_state: TurnState,
    pub winner: Option<Side>,
    pub selected_action: Option<String>,
    pub selected_target: Option<Cell>,
    pub log: Vec<String>,
}

impl BattleSnapshot {
    pub fn from_state(state: &BattleState) -> Self {
        Self {
            player_pos: state.player.position,
            enemy_pos: state.enemy.position,
            player_hp: state.player.hp,
            player_max_hp: state.player.max_hp,
            enemy_hp: state.enemy.hp,
            enemy_max_hp: state.enemy.max_hp,
            movement_budget: state.player.movement_budget,
            movement_budget_max: state.player.movement_budget_max,
            player_mana: state.player.mana,
            player_max_mana: state.player.max_mana,
            enemy_mana: state.enemy.mana,
            has_acted_this_turn: state.player.has_acted_this_turn,
            turn: state.turn,
            turn_state: state.turn_state,
            winner: state.winner(),
            selected_action: state.selected_action.clone(),
            selected_target: state.selected_target,
            log: state.battle_log.descriptions(),
        }
    }
}

/// Highlight sets for the selected action
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TargetingPreview {
    pub action: String,
    pub range: u32,
    /// Cells the action may target, row-major
    pub valid_targets: Vec<Cell>,
    /// Cells the selected target's area covers, row-major; empty with no target
    pub aoe_preview: Vec<Cell>,
}

/// A planned move that has not been committed
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PathPreview {
    pub path: Path,
    pub cost: u32,
    pub remaining_budget: u32,
    /// False when the budget or the opponent cut the path short
    pub reaches_destination: bool,
}
