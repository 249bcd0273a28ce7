//! Battle state and event log
//!
//! Turn cycle: PlayerMove <-> PlayerAction -> EnemyTurn -> PlayerMove.
//! Either combatant reaching 0 hp ends the battle for good.

use serde::{Deserialize, Serialize};

use crate::battle::combatant::Combatant;
use crate::battle::constants::FIRST_TURN;
use crate::battle::hex::{Cell, GridBounds};
use crate::battle::terrain::TerrainProfile;
use crate::core::config::RulesConfig;
use crate::core::types::{BattleId, Side, Turn};

/// Turn state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum TurnState {
    #[default]
    PlayerMove, // Moving, nothing selected
    PlayerAction, // Ability selected, choosing a target
    EnemyTurn,
    BattleOver { winner: Side },
}

impl TurnState {
    pub fn is_player_phase(&self) -> bool {
        matches!(self, TurnState::PlayerMove | TurnState::PlayerAction)
    }
}

/// Log entry for battle events
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BattleEvent {
    pub turn: Turn,
    pub event_type: BattleEventType,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum BattleEventType {
    BattleStarted,
    Moved { side: Side, to: Cell },
    ActionResolved { side: Side, ability: String, hit: bool, critical: bool },
    Repositioned { side: Side, to: Cell },
    Disabled { side: Side, turns: u32 },
    TurnSkipped { side: Side },
    TurnEnded { side: Side },
    TurnStarted,
    BattleEnded { winner: Side },
}

/// Ordered log of what happened, for the presentation layer
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BattleEventLog {
    pub events: Vec<BattleEvent>,
}

impl BattleEventLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, event_type: BattleEventType, description: String, turn: Turn) {
        self.events.push(BattleEvent {
            turn,
            event_type,
            description,
        });
    }

    pub fn descriptions(&self) -> Vec<String> {
        self.events.iter().map(|e| e.description.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn last(&self) -> Option<&BattleEvent> {
        self.events.last()
    }
}

/// Complete battle state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BattleState {
    pub id: BattleId,

    // Battlefield
    pub bounds: GridBounds,
    pub terrain: TerrainProfile,
    pub rules: RulesConfig,

    // Fighters
    pub player: Combatant,
    pub enemy: Combatant,

    // Time
    pub turn: Turn,
    pub turn_state: TurnState,

    // Player targeting
    pub selected_action: Option<String>,
    pub selected_target: Option<Cell>,

    // Log
    pub battle_log: BattleEventLog,
}

impl BattleState {
    pub fn new(
        bounds: GridBounds,
        terrain: TerrainProfile,
        rules: RulesConfig,
        player: Combatant,
        enemy: Combatant,
    ) -> Self {
        let mut state = Self {
            id: BattleId::new(),
            bounds,
            terrain,
            rules,
            player,
            enemy,
            turn: FIRST_TURN,
            turn_state: TurnState::PlayerMove,
            selected_action: None,
            selected_target: None,
            battle_log: BattleEventLog::new(),
        };
        let description = format!(
            "{} faces {} on a {}x{} field",
            state.player.name, state.enemy.name, bounds.cols, bounds.rows
        );
        state.log_event(BattleEventType::BattleStarted, description);
        state
    }

    pub fn combatant(&self, side: Side) -> &Combatant {
        match side {
            Side::Player => &self.player,
            Side::Enemy => &self.enemy,
        }
    }

    pub fn combatant_mut(&mut self, side: Side) -> &mut Combatant {
        match side {
            Side::Player => &mut self.player,
            Side::Enemy => &mut self.enemy,
        }
    }

    /// Movement points per hex step on this battlefield
    pub fn step_cost(&self) -> f64 {
        self.terrain.step_cost(self.rules.base_movement_cost)
    }

    pub fn is_finished(&self) -> bool {
        matches!(self.turn_state, TurnState::BattleOver { .. })
    }

    pub fn winner(&self) -> Option<Side> {
        match self.turn_state {
            TurnState::BattleOver { winner } => Some(winner),
            _ => None,
        }
    }

    /// Is `cell` free for `side` to stand on?
    pub fn is_free_for(&self, side: Side, cell: Cell) -> bool {
        self.bounds.contains(cell) && self.combatant(side.opponent()).position != cell
    }

    /// Log a battle event
    pub fn log_event(&mut self, event_type: BattleEventType, description: String) {
        self.battle_log.push(event_type, description, self.turn);
    }

    /// End the battle if either side is down; returns the winner
    pub fn check_defeat(&mut self) -> Option<Side> {
        if let Some(winner) = self.winner() {
            return Some(winner);
        }
        let winner = if self.enemy.is_defeated() {
            Side::Player
        } else if self.player.is_defeated() {
            Side::Enemy
        } else {
            return None;
        };

        self.turn_state = TurnState::BattleOver { winner };
        self.selected_action = None;
        self.selected_target = None;
        let loser = self.combatant(winner.opponent()).name.clone();
        self.log_event(
            BattleEventType::BattleEnded { winner },
            format!("{} is defeated, {} wins", loser, winner),
        );
        tracing::info!(battle = %self.id.0, %winner, turn = self.turn, "Battle over");
        Some(winner)
    }
}
