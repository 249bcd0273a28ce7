//! Enemy decision-making
//!
//! Architecture: trait + validated decisions
//! - `EnemyPolicy` is the swappable brain (local rules or an LLM)
//! - `PolicyView` is the read-only battle summary a policy sees
//! - `EnemyTurnController` checks every decision before executing it

pub mod llm_gateway;
pub mod local;

use serde::{Deserialize, Serialize};

use crate::battle::execution::BattleState;
use crate::battle::hex::{Cell, GridBounds};
use crate::battle::pathfinding::find_path;
use crate::core::error::Result;
use crate::core::types::Turn;

pub use llm_gateway::LlmEnemyPolicy;
pub use local::LocalEnemyPolicy;

/// What the enemy wants to do this turn
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "lowercase")]
pub enum EnemyDecision {
    /// Walk toward `target`, as far as the turn allows
    Move { target: Cell },
    /// Use an ability; the target defaults to the player's cell
    Attack {
        ability: String,
        #[serde(default)]
        target: Option<Cell>,
    },
}

/// Trait for enemy policy implementations
pub trait EnemyPolicy {
    fn name(&self) -> &str;

    /// Decide the enemy's turn; errors make the controller fall back
    fn decide(&mut self, view: &PolicyView) -> Result<EnemyDecision>;
}

/// One side as a policy sees it
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FighterView {
    pub name: String,
    pub position: Cell,
    pub hp: u32,
    pub max_hp: u32,
    pub movement_budget: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AbilityView {
    pub name: String,
    pub range: u32,
    pub aoe_radius: u32,
    pub summary: String,
}

/// Read-only battle summary for the enemy's decision
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PolicyView {
    pub turn: Turn,
    pub bounds: GridBounds,
    pub step_cost: f64,
    pub steps_per_turn: u32,
    pub enemy: FighterView,
    pub player: FighterView,
    pub distance: u32,
    /// Enemy abilities in declared order
    pub abilities: Vec<AbilityView>,
}

impl PolicyView {
    pub fn from_state(state: &BattleState) -> Self {
        let fighter = |c: &crate::battle::combatant::Combatant| FighterView {
            name: c.name.clone(),
            position: c.position,
            hp: c.hp,
            max_hp: c.max_hp,
            movement_budget: c.movement_budget,
        };
        Self {
            turn: state.turn,
            bounds: state.bounds,
            step_cost: state.step_cost(),
            steps_per_turn: state.rules.enemy_steps_per_turn,
            enemy: fighter(&state.enemy),
            player: fighter(&state.player),
            distance: state.enemy.position.distance(&state.player.position),
            abilities: state
                .enemy
                .abilities
                .iter()
                .map(|a| AbilityView {
                    name: a.name().to_string(),
                    range: a.range(),
                    aoe_radius: a.aoe_radius(),
                    summary: a.summary(),
                })
                .collect(),
        }
    }

    pub fn ability(&self, name: &str) -> Option<&AbilityView> {
        self.abilities.iter().find(|a| a.name.eq_ignore_ascii_case(name))
    }

    /// First ability, in declared order, that reaches the player from here
    pub fn first_ability_in_range(&self) -> Option<&AbilityView> {
        self.abilities.iter().find(|a| self.distance <= a.range)
    }

    /// Check a decision against the rules; Err carries the reason
    pub fn validate(&self, decision: &EnemyDecision) -> std::result::Result<(), String> {
        match decision {
            EnemyDecision::Attack { ability, target } => {
                let view = self
                    .ability(ability)
                    .ok_or_else(|| format!("unknown ability {:?}", ability))?;
                let target = target.unwrap_or(self.player.position);
                if !self.bounds.contains(target) {
                    return Err(format!("target {} is off the grid", target));
                }
                if self.enemy.position.distance(&target) > view.range {
                    return Err(format!("target {} is out of range for {}", target, view.name));
                }
                if target.distance(&self.player.position) > view.aoe_radius {
                    return Err(format!("attack on {} cannot reach the player", target));
                }
                Ok(())
            }
            EnemyDecision::Move { target } => {
                let target = *target;
                if !self.bounds.contains(target) {
                    return Err(format!("destination {} is off the grid", target));
                }
                if target == self.player.position {
                    return Err(format!("destination {} is occupied", target));
                }
                let path = find_path(&self.bounds, self.enemy.position, target, Some(self.player.position));
                if path.destination() != target {
                    return Err(format!("no path to {}", target));
                }
                Ok(())
            }
        }
    }
}
