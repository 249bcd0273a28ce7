//! Rules-based enemy policy
//!
//! Attack with the first ability that reaches the player, otherwise close
//! the distance. Deterministic, never fails, and doubles as the fallback
//! whenever another policy errors or proposes something illegal.

use crate::battle::ai::{EnemyDecision, EnemyPolicy, PolicyView};
use crate::battle::pathfinding::compute_budget_limited_path;
use crate::core::error::Result;

#[derive(Debug, Clone, Copy, Default)]
pub struct LocalEnemyPolicy;

impl LocalEnemyPolicy {
    pub fn new() -> Self {
        Self
    }

    pub fn choose(&self, view: &PolicyView) -> EnemyDecision {
        if let Some(ability) = view.first_ability_in_range() {
            return EnemyDecision::Attack {
                ability: ability.name.clone(),
                target: Some(view.player.position),
            };
        }

        let mut path = compute_budget_limited_path(
            &view.bounds,
            view.enemy.position,
            view.player.position,
            view.enemy.movement_budget,
            view.step_cost,
            Some(view.player.position),
        );
        path.truncate_steps(view.steps_per_turn as usize);
        EnemyDecision::Move {
            target: path.destination(),
        }
    }
}

impl EnemyPolicy for LocalEnemyPolicy {
    fn name(&self) -> &str {
        "local"
    }

    fn decide(&mut self, view: &PolicyView) -> Result<EnemyDecision> {
        Ok(self.choose(view))
    }
}
