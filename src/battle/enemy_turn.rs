//! Enemy turn controller
//!
//! Asks the configured policy what to do, checks the answer, and carries it
//! out through the resolver: attack if something reaches, otherwise step
//! toward the player and attack if that brought them into range. A policy
//! that errors or answers with an illegal move is replaced by the local
//! rules for that turn.

use serde::Serialize;

use crate::battle::ai::{EnemyDecision, EnemyPolicy, LocalEnemyPolicy, PolicyView};
use crate::battle::error::CombatError;
use crate::battle::hex::Cell;
use crate::battle::pathfinding::compute_budget_limited_path;
use crate::battle::resolver::{ActionOutcome, CombatResolver};

/// Who decided the enemy's turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DecisionSource {
    Policy,
    Fallback,
    /// Enemy was held and lost the turn
    Disabled,
}

/// What the enemy did
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EnemyTurnReport {
    pub source: DecisionSource,
    pub decision: Option<EnemyDecision>,
    pub moved_to: Option<Cell>,
    pub attack: Option<ActionOutcome>,
}

impl EnemyTurnReport {
    fn new(source: DecisionSource, decision: Option<EnemyDecision>) -> Self {
        Self {
            source,
            decision,
            moved_to: None,
            attack: None,
        }
    }
}

pub struct EnemyTurnController {
    policy: Option<Box<dyn EnemyPolicy + Send>>,
    fallback: LocalEnemyPolicy,
}

impl Default for EnemyTurnController {
    fn default() -> Self {
        Self::local()
    }
}

impl EnemyTurnController {
    /// Rules-based enemy only
    pub fn local() -> Self {
        Self {
            policy: None,
            fallback: LocalEnemyPolicy::new(),
        }
    }

    /// Consult `policy` first, falling back to the local rules
    pub fn with_policy(policy: impl EnemyPolicy + Send + 'static) -> Self {
        Self {
            policy: Some(Box::new(policy)),
            fallback: LocalEnemyPolicy::new(),
        }
    }

    pub fn policy_name(&self) -> &str {
        match &self.policy {
            Some(policy) => policy.name(),
            None => self.fallback.name(),
        }
    }

    /// Play the enemy's turn; the resolver must be in `EnemyTurn`
    pub fn take_turn(&mut self, resolver: &mut CombatResolver) -> EnemyTurnReport {
        match resolver.skip_disabled_enemy_turn() {
            Ok(true) => return EnemyTurnReport::new(DecisionSource::Disabled, None),
            Ok(false) => {}
            Err(e) => {
                tracing::warn!("Enemy turn requested out of turn: {}", e);
                return EnemyTurnReport::new(DecisionSource::Fallback, None);
            }
        }

        let view = PolicyView::from_state(resolver.state());
        let proposed = self.policy.as_mut().map(|policy| {
            policy
                .decide(&view)
                .map_err(|e| e.to_string())
                .and_then(|decision| view.validate(&decision).map(|_| decision))
        });

        match proposed {
            Some(Ok(decision)) => {
                tracing::info!(policy = self.policy_name(), ?decision, "Enemy policy decided");
                match self.execute(resolver, &view, decision.clone(), DecisionSource::Policy) {
                    Ok(report) => return report,
                    Err(e) => tracing::warn!("Policy decision failed, using local rules: {}", e),
                }
            }
            Some(Err(reason)) => {
                tracing::warn!(policy = self.policy_name(), "Policy unusable, using local rules: {}", reason);
            }
            None => {}
        }

        let decision = self.fallback.choose(&view);
        tracing::debug!(?decision, "Local enemy decision");
        match self.execute(resolver, &view, decision.clone(), DecisionSource::Fallback) {
            Ok(report) => report,
            Err(e) => {
                tracing::warn!("Local enemy decision rejected: {}", e);
                EnemyTurnReport::new(DecisionSource::Fallback, Some(decision))
            }
        }
    }

    fn execute(
        &self,
        resolver: &mut CombatResolver,
        view: &PolicyView,
        decision: EnemyDecision,
        source: DecisionSource,
    ) -> Result<EnemyTurnReport, CombatError> {
        let mut report = EnemyTurnReport::new(source, Some(decision.clone()));

        match decision {
            EnemyDecision::Attack { ability, target } => {
                let target = target.unwrap_or(view.player.position);
                report.attack = Some(resolver.enemy_attack(&ability, target)?);
            }
            EnemyDecision::Move { target } => {
                let mut path = compute_budget_limited_path(
                    &view.bounds,
                    view.enemy.position,
                    target,
                    view.enemy.movement_budget,
                    view.step_cost,
                    Some(view.player.position),
                );
                path.truncate_steps(view.steps_per_turn as usize);
                if path.steps() > 0 {
                    report.moved_to = Some(resolver.enemy_move(&path)?.to);
                }

                // Re-check range from the new cell
                let after = PolicyView::from_state(resolver.state());
                if !resolver.state().is_finished() {
                    if let Some(ability) = after.first_ability_in_range() {
                        report.attack = Some(resolver.enemy_attack(&ability.name, after.player.position)?);
                    }
                }
            }
        }
        Ok(report)
    }
}
