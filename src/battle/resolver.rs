//! Combat resolution
//!
//! `CombatResolver` owns the `BattleState` and is the only thing that
//! mutates it. Every request is validated in full before anything changes,
//! so an `Err` always leaves the battle exactly as it was.

use serde::Serialize;

use crate::battle::actions::{Action, SpellEffect};
use crate::battle::enemy_turn::{EnemyTurnController, EnemyTurnReport};
use crate::battle::error::CombatError;
use crate::battle::execution::{BattleEventType, BattleState, TurnState};
use crate::battle::hex::Cell;
use crate::battle::path::Path;
use crate::battle::pathfinding::{compute_budget_limited_path, find_path};
use crate::battle::range::{cells_in_aoe, cells_within_range, is_in_range, sorted_cells};
use crate::battle::snapshot::{BattleSnapshot, PathPreview, TargetingPreview};
use crate::core::types::Side;
use crate::dice::{DiceNotation, DiceRoll, DiceRoller};

/// A committed move
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MoveOutcome {
    pub side: Side,
    pub from: Cell,
    pub to: Cell,
    pub steps: usize,
    pub cost: u32,
    pub remaining_budget: u32,
}

/// Everything that happened when an action resolved
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ActionOutcome {
    pub actor: Side,
    pub ability: String,
    pub target: Cell,
    /// None for actions that skip the hit check
    pub hit_roll: Option<DiceRoll>,
    pub hit: bool,
    pub critical: bool,
    pub effect_roll: Option<DiceRoll>,
    pub damage_dealt: u32,
    pub healing_done: u32,
    pub mana_spent: u32,
    pub repositioned_to: Option<Cell>,
    pub disabled_turns: u32,
    /// Area the action covered, row-major
    pub affected_cells: Vec<Cell>,
    pub winner: Option<Side>,
}

pub struct CombatResolver {
    state: BattleState,
    dice: Box<dyn DiceRoller + Send>,
}

impl CombatResolver {
    pub fn new(state: BattleState, dice: impl DiceRoller + Send + 'static) -> Self {
        Self {
            state,
            dice: Box::new(dice),
        }
    }

    pub fn state(&self) -> &BattleState {
        &self.state
    }

    pub fn into_state(self) -> BattleState {
        self.state
    }

    pub fn snapshot(&self) -> BattleSnapshot {
        BattleSnapshot::from_state(&self.state)
    }

    // ===== GATES =====

    fn ensure_player_turn(&self) -> Result<(), CombatError> {
        match self.state.turn_state {
            TurnState::BattleOver { .. } => Err(CombatError::BattleEnded),
            TurnState::EnemyTurn => Err(CombatError::OutOfTurn),
            TurnState::PlayerMove | TurnState::PlayerAction => {
                if self.state.player.is_disabled() {
                    Err(CombatError::Disabled)
                } else {
                    Ok(())
                }
            }
        }
    }

    fn ensure_enemy_turn(&self) -> Result<(), CombatError> {
        match self.state.turn_state {
            TurnState::BattleOver { .. } => Err(CombatError::BattleEnded),
            TurnState::EnemyTurn => Ok(()),
            TurnState::PlayerMove | TurnState::PlayerAction => Err(CombatError::OutOfTurn),
        }
    }

    // ===== MOVEMENT =====

    /// Best path toward `destination` the player can afford right now
    pub fn plan_path(&self, destination: Cell) -> Result<PathPreview, CombatError> {
        if self.state.is_finished() {
            return Err(CombatError::BattleEnded);
        }
        if !self.state.bounds.contains(destination) {
            return Err(CombatError::OutOfBounds(destination));
        }
        Ok(self.preview_path(Side::Player, destination))
    }

    /// Budget-limited path for either side, without validation
    pub fn preview_path(&self, side: Side, destination: Cell) -> PathPreview {
        let mover = self.state.combatant(side);
        let path = compute_budget_limited_path(
            &self.state.bounds,
            mover.position,
            destination,
            mover.movement_budget,
            self.state.step_cost(),
            Some(self.state.combatant(side.opponent()).position),
        );
        let cost = path.cost(self.state.step_cost());
        PathPreview {
            reaches_destination: path.destination() == destination,
            remaining_budget: mover.movement_budget.saturating_sub(cost),
            cost,
            path,
        }
    }

    /// Commit a player move along `path`
    pub fn confirm_move(&mut self, path: &Path) -> Result<MoveOutcome, CombatError> {
        self.ensure_player_turn()?;
        let cost = self.validate_move(Side::Player, path)?;
        Ok(self.commit_move(Side::Player, path, cost))
    }

    /// Move the player along the shortest path to `destination`
    ///
    /// Rejected outright if the full path is too expensive.
    pub fn move_to(&mut self, destination: Cell) -> Result<MoveOutcome, CombatError> {
        self.ensure_player_turn()?;
        if !self.state.bounds.contains(destination) {
            return Err(CombatError::OutOfBounds(destination));
        }
        if destination == self.state.enemy.position {
            return Err(CombatError::OccupiedCell(destination));
        }
        let path = find_path(
            &self.state.bounds,
            self.state.player.position,
            destination,
            Some(self.state.enemy.position),
        );
        if path.destination() != destination {
            return Err(CombatError::NoPathSelected);
        }
        let cost = self.validate_move(Side::Player, &path)?;
        Ok(self.commit_move(Side::Player, &path, cost))
    }

    fn validate_move(&self, side: Side, path: &Path) -> Result<u32, CombatError> {
        let mover = self.state.combatant(side);
        if path.steps() == 0 || path.start() != mover.position {
            return Err(CombatError::NoPathSelected);
        }
        if let Some(cell) = path.cells().iter().find(|c| !self.state.bounds.contains(**c)) {
            return Err(CombatError::OutOfBounds(*cell));
        }
        let blocker = self.state.combatant(side.opponent()).position;
        if path.contains(blocker) {
            return Err(CombatError::OccupiedCell(blocker));
        }
        let cost = path.cost(self.state.step_cost());
        if cost > mover.movement_budget {
            return Err(CombatError::InsufficientBudget {
                cost,
                remaining: mover.movement_budget,
            });
        }
        Ok(cost)
    }

    fn commit_move(&mut self, side: Side, path: &Path, cost: u32) -> MoveOutcome {
        let mover = self.state.combatant_mut(side);
        let from = mover.position;
        mover.position = path.destination();
        mover.movement_budget -= cost;

        let outcome = MoveOutcome {
            side,
            from,
            to: mover.position,
            steps: path.steps(),
            cost,
            remaining_budget: mover.movement_budget,
        };
        let description = format!(
            "{} moves {} -> {} ({} movement, {} left)",
            mover.name, from, outcome.to, cost, outcome.remaining_budget
        );
        tracing::debug!(%side, from = %from, to = %outcome.to, cost, "Move committed");
        self.state.log_event(BattleEventType::Moved { side, to: outcome.to }, description);
        outcome
    }

    // ===== ACTIONS =====

    pub fn select_action(&mut self, name: &str) -> Result<(), CombatError> {
        self.ensure_player_turn()?;
        if self.state.player.has_acted_this_turn {
            return Err(CombatError::ActionAlreadyUsed);
        }
        let action = self
            .state
            .player
            .ability(name)
            .ok_or_else(|| CombatError::UnknownAbility(name.to_string()))?;
        self.check_mana(Side::Player, action)?;

        self.state.selected_action = Some(action.name().to_string());
        self.state.selected_target = None;
        self.state.turn_state = TurnState::PlayerAction;
        Ok(())
    }

    /// Drop the selected action and target
    pub fn cancel_action(&mut self) -> Result<(), CombatError> {
        self.ensure_player_turn()?;
        self.state.selected_action = None;
        self.state.selected_target = None;
        self.state.turn_state = TurnState::PlayerMove;
        Ok(())
    }

    pub fn select_target(&mut self, target: Cell) -> Result<(), CombatError> {
        self.ensure_player_turn()?;
        let action = self.selected_action()?;
        self.check_target(Side::Player, action, target)?;
        self.state.selected_target = Some(target);
        Ok(())
    }

    /// Highlight sets for the selected action, if any
    pub fn targeting_preview(&self) -> Option<TargetingPreview> {
        let action = self.selected_action().ok()?;
        let player = &self.state.player;
        let bounds = &self.state.bounds;
        let enemy = self.state.enemy.position;
        let mut reachable = cells_within_range(bounds, player.position, action.range());
        match action.effect() {
            SpellEffect::Reposition { .. } => reachable.retain(|c| *c != player.position && *c != enemy),
            SpellEffect::Damage { .. } | SpellEffect::Disable { .. } => {
                reachable.retain(|c| is_in_range(bounds, enemy, *c, action.aoe_radius()))
            }
            SpellEffect::Healing { .. } => {}
        }
        let aoe_preview = self
            .state
            .selected_target
            .map(|t| sorted_cells(&cells_in_aoe(&self.state.bounds, t, action.aoe_radius())))
            .unwrap_or_default();

        Some(TargetingPreview {
            action: action.name().to_string(),
            range: action.range(),
            valid_targets: sorted_cells(&reachable),
            aoe_preview,
        })
    }

    /// Resolve the selected action against the selected target
    pub fn perform_action(&mut self) -> Result<ActionOutcome, CombatError> {
        self.ensure_player_turn()?;
        if self.state.player.has_acted_this_turn {
            return Err(CombatError::ActionAlreadyUsed);
        }
        let action = self.selected_action()?.clone();
        let target = self.state.selected_target.ok_or(CombatError::NoTargetSelected)?;
        self.check_target(Side::Player, &action, target)?;
        self.check_mana(Side::Player, &action)?;

        let outcome = self.resolve_action(Side::Player, &action, target);
        self.state.player.has_acted_this_turn = true;
        self.state.selected_action = None;
        self.state.selected_target = None;
        if !self.state.is_finished() {
            self.state.turn_state = TurnState::PlayerMove;
        }
        Ok(outcome)
    }

    fn selected_action(&self) -> Result<&Action, CombatError> {
        self.state
            .selected_action
            .as_deref()
            .and_then(|name| self.state.player.ability(name))
            .ok_or(CombatError::NoActionSelected)
    }

    fn check_mana(&self, side: Side, action: &Action) -> Result<(), CombatError> {
        let available = self.state.combatant(side).mana;
        if available < action.mana_cost() {
            return Err(CombatError::InsufficientMana {
                required: action.mana_cost(),
                available,
            });
        }
        Ok(())
    }

    fn check_target(&self, side: Side, action: &Action, target: Cell) -> Result<(), CombatError> {
        let bounds = &self.state.bounds;
        if !bounds.contains(target) {
            return Err(CombatError::OutOfBounds(target));
        }
        let caster = self.state.combatant(side);
        if !is_in_range(bounds, target, caster.position, action.range()) {
            return Err(CombatError::OutOfRange {
                target,
                range: action.range(),
            });
        }
        match action.effect() {
            SpellEffect::Reposition { .. } => {
                if target == caster.position || !self.state.is_free_for(side, target) {
                    return Err(CombatError::OccupiedCell(target));
                }
            }
            SpellEffect::Damage { .. } | SpellEffect::Disable { .. } => {
                let opponent = self.state.combatant(side.opponent()).position;
                if !is_in_range(bounds, opponent, target, action.aoe_radius()) {
                    return Err(CombatError::NoTargetInArea(target));
                }
            }
            SpellEffect::Healing { .. } => {}
        }
        Ok(())
    }

    /// Apply a validated action. Mana is spent whether or not it lands.
    fn resolve_action(&mut self, side: Side, action: &Action, target: Cell) -> ActionOutcome {
        let rules = self.state.rules.clone();
        let aoe = cells_in_aoe(&self.state.bounds, target, action.aoe_radius());
        let mana_spent = action.mana_cost();
        self.state.combatant_mut(side).mana -= mana_spent;

        let mut outcome = ActionOutcome {
            actor: side,
            ability: action.name().to_string(),
            target,
            hit_roll: None,
            hit: true,
            critical: false,
            effect_roll: None,
            damage_dealt: 0,
            healing_done: 0,
            mana_spent,
            repositioned_to: None,
            disabled_turns: 0,
            affected_cells: sorted_cells(&aoe),
            winner: None,
        };

        if action.rolls_to_hit() {
            let roll = self.dice.roll(&rules.hit_die);
            outcome.critical = is_critical(&roll, &rules.hit_die);
            outcome.hit = outcome.critical || roll.total >= rules.hit_threshold;
            outcome.hit_roll = Some(roll);
        }

        if outcome.hit {
            let opponent_hit = aoe.contains(&self.state.combatant(side.opponent()).position);
            match action.effect() {
                SpellEffect::Damage { dice } => {
                    let roll = self.dice.roll(&dice);
                    if opponent_hit {
                        let amount = roll.total.max(0) as u32;
                        outcome.damage_dealt = self.state.combatant_mut(side.opponent()).take_damage(amount);
                    }
                    outcome.effect_roll = Some(roll);
                }
                SpellEffect::Healing { dice } => {
                    let roll = self.dice.roll(&dice);
                    outcome.healing_done = self.state.combatant_mut(side).heal(roll.total.max(0) as u32);
                    outcome.effect_roll = Some(roll);
                }
                SpellEffect::Reposition { .. } => {
                    self.state.combatant_mut(side).position = target;
                    outcome.repositioned_to = Some(target);
                }
                SpellEffect::Disable { turns } => {
                    if opponent_hit {
                        let opponent = self.state.combatant_mut(side.opponent());
                        opponent.disabled_turns = opponent.disabled_turns.saturating_add(turns);
                        outcome.disabled_turns = turns;
                    }
                }
            }
        }

        self.log_outcome(&outcome);
        outcome.winner = self.state.check_defeat();
        outcome
    }

    fn log_outcome(&mut self, outcome: &ActionOutcome) {
        let actor = self.state.combatant(outcome.actor).name.clone();
        let opponent = self.state.combatant(outcome.actor.opponent()).name.clone();

        let mut description = format!("{} uses {} on {}", actor, outcome.ability, outcome.target);
        if let Some(roll) = &outcome.hit_roll {
            let verdict = match (outcome.hit, outcome.critical) {
                (true, true) => "critical hit",
                (true, false) => "hit",
                (false, _) => "miss",
            };
            description.push_str(&format!(": {} (roll {})", verdict, roll.total));
        }
        if outcome.damage_dealt > 0 {
            description.push_str(&format!(", {} takes {} damage", opponent, outcome.damage_dealt));
        }
        if outcome.healing_done > 0 {
            description.push_str(&format!(", restores {} hp", outcome.healing_done));
        }
        self.state.log_event(
            BattleEventType::ActionResolved {
                side: outcome.actor,
                ability: outcome.ability.clone(),
                hit: outcome.hit,
                critical: outcome.critical,
            },
            description,
        );

        if let Some(to) = outcome.repositioned_to {
            self.state.log_event(
                BattleEventType::Repositioned { side: outcome.actor, to },
                format!("{} teleports to {}", actor, to),
            );
        }
        if outcome.disabled_turns > 0 {
            self.state.log_event(
                BattleEventType::Disabled {
                    side: outcome.actor.opponent(),
                    turns: outcome.disabled_turns,
                },
                format!("{} is held for {} turn(s)", opponent, outcome.disabled_turns),
            );
        }

        tracing::info!(
            actor = %outcome.actor,
            ability = %outcome.ability,
            hit = outcome.hit,
            critical = outcome.critical,
            damage = outcome.damage_dealt,
            healing = outcome.healing_done,
            mana = outcome.mana_spent,
            "Action resolved"
        );
    }

    // ===== TURNS =====

    /// Finish the player's turn and hand over to the enemy
    pub fn end_turn(&mut self) -> Result<(), CombatError> {
        match self.state.turn_state {
            TurnState::BattleOver { .. } => return Err(CombatError::BattleEnded),
            TurnState::EnemyTurn => return Err(CombatError::OutOfTurn),
            TurnState::PlayerMove | TurnState::PlayerAction => {}
        }

        let regen = self.state.rules.mana_regen_per_turn;
        let player = &mut self.state.player;
        player.disabled_turns = player.disabled_turns.saturating_sub(1);
        player.reset_turn();
        let restored = player.regenerate_mana(regen);
        self.state.enemy.reset_turn();

        self.state.selected_action = None;
        self.state.selected_target = None;
        self.state.turn_state = TurnState::EnemyTurn;

        let description = format!("{} ends the turn (+{} mana)", self.state.player.name, restored);
        self.state.log_event(BattleEventType::TurnEnded { side: Side::Player }, description);
        tracing::debug!(turn = self.state.turn, restored, "Player turn ended");
        Ok(())
    }

    /// Let the controller play the enemy's turn, then start the next player turn
    pub fn run_enemy_turn(
        &mut self,
        controller: &mut EnemyTurnController,
    ) -> Result<EnemyTurnReport, CombatError> {
        self.ensure_enemy_turn()?;
        let report = controller.take_turn(self);

        if !self.state.is_finished() {
            let restored = self.state.enemy.regenerate_mana(self.state.rules.mana_regen_per_turn);
            if restored > 0 {
                tracing::debug!(restored, "Enemy mana restored");
            }
            self.state.turn += 1;
            self.state.turn_state = TurnState::PlayerMove;
            let description = format!("Turn {} begins", self.state.turn);
            self.state.log_event(BattleEventType::TurnStarted, description);
        }
        Ok(report)
    }

    // ===== ENEMY TURN PRIMITIVES =====

    pub fn enemy_move(&mut self, path: &Path) -> Result<MoveOutcome, CombatError> {
        self.ensure_enemy_turn()?;
        if self.state.enemy.is_disabled() {
            return Err(CombatError::Disabled);
        }
        let cost = self.validate_move(Side::Enemy, path)?;
        Ok(self.commit_move(Side::Enemy, path, cost))
    }

    pub fn enemy_attack(&mut self, ability: &str, target: Cell) -> Result<ActionOutcome, CombatError> {
        self.ensure_enemy_turn()?;
        let enemy = &self.state.enemy;
        if enemy.is_disabled() {
            return Err(CombatError::Disabled);
        }
        if enemy.has_acted_this_turn {
            return Err(CombatError::ActionAlreadyUsed);
        }
        let action = enemy
            .ability(ability)
            .cloned()
            .ok_or_else(|| CombatError::UnknownAbility(ability.to_string()))?;
        self.check_target(Side::Enemy, &action, target)?;
        self.check_mana(Side::Enemy, &action)?;

        let outcome = self.resolve_action(Side::Enemy, &action, target);
        self.state.enemy.has_acted_this_turn = true;
        Ok(outcome)
    }

    /// Burn one disabled turn; false if the enemy is not disabled
    pub fn skip_disabled_enemy_turn(&mut self) -> Result<bool, CombatError> {
        self.ensure_enemy_turn()?;
        if !self.state.enemy.is_disabled() {
            return Ok(false);
        }
        self.state.enemy.disabled_turns -= 1;
        let description = format!("{} is held and loses the turn", self.state.enemy.name);
        self.state
            .log_event(BattleEventType::TurnSkipped { side: Side::Enemy }, description);
        Ok(true)
    }
}

/// Every die shows its maximum face
fn is_critical(roll: &DiceRoll, die: &DiceNotation) -> bool {
    !roll.rolls.is_empty() && roll.rolls.iter().all(|&face| face == die.sides)
}
