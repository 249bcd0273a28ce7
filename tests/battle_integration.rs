//! Battle integration tests

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use hex_skirmish::battle::*;
use hex_skirmish::core::config::RulesConfig;
use hex_skirmish::core::types::Side;
use hex_skirmish::dice::{DiceNotation, DiceRoll, DiceRoller, LocalDice, ScriptedDice};

fn d(text: &str) -> DiceNotation {
    DiceNotation::parse(text).unwrap()
}

fn wizard(at: Cell) -> Combatant {
    Combatant::new("Wizard", Side::Player, at, 100, 30, 30).with_abilities(vec![
        AttackProfile::new("Melee Attack", d("1d6"), 1).into(),
        AttackProfile::new("Sling", d("1d4"), 3).with_aoe(1).into(),
        SpellProfile::new("Scorching Ray", SpellEffect::Damage { dice: d("2d6") }, 5, 10).into(),
    ])
}

fn goblin(at: Cell) -> Combatant {
    Combatant::new("Goblin", Side::Enemy, at, 75, 25, 0)
        .with_abilities(vec![AttackProfile::new("Melee Attack", d("1d8"), 1).into()])
}

fn battle(player_at: Cell, enemy_at: Cell) -> BattleState {
    BattleState::new(
        GridBounds::new(10, 8),
        TerrainProfile::default(),
        RulesConfig::default(),
        wizard(player_at),
        goblin(enemy_at),
    )
}

/// Counts every die it is asked to roll
struct CountingDice {
    rolled: Arc<AtomicUsize>,
}

impl DiceRoller for CountingDice {
    fn roll(&mut self, notation: &DiceNotation) -> DiceRoll {
        self.rolled.fetch_add(notation.count as usize, Ordering::SeqCst);
        DiceRoll::from_faces(vec![1; notation.count as usize], notation.modifier)
    }
}

#[test]
fn test_budget_allows_six_steps_not_seven() {
    let mut resolver = CombatResolver::new(battle(Cell::new(0, 0), Cell::new(9, 7)), ScriptedDice::default());

    let err = resolver.move_to(Cell::new(7, 0)).unwrap_err();
    assert_eq!(err, CombatError::InsufficientBudget { cost: 35, remaining: 30 });
    assert_eq!(resolver.state().player.position, Cell::new(0, 0));

    let preview = resolver.plan_path(Cell::new(9, 0)).unwrap();
    assert_eq!(preview.path.steps(), 6);
    assert_eq!(preview.path.destination(), Cell::new(6, 0));

    let outcome = resolver.confirm_move(&preview.path).unwrap();
    assert_eq!(outcome.cost, 30);
    assert_eq!(outcome.remaining_budget, 0);
    assert_eq!(resolver.snapshot().player_pos, Cell::new(6, 0));
}

#[test]
fn test_range_three_reaches_distance_three_only() {
    let bounds = GridBounds::new(10, 8);
    let origin = Cell::new(2, 2);
    assert!(is_in_range(&bounds, Cell::new(5, 2), origin, 3));
    assert!(!is_in_range(&bounds, Cell::new(6, 2), origin, 3));

    let mut resolver = CombatResolver::new(battle(origin, Cell::new(5, 2)), ScriptedDice::default());
    resolver.select_action("Sling").unwrap();
    resolver.select_target(Cell::new(5, 2)).unwrap();
    assert_eq!(
        resolver.select_target(Cell::new(6, 2)).unwrap_err(),
        CombatError::OutOfRange { target: Cell::new(6, 2), range: 3 }
    );
    // The rejected target did not replace the valid one
    assert_eq!(resolver.state().selected_target, Some(Cell::new(5, 2)));

    let preview = resolver.targeting_preview().unwrap();
    assert!(preview.valid_targets.contains(&Cell::new(5, 2)));
    assert!(!preview.valid_targets.contains(&Cell::new(6, 2)));
    assert_eq!(preview.aoe_preview.len(), 7);
}

#[test]
fn test_threshold_roll_hits_and_max_face_is_critical() {
    let mut resolver = CombatResolver::new(battle(Cell::new(2, 2), Cell::new(3, 2)), ScriptedDice::new([11, 4]));
    resolver.select_action("Melee Attack").unwrap();
    resolver.select_target(Cell::new(3, 2)).unwrap();
    let outcome = resolver.perform_action().unwrap();
    assert!(outcome.hit);
    assert!(!outcome.critical);
    assert_eq!(outcome.damage_dealt, 4);

    let mut resolver = CombatResolver::new(battle(Cell::new(2, 2), Cell::new(3, 2)), ScriptedDice::new([20, 6]));
    resolver.select_action("Melee Attack").unwrap();
    resolver.select_target(Cell::new(3, 2)).unwrap();
    let outcome = resolver.perform_action().unwrap();
    assert!(outcome.hit);
    assert!(outcome.critical);
    assert_eq!(outcome.damage_dealt, 6);
    assert_eq!(resolver.state().enemy.hp, 69);
}

#[test]
fn test_unaffordable_spell_costs_nothing_and_rolls_nothing() {
    let rolled = Arc::new(AtomicUsize::new(0));
    let mut state = battle(Cell::new(2, 2), Cell::new(4, 2));
    state.player.mana = 5;
    let mut resolver = CombatResolver::new(state, CountingDice { rolled: rolled.clone() });

    assert_eq!(
        resolver.select_action("Scorching Ray").unwrap_err(),
        CombatError::InsufficientMana { required: 10, available: 5 }
    );
    assert_eq!(resolver.state().player.mana, 5);
    assert_eq!(resolver.state().selected_action, None);
    assert_eq!(resolver.state().turn_state, TurnState::PlayerMove);
    assert_eq!(rolled.load(Ordering::SeqCst), 0);
}

#[test]
fn test_spell_at_empty_ground_is_refused() {
    let rolled = Arc::new(AtomicUsize::new(0));
    let mut resolver = CombatResolver::new(
        battle(Cell::new(2, 2), Cell::new(6, 3)),
        CountingDice { rolled: rolled.clone() },
    );

    resolver.select_action("Scorching Ray").unwrap();
    assert_eq!(
        resolver.select_target(Cell::new(3, 2)).unwrap_err(),
        CombatError::NoTargetInArea(Cell::new(3, 2))
    );
    assert_eq!(resolver.perform_action().unwrap_err(), CombatError::NoTargetSelected);

    let state = resolver.state();
    assert_eq!(state.player.mana, 30);
    assert!(!state.player.has_acted_this_turn);
    assert_eq!(state.enemy.hp, 75);
    assert_eq!(rolled.load(Ordering::SeqCst), 0);

    // Same spell on the goblin itself goes through
    resolver.select_target(Cell::new(6, 3)).unwrap();
    resolver.perform_action().unwrap();
    assert_eq!(resolver.state().player.mana, 20);
}

#[test]
fn test_race_and_class_shape_the_player() {
    let library = ContentLibrary::builtin().unwrap();
    let profile = library.player_profile(Some("dwarf"), Some("warrior")).unwrap();
    let state = library.build_battle_as("cave_encounter", &profile, Some("orc"), 5).unwrap();
    assert_eq!(state.player.name, "Dwarf Warrior");
    assert_eq!(state.player.max_hp, 115);
    assert_eq!(state.player.max_mana, 21);

    let snapshot = CombatResolver::new(state, ScriptedDice::default()).snapshot();
    assert_eq!(snapshot.player_max_hp, 115);
    assert_eq!(snapshot.player_mana, 21);
}

#[test]
fn test_enemy_kill_ends_battle() {
    let mut state = battle(Cell::new(2, 2), Cell::new(3, 2));
    state.player.hp = 3;
    let mut resolver = CombatResolver::new(state, ScriptedDice::new([15, 8]));
    resolver.end_turn().unwrap();

    let outcome = resolver.enemy_attack("Melee Attack", Cell::new(2, 2)).unwrap();
    assert_eq!(outcome.damage_dealt, 3);
    assert_eq!(outcome.winner, Some(Side::Enemy));
    assert_eq!(resolver.state().turn_state, TurnState::BattleOver { winner: Side::Enemy });

    let step = Path::from_cells(vec![Cell::new(2, 2), Cell::new(2, 3)]).unwrap();
    assert_eq!(resolver.confirm_move(&step).unwrap_err(), CombatError::BattleEnded);
    assert_eq!(resolver.state().player.position, Cell::new(2, 2));
    assert_eq!(resolver.end_turn().unwrap_err(), CombatError::BattleEnded);
    assert_eq!(
        resolver.run_enemy_turn(&mut EnemyTurnController::local()).unwrap_err(),
        CombatError::BattleEnded
    );
    assert_eq!(resolver.snapshot().winner, Some(Side::Enemy));
}

#[test]
fn test_one_action_per_turn_resets_after_enemy_turn() {
    // player hit + damage, goblin misses, player hit + damage
    let mut resolver = CombatResolver::new(
        battle(Cell::new(2, 2), Cell::new(3, 2)),
        ScriptedDice::new([11, 3, 5, 12, 2]),
    );
    resolver.select_action("Melee Attack").unwrap();
    resolver.select_target(Cell::new(3, 2)).unwrap();
    resolver.perform_action().unwrap();
    assert!(resolver.state().player.has_acted_this_turn);
    assert_eq!(
        resolver.select_action("Melee Attack").unwrap_err(),
        CombatError::ActionAlreadyUsed
    );

    resolver.end_turn().unwrap();
    let report = resolver.run_enemy_turn(&mut EnemyTurnController::local()).unwrap();
    let attack = report.attack.unwrap();
    assert!(!attack.hit);
    assert_eq!(resolver.state().turn, 2);
    assert!(!resolver.state().player.has_acted_this_turn);

    resolver.select_action("Melee Attack").unwrap();
    resolver.select_target(Cell::new(3, 2)).unwrap();
    let outcome = resolver.perform_action().unwrap();
    assert_eq!(outcome.damage_dealt, 2);
    assert_eq!(resolver.state().enemy.hp, 70);
}

#[test]
fn test_goblin_walks_into_bow_range() {
    let library = ContentLibrary::builtin().unwrap();
    let state = library.build_battle("forest_ambush", Some("goblin"), 3).unwrap();
    let mut resolver = CombatResolver::new(state, ScriptedDice::default());
    let mut controller = EnemyTurnController::local();

    // Distance 6, bow range 4: two turns of walking
    for expected in [Cell::new(7, 5), Cell::new(6, 5)] {
        resolver.end_turn().unwrap();
        let report = resolver.run_enemy_turn(&mut controller).unwrap();
        assert_eq!(report.moved_to, Some(expected));
    }

    resolver.end_turn().unwrap();
    let report = resolver.run_enemy_turn(&mut controller).unwrap();
    assert_eq!(report.moved_to, None);
    assert_eq!(report.attack.unwrap().ability, "Bow Attack");
    assert_eq!(resolver.state().turn, 4);
}

#[test]
fn test_full_duel_reaches_a_winner() {
    let library = ContentLibrary::builtin().unwrap();
    let state = library.build_battle("cave_encounter", Some("goblin"), 11).unwrap();
    let mut resolver = CombatResolver::new(state, LocalDice::new(11));
    let mut controller = EnemyTurnController::local();

    for _ in 0..500 {
        if resolver.state().is_finished() {
            break;
        }
        let player = &resolver.state().player;
        let enemy_at = resolver.state().enemy.position;
        if player.mana >= 5 && player.position.distance(&enemy_at) <= 4 {
            resolver.select_action("Magic Missile").unwrap();
            resolver.select_target(enemy_at).unwrap();
            resolver.perform_action().unwrap();
        }
        if resolver.state().is_finished() {
            break;
        }
        resolver.end_turn().unwrap();
        resolver.run_enemy_turn(&mut controller).unwrap();
    }

    let state = resolver.state();
    let winner = state.winner().expect("duel should finish");
    assert!(state.combatant(winner.opponent()).is_defeated());
    assert!(!state.combatant(winner).is_defeated());
    assert!(matches!(
        state.battle_log.last().map(|e| &e.event_type),
        Some(BattleEventType::BattleEnded { .. })
    ));
}

#[test]
fn test_misty_step_then_walk() {
    let library = ContentLibrary::builtin().unwrap();
    let state = library.build_battle("forest_ambush", None, 0).unwrap();
    let mut resolver = CombatResolver::new(state, ScriptedDice::default());

    resolver.select_action("Misty Step").unwrap();
    resolver.select_target(Cell::new(0, 0)).unwrap();
    let outcome = resolver.perform_action().unwrap();
    assert!(outcome.hit_roll.is_none());
    assert_eq!(outcome.repositioned_to, Some(Cell::new(0, 0)));
    assert_eq!(resolver.state().player.mana, 20);

    // Teleporting leaves the movement budget alone
    let moved = resolver.move_to(Cell::new(0, 3)).unwrap();
    assert_eq!(moved.cost, 15);
    assert_eq!(resolver.snapshot().movement_budget, 15);
}
