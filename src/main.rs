//! Hex Skirmish - Entry Point
//!
//! Sets up logging, loads content, picks the dice and enemy policy from the
//! environment, and runs an interactive duel on stdin.

use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use tokio::runtime::Runtime;
use tracing_subscriber::EnvFilter;

use hex_skirmish::battle::ai::llm_gateway::LlmEnemyPolicy;
use hex_skirmish::battle::{
    CombatResolver, ContentLibrary, EnemyTurnController, EnemyTurnReport, TurnState,
};
use hex_skirmish::battle::hex::Cell;
use hex_skirmish::core::error::Result;
use hex_skirmish::core::types::Side;
use hex_skirmish::dice::{DiceRoller, HttpDiceService, LocalDice, ResilientDice};

/// Turn-based hex duel against a goblin or an orc
#[derive(Parser, Debug)]
#[command(name = "hex-skirmish")]
#[command(about = "Turn-based tactical duel on a hex grid")]
struct Args {
    /// Battlefield id from battlefields.toml
    #[arg(long, default_value = "forest_ambush")]
    battlefield: String,

    /// Random seed for enemy choice and local dice
    #[arg(long)]
    seed: Option<u64>,

    /// Force the enemy instead of picking by difficulty
    #[arg(long)]
    enemy: Option<String>,

    /// Player race from characters.toml (defaults to human when --class is given)
    #[arg(long)]
    race: Option<String>,

    /// Player class from characters.toml (defaults to warrior when --race is given)
    #[arg(long)]
    class: Option<String>,

    /// Directory with rules/abilities/characters/enemies/battlefields TOML overrides
    #[arg(long)]
    data_dir: Option<PathBuf>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("hex_skirmish=info")),
        )
        .init();

    let args = Args::parse();
    let seed = args.seed.unwrap_or_else(rand::random);
    tracing::info!(seed, "Hex Skirmish starting...");

    let library = match &args.data_dir {
        Some(dir) => ContentLibrary::load_dir(dir)?,
        None => ContentLibrary::builtin()?,
    };
    let profile = library.player_profile(args.race.as_deref(), args.class.as_deref())?;
    let state = library.build_battle_as(&args.battlefield, &profile, args.enemy.as_deref(), seed)?;

    // Runtime for LLM and dice service calls
    let runtime = Arc::new(Runtime::new()?);

    let dice: Box<dyn DiceRoller + Send> = match HttpDiceService::from_env(runtime.clone()) {
        Ok(service) => {
            tracing::info!(url = service.url(), "Using remote dice service");
            Box::new(ResilientDice::new(service, seed))
        }
        Err(e) => {
            tracing::debug!("Remote dice unavailable: {}", e);
            Box::new(LocalDice::new(seed))
        }
    };

    let mut controller = match LlmEnemyPolicy::from_env(runtime.clone()) {
        Ok(policy) => EnemyTurnController::with_policy(policy),
        Err(e) => {
            tracing::warn!("LLM not configured ({}) - enemy uses local rules", e);
            EnemyTurnController::local()
        }
    };
    tracing::info!(policy = controller.policy_name(), "Enemy policy ready");

    let mut resolver = CombatResolver::new(state, dice);

    println!("\n=== HEX SKIRMISH ===");
    if let Some(field) = library.battlefields.get(&args.battlefield) {
        println!("{}: {}", field.name, field.description);
    }
    print_help();
    print_status(&resolver);

    loop {
        if let TurnState::BattleOver { winner } = resolver.state().turn_state {
            print_outcome(&resolver, winner);
            break;
        }

        print!("> ");
        io::stdout().flush()?;

        let mut input = String::new();
        if io::stdin().read_line(&mut input)? == 0 {
            break;
        }
        let input = input.trim();
        if input.is_empty() {
            continue;
        }

        let (command, rest) = match input.split_once(' ') {
            Some((command, rest)) => (command, rest.trim()),
            None => (input, ""),
        };

        match command {
            "quit" | "q" => break,
            "help" | "h" => print_help(),
            "status" | "s" => print_status(&resolver),
            "abilities" | "a" => print_abilities(&resolver),
            "path" => match parse_cell(rest) {
                Some(cell) => match resolver.plan_path(cell) {
                    Ok(preview) => {
                        let cells: Vec<String> = preview.path.cells().iter().map(|c| c.to_string()).collect();
                        println!("Path: {}", cells.join(" -> "));
                        println!(
                            "Cost {} ({} left){}",
                            preview.cost,
                            preview.remaining_budget,
                            if preview.reaches_destination { "" } else { ", stops short" }
                        );
                    }
                    Err(e) => println!("{}", e),
                },
                None => println!("Usage: path <col>,<row>"),
            },
            "move" | "m" => match parse_cell(rest) {
                Some(cell) => match resolver.move_to(cell) {
                    Ok(outcome) => println!(
                        "Moved to {} for {} ({} left)",
                        outcome.to, outcome.cost, outcome.remaining_budget
                    ),
                    Err(e) => println!("{}", e),
                },
                None => println!("Usage: move <col>,<row>"),
            },
            "select" => match resolver.select_action(rest) {
                Ok(()) => {
                    if let Some(preview) = resolver.targeting_preview() {
                        println!(
                            "{} selected (range {}, {} target cells)",
                            preview.action,
                            preview.range,
                            preview.valid_targets.len()
                        );
                    }
                }
                Err(e) => println!("{}", e),
            },
            "target" | "t" => match parse_cell(rest) {
                Some(cell) => match resolver.select_target(cell) {
                    Ok(()) => {
                        if let Some(preview) = resolver.targeting_preview() {
                            let area: Vec<String> = preview.aoe_preview.iter().map(|c| c.to_string()).collect();
                            println!("Targeting {} - area: {}", cell, area.join(" "));
                        }
                    }
                    Err(e) => println!("{}", e),
                },
                None => println!("Usage: target <col>,<row>"),
            },
            "attack" | "cast" => match resolver.perform_action() {
                Ok(outcome) => {
                    if let Some(roll) = &outcome.hit_roll {
                        println!("Hit roll: {}", roll.describe());
                    }
                    if outcome.critical {
                        println!("Critical!");
                    }
                    if let Some(line) = resolver.state().battle_log.last() {
                        println!("{}", line.description);
                    }
                }
                Err(e) => println!("{}", e),
            },
            "cancel" => {
                if let Err(e) = resolver.cancel_action() {
                    println!("{}", e);
                }
            }
            "end" | "e" => {
                if let Err(e) = resolver.end_turn() {
                    println!("{}", e);
                    continue;
                }
                match resolver.run_enemy_turn(&mut controller) {
                    Ok(report) => print_enemy_report(&resolver, &report),
                    Err(e) => println!("{}", e),
                }
                print_status(&resolver);
            }
            _ => println!("Unknown command: {} (try 'help')", command),
        }
    }

    tracing::info!("Hex Skirmish shutting down");
    Ok(())
}

/// "col,row" with optional whitespace
fn parse_cell(text: &str) -> Option<Cell> {
    let (col, row) = text.split_once(',')?;
    Some(Cell::new(col.trim().parse().ok()?, row.trim().parse().ok()?))
}

fn print_help() {
    println!();
    println!("Commands:");
    println!("  path <c>,<r>     - Preview the path toward a cell");
    println!("  move <c>,<r>     - Move to a cell");
    println!("  select <name>    - Select an ability");
    println!("  target <c>,<r>   - Target a cell with the selected ability");
    println!("  attack           - Use the selected ability");
    println!("  cancel           - Drop the current selection");
    println!("  end              - End your turn");
    println!("  status / s       - Show the battle");
    println!("  abilities / a    - List your abilities");
    println!("  quit / q         - Exit");
    println!();
}

fn print_status(resolver: &CombatResolver) {
    let snapshot = resolver.snapshot();
    let state = resolver.state();
    println!(
        "--- Turn {} ({}) ---",
        snapshot.turn,
        match snapshot.turn_state {
            TurnState::PlayerMove => "move",
            TurnState::PlayerAction => "action",
            TurnState::EnemyTurn => "enemy",
            TurnState::BattleOver { .. } => "over",
        }
    );
    println!(
        "{} at {}  HP {}/{}  Mana {}/{}  Move {}/{}{}",
        state.player.name,
        snapshot.player_pos,
        snapshot.player_hp,
        snapshot.player_max_hp,
        snapshot.player_mana,
        snapshot.player_max_mana,
        snapshot.movement_budget,
        snapshot.movement_budget_max,
        if snapshot.has_acted_this_turn { "  (acted)" } else { "" }
    );
    println!(
        "{} at {}  HP {}/{}  distance {}",
        state.enemy.name,
        snapshot.enemy_pos,
        snapshot.enemy_hp,
        snapshot.enemy_max_hp,
        snapshot.player_pos.distance(&snapshot.enemy_pos)
    );
    if let Some(preview) = resolver.targeting_preview() {
        let targets: Vec<String> = preview.valid_targets.iter().map(|c| c.to_string()).collect();
        println!("Selected {} - targets: {}", preview.action, targets.join(" "));
    }
}

fn print_abilities(resolver: &CombatResolver) {
    let player = &resolver.state().player;
    for ability in &player.abilities {
        let affordable = ability.mana_cost() <= player.mana;
        println!(
            "  {}{}",
            ability.summary(),
            if affordable { "" } else { " (not enough mana)" }
        );
    }
}

fn print_enemy_report(resolver: &CombatResolver, report: &EnemyTurnReport) {
    let enemy = &resolver.state().enemy;
    if let Some(cell) = report.moved_to {
        println!("{} moves to {}", enemy.name, cell);
    }
    if let Some(outcome) = &report.attack {
        if outcome.hit {
            println!("{} hits with {} for {}", enemy.name, outcome.ability, outcome.damage_dealt);
        } else {
            println!("{} misses with {}", enemy.name, outcome.ability);
        }
    }
    if report.moved_to.is_none() && report.attack.is_none() {
        println!("{} does nothing", enemy.name);
    }
}

fn print_outcome(resolver: &CombatResolver, winner: Side) {
    let state = resolver.state();
    println!();
    match winner {
        Side::Player => println!("*** VICTORY - {} is defeated ***", state.enemy.name),
        Side::Enemy => println!("*** DEFEAT - {} has fallen ***", state.player.name),
    }
    println!("Battle lasted {} turns", state.turn);
}
