//! Battle system - a two-combatant duel on a hex grid
//!
//! Layers, leaves first:
//! - `hex`, `range`: the one place distance and neighbors are computed
//! - `pathfinding`, `path`: budget-aware movement
//! - `resolver`: the turn state machine, sole writer of `BattleState`
//! - `enemy_turn`, `ai`: how the enemy plays its turn

pub mod actions;
pub mod ai;
pub mod combatant;
pub mod constants;
pub mod enemy_turn;
pub mod error;
pub mod execution;
pub mod hex;
pub mod path;
pub mod pathfinding;
pub mod range;
pub mod resolver;
pub mod scenario;
pub mod snapshot;
pub mod terrain;

// Re-exports for convenient access
pub use actions::{Action, AttackProfile, SpellEffect, SpellProfile};
pub use ai::{EnemyDecision, EnemyPolicy, LlmEnemyPolicy, LocalEnemyPolicy, PolicyView};
pub use combatant::Combatant;
pub use enemy_turn::{DecisionSource, EnemyTurnController, EnemyTurnReport};
pub use error::CombatError;
pub use execution::{BattleEvent, BattleEventLog, BattleEventType, BattleState, TurnState};
pub use hex::{Cell, CubeCoord, GridBounds, HexDirection};
pub use path::{path_cost, DraftChange, Path, PathDraft};
pub use pathfinding::{compute_budget_limited_path, find_path};
pub use range::{cells_in_aoe, cells_within_range, is_in_range};
pub use resolver::{ActionOutcome, CombatResolver, MoveOutcome};
pub use scenario::{
    BattlefieldConfig, CharacterTables, ClassProfile, ContentLibrary, Difficulty, EnemyProfile,
    PlayerProfile, RaceProfile,
};
pub use snapshot::{BattleSnapshot, PathPreview, TargetingPreview};
pub use terrain::{Terrain, TerrainProfile};
