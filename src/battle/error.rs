//! Validation failures surfaced by the combat resolver
//!
//! Every variant is recoverable except `BattleEnded`. A request that fails
//! with any of these leaves the battle exactly as it was.

use thiserror::Error;

use crate::battle::hex::Cell;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CombatError {
    #[error("Not enough movement: path costs {cost}, {remaining} remaining")]
    InsufficientBudget { cost: u32, remaining: u32 },

    #[error("Cell {0} is occupied")]
    OccupiedCell(Cell),

    #[error("Target {target} is out of range ({range})")]
    OutOfRange { target: Cell, range: u32 },

    #[error("No enemy at the targeted location {0}")]
    NoTargetInArea(Cell),

    #[error("Not enough mana: need {required}, have {available}")]
    InsufficientMana { required: u32, available: u32 },

    #[error("Already acted this turn")]
    ActionAlreadyUsed,

    #[error("No path selected")]
    NoPathSelected,

    #[error("No action selected")]
    NoActionSelected,

    #[error("No target selected")]
    NoTargetSelected,

    #[error("Unknown ability: {0}")]
    UnknownAbility(String),

    #[error("Cell {0} is off the grid")]
    OutOfBounds(Cell),

    #[error("Cell {0} is not adjacent to the end of the path")]
    NotAdjacent(Cell),

    #[error("Not your turn")]
    OutOfTurn,

    #[error("Combatant is disabled this turn")]
    Disabled,

    #[error("Battle has ended")]
    BattleEnded,
}

impl CombatError {
    /// Only `BattleEnded` is permanent for a battle instance
    pub fn is_fatal(&self) -> bool {
        matches!(self, CombatError::BattleEnded)
    }
}
