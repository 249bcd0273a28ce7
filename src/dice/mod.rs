//! Dice rolling
//!
//! The combat resolver only ever sees a `DiceRoller`, which cannot fail.
//! Remote dice services implement the fallible `DiceService` and are wrapped
//! in `ResilientDice`, which falls back to a local seeded roller whenever the
//! service errors or answers with rolls that do not fit the notation.

pub mod local;
pub mod notation;
pub mod remote;
pub mod resilient;
pub mod scripted;

use serde::{Deserialize, Serialize};

use crate::core::error::Result;

pub use local::LocalDice;
pub use notation::DiceNotation;
pub use remote::HttpDiceService;
pub use resilient::ResilientDice;
pub use scripted::ScriptedDice;

/// Result of rolling a notation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiceRoll {
    /// Individual die faces, in roll order
    pub rolls: Vec<u32>,
    pub total: i32,
    #[serde(default)]
    pub modifier: i32,
}

impl DiceRoll {
    /// Build a roll from faces, computing the total
    pub fn from_faces(rolls: Vec<u32>, modifier: i32) -> Self {
        let total = notation::clamp_total(face_sum(&rolls) + modifier as i64);
        Self {
            rolls,
            total,
            modifier,
        }
    }

    /// Face of the first die
    pub fn natural(&self) -> u32 {
        self.rolls.first().copied().unwrap_or(0)
    }

    /// Does this roll fit the notation (die count, face range, total)?
    pub fn is_consistent_with(&self, notation: &DiceNotation) -> bool {
        self.rolls.len() == notation.count as usize
            && self.modifier == notation.modifier
            && self.rolls.iter().all(|&r| (1..=notation.sides).contains(&r))
            && self.total as i64 == face_sum(&self.rolls) + self.modifier as i64
    }

    /// "3, 5 + 2 = 10"
    pub fn describe(&self) -> String {
        let faces = self
            .rolls
            .iter()
            .map(|r| r.to_string())
            .collect::<Vec<_>>()
            .join(", ");
        if self.modifier != 0 {
            format!("{} + {} = {}", faces, self.modifier, self.total)
        } else {
            format!("{} = {}", faces, self.total)
        }
    }
}

fn face_sum(rolls: &[u32]) -> i64 {
    rolls.iter().map(|&r| r as i64).sum()
}

/// Infallible roller used by the combat resolver
pub trait DiceRoller {
    fn roll(&mut self, notation: &DiceNotation) -> DiceRoll;
}

/// External dice service (may fail, may be remote)
pub trait DiceService {
    fn fetch_roll(&self, notation: &DiceNotation) -> Result<DiceRoll>;
}

impl<R: DiceRoller + ?Sized> DiceRoller for Box<R> {
    fn roll(&mut self, notation: &DiceNotation) -> DiceRoll {
        (**self).roll(notation)
    }
}
